#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative level state and tick engine for Pixel Rail.
//!
//! A [`State`] owns one [`Grid`], the immutable [`Rail`] wrapped around it,
//! the [`Deck`] of unlaunched shooters, the shooters currently on the rail and
//! the [`WaitingSlots`]. Drivers mutate it either through the typed methods or
//! by feeding [`Command`] values to [`apply`]; both paths are deterministic
//! and never fail on a well-formed state. Cloning a state yields a fully
//! independent copy, which is how lookahead laps avoid disturbing the
//! authoritative game.

mod analysis;
mod deck;
mod grid;
mod rail;
mod snapshot;

use std::collections::BTreeMap;

use pixel_rail_core::{
    CellCoord, Color, Command, Event, LapOutcome, LaunchError, LaunchSource, MismatchPolicy,
    Shooter, ShooterId,
};
use tracing::{debug, trace};

pub use analysis::{count_potential_removals, simulate_lap, LapPreview};
pub use deck::{Deck, WaitingSlots};
pub use grid::Grid;
pub use rail::{Rail, RailPos, RayHit};
pub use snapshot::{finalize_digest, Snapshot};

/// A shooter travelling the rail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActiveShooter {
    shooter: Shooter,
    rail_index: usize,
    start_index: usize,
    lap_progress: usize,
    dry: bool,
    stalled: bool,
}

impl ActiveShooter {
    fn launch(shooter: Shooter, spawn_index: usize) -> Self {
        Self {
            shooter,
            rail_index: spawn_index,
            start_index: spawn_index,
            lap_progress: 0,
            dry: false,
            stalled: false,
        }
    }

    /// Identity, color and remaining ammo.
    #[must_use]
    pub const fn shooter(&self) -> &Shooter {
        &self.shooter
    }

    /// Current position on the rail.
    #[must_use]
    pub const fn rail_index(&self) -> usize {
        self.rail_index
    }

    /// Position the current lap started from.
    #[must_use]
    pub const fn start_index(&self) -> usize {
        self.start_index
    }

    /// Steps taken since launch.
    #[must_use]
    pub const fn lap_progress(&self) -> usize {
        self.lap_progress
    }

    /// Reports whether the shooter has stopped firing for this lap.
    #[must_use]
    pub const fn is_dry(&self) -> bool {
        self.dry
    }

    /// Reports whether the shooter finished its lap and waits for a free slot.
    #[must_use]
    pub const fn is_stalled(&self) -> bool {
        self.stalled
    }

    /// Reports whether a full lap of a rail of `rail_len` positions is done.
    #[must_use]
    pub const fn has_completed_lap(&self, rail_len: usize) -> bool {
        self.lap_progress >= rail_len
    }
}

/// Where a live shooter currently sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShooterLocation {
    /// Queued in the deck.
    Queue {
        /// Zero-based queue index.
        index: usize,
    },
    /// Travelling (or stalled on) the rail.
    Active,
    /// Parked in a waiting slot.
    Waiting {
        /// Zero-based slot index.
        slot: usize,
    },
}

/// Everything that happened during one call to [`State::step_tick`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepResult {
    /// Tick counter after the step.
    pub tick: u64,
    /// Events in the order they occurred.
    pub events: Vec<Event>,
    /// Whether the grid is empty after the step.
    pub grid_empty: bool,
}

impl StepResult {
    /// Pixel removals recorded during the step as `(shooter, cell, color)`.
    pub fn removals(&self) -> impl Iterator<Item = (ShooterId, CellCoord, Color)> + '_ {
        self.events.iter().filter_map(|event| match event {
            Event::PixelRemoved {
                shooter,
                cell,
                color,
            } => Some((*shooter, *cell, *color)),
            _ => None,
        })
    }

    /// Lap completions recorded during the step.
    ///
    /// A shooter that stalls reports [`LapOutcome::Stalled`] once, then a
    /// second completion with its final destination when a slot frees up.
    pub fn lap_completions(&self) -> impl Iterator<Item = (ShooterId, LapOutcome)> + '_ {
        self.events.iter().filter_map(|event| match event {
            Event::LapCompleted { shooter, outcome } => Some((*shooter, *outcome)),
            _ => None,
        })
    }

    /// Mismatched hits recorded during the step.
    pub fn blocked(&self) -> impl Iterator<Item = ShooterId> + '_ {
        self.events.iter().filter_map(|event| match event {
            Event::ShooterBlocked { shooter, .. } => Some(*shooter),
            _ => None,
        })
    }
}

/// Why [`State::run_until_idle`] stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunStatus {
    /// The grid is empty.
    Cleared,
    /// The step budget ran out first.
    StepBudgetExhausted,
    /// Nothing is on the rail and nothing could be launched.
    OutOfShooters,
    /// Every shooter on the rail is stalled and nothing can move again.
    Deadlocked,
}

/// Result of driving a state with [`State::run_until_idle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RunOutcome {
    /// Reason the run stopped.
    pub status: RunStatus,
    /// Ticks executed.
    pub steps: u32,
}

impl RunOutcome {
    /// Reports whether the run emptied the grid.
    #[must_use]
    pub const fn is_cleared(&self) -> bool {
        matches!(self.status, RunStatus::Cleared)
    }
}

/// Authoritative state of one level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct State {
    grid: Grid,
    rail: Rail,
    deck: Deck,
    active: Vec<ActiveShooter>,
    waiting: WaitingSlots,
    capacity: usize,
    tick: u64,
    next_id: u32,
    policy: MismatchPolicy,
}

impl State {
    /// Creates a level ready for play.
    ///
    /// The rail is derived from the grid dimensions; the waiting area gets as
    /// many slots as the rail carries shooters. The number of queues is the
    /// deck's own queue count.
    #[must_use]
    pub fn new(grid: Grid, deck: Deck, capacity: usize) -> Self {
        let rail = Rail::new(grid.width(), grid.height());
        let next_id = deck
            .iter()
            .map(|shooter| shooter.id().get().saturating_add(1))
            .max()
            .unwrap_or(0);
        Self {
            grid,
            rail,
            deck,
            active: Vec::new(),
            waiting: WaitingSlots::with_capacity(capacity),
            capacity,
            tick: 0,
            next_id,
            policy: MismatchPolicy::default(),
        }
    }

    /// Replaces the mismatch policy.
    #[must_use]
    pub fn with_policy(mut self, policy: MismatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The pixel grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The rail wrapped around the grid.
    #[must_use]
    pub fn rail(&self) -> &Rail {
        &self.rail
    }

    /// Shooters not yet launched.
    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Shooters on the rail, in processing order.
    #[must_use]
    pub fn active(&self) -> &[ActiveShooter] {
        &self.active
    }

    /// The waiting area.
    #[must_use]
    pub fn waiting(&self) -> &WaitingSlots {
        &self.waiting
    }

    /// Maximum number of shooters on the rail at once.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of deck queues.
    #[must_use]
    pub fn queue_count(&self) -> usize {
        self.deck.queue_count()
    }

    /// Ticks executed so far.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Identifier the next shooter created for this level would receive.
    #[must_use]
    pub const fn next_id(&self) -> u32 {
        self.next_id
    }

    /// Active mismatch policy.
    #[must_use]
    pub const fn policy(&self) -> MismatchPolicy {
        self.policy
    }

    /// Launches the head of deck queue `queue`.
    pub fn try_launch_from_queue(&mut self, queue: usize) -> Result<ShooterId, LaunchError> {
        let Some(head) = self.deck.queue(queue) else {
            return Err(LaunchError::UnknownSource);
        };
        if head.is_empty() {
            return Err(LaunchError::EmptySource);
        }
        self.ensure_rail_space()?;
        let shooter = self.deck.pop(queue).ok_or(LaunchError::EmptySource)?;
        Ok(self.place_on_rail(shooter))
    }

    /// Launches the head of deck queue `queue`, reporting success.
    pub fn launch_from_queue(&mut self, queue: usize) -> bool {
        self.try_launch_from_queue(queue).is_ok()
    }

    /// Relaunches the shooter parked in waiting slot `slot`.
    pub fn try_launch_from_waiting(&mut self, slot: usize) -> Result<ShooterId, LaunchError> {
        if slot >= self.waiting.capacity() {
            return Err(LaunchError::UnknownSource);
        }
        if self.waiting.get(slot).is_none() {
            return Err(LaunchError::EmptySource);
        }
        self.ensure_rail_space()?;
        let shooter = self.waiting.take(slot).ok_or(LaunchError::EmptySource)?;
        Ok(self.place_on_rail(shooter))
    }

    /// Relaunches the shooter parked in waiting slot `slot`, reporting success.
    pub fn launch_from_waiting(&mut self, slot: usize) -> bool {
        self.try_launch_from_waiting(slot).is_ok()
    }

    /// Launches one shooter, preferring fresh deck shooters.
    ///
    /// The first non-empty deck queue is used; the waiting area is only drawn
    /// from once every deck queue is empty.
    pub fn try_auto_launch(&mut self) -> Result<(ShooterId, LaunchSource), LaunchError> {
        if self.deck.is_empty() && self.waiting.is_empty() {
            return Err(LaunchError::NothingToLaunch);
        }
        self.ensure_rail_space()?;
        if let Some(index) = self.deck.first_non_empty() {
            let id = self.try_launch_from_queue(index)?;
            return Ok((id, LaunchSource::Queue { index }));
        }
        let index = self
            .waiting
            .first_occupied()
            .ok_or(LaunchError::NothingToLaunch)?;
        let id = self.try_launch_from_waiting(index)?;
        Ok((id, LaunchSource::Waiting { index }))
    }

    /// Launches one shooter under the automatic policy, reporting success.
    pub fn auto_launch(&mut self) -> bool {
        self.try_auto_launch().is_ok()
    }

    /// Advances time by one unit, moving every active shooter once.
    ///
    /// Each shooter, in list order, fires at the first filled cell on its
    /// ray (matching color only), steps to the next rail position, and on
    /// finishing a lap is discarded (no ammo), parked (free slot) or stalled.
    pub fn step_tick(&mut self) -> StepResult {
        self.tick = self.tick.saturating_add(1);
        let tick = self.tick;
        let was_empty = self.grid.is_empty();
        let mut events = vec![Event::TimeAdvanced { tick }];

        let Self {
            grid,
            rail,
            active,
            waiting,
            policy,
            ..
        } = self;
        let policy = *policy;
        active.retain_mut(|shooter| {
            !advance_shooter(shooter, grid, rail, waiting, policy, &mut events)
        });

        let grid_empty = self.grid.is_empty();
        if grid_empty && !was_empty {
            events.push(Event::GridCleared);
        }

        StepResult {
            tick,
            events,
            grid_empty,
        }
    }

    /// Reports whether the grid has been cleared.
    #[must_use]
    pub fn is_won(&self) -> bool {
        self.grid.is_empty()
    }

    /// Reports whether pixels remain but no shooter could ever fire again.
    #[must_use]
    pub fn is_lost(&self) -> bool {
        !self.grid.is_empty()
            && self.active.is_empty()
            && self.deck.is_empty()
            && self.waiting.is_empty()
    }

    /// Reports whether every active shooter is stalled with no way forward.
    ///
    /// That happens when pixels remain, the waiting area is full and the
    /// rail is at capacity, so nothing can park and nothing can launch.
    #[must_use]
    pub fn is_deadlocked(&self) -> bool {
        !self.grid.is_empty()
            && !self.active.is_empty()
            && self.active.iter().all(ActiveShooter::is_stalled)
            && self.waiting.first_free().is_none()
            && self.active.len() >= self.capacity
    }

    /// Drives the level under [`State::try_auto_launch`] until it is cleared,
    /// runs out of shooters, deadlocks or spends `max_steps` ticks.
    pub fn run_until_idle(&mut self, max_steps: u32) -> RunOutcome {
        let mut steps = 0;
        let status = loop {
            if self.grid.is_empty() {
                break RunStatus::Cleared;
            }
            if steps >= max_steps {
                break RunStatus::StepBudgetExhausted;
            }
            let _ = self.try_auto_launch();
            if self.active.is_empty() {
                break RunStatus::OutOfShooters;
            }
            if self.is_deadlocked() {
                break RunStatus::Deadlocked;
            }
            let _ = self.step_tick();
            steps += 1;
        };
        debug!(?status, steps, tick = self.tick, "run finished");
        RunOutcome { status, steps }
    }

    /// Ammo held across the deck, the rail and the waiting area, by color.
    #[must_use]
    pub fn ammo_by_color(&self) -> BTreeMap<Color, u64> {
        let mut totals = self.deck.ammo_by_color();
        let on_rail = self.active.iter().map(ActiveShooter::shooter);
        let parked = self.waiting.iter().map(|(_, shooter)| shooter);
        for shooter in on_rail.chain(parked) {
            *totals.entry(shooter.color()).or_insert(0) += u64::from(shooter.ammo());
        }
        totals
    }

    /// Every live shooter with its current location.
    #[must_use]
    pub fn shooter_locations(&self) -> Vec<(ShooterId, ShooterLocation)> {
        let mut locations = Vec::new();
        for (index, queue) in self.deck.queues().enumerate() {
            locations.extend(
                queue
                    .iter()
                    .map(|shooter| (shooter.id(), ShooterLocation::Queue { index })),
            );
        }
        locations.extend(
            self.active
                .iter()
                .map(|active| (active.shooter.id(), ShooterLocation::Active)),
        );
        locations.extend(
            self.waiting
                .iter()
                .map(|(slot, shooter)| (shooter.id(), ShooterLocation::Waiting { slot })),
        );
        locations
    }

    fn ensure_rail_space(&self) -> Result<(), LaunchError> {
        if self.active.len() >= self.capacity {
            Err(LaunchError::RailFull)
        } else {
            Ok(())
        }
    }

    fn place_on_rail(&mut self, shooter: Shooter) -> ShooterId {
        let id = shooter.id();
        self.active
            .push(ActiveShooter::launch(shooter, self.rail.spawn_index()));
        id
    }
}

/// Moves one shooter through a tick; returns `true` when it leaves the rail.
fn advance_shooter(
    active: &mut ActiveShooter,
    grid: &mut Grid,
    rail: &Rail,
    waiting: &mut WaitingSlots,
    policy: MismatchPolicy,
    events: &mut Vec<Event>,
) -> bool {
    if active.stalled {
        return finish_lap(active, waiting, events);
    }

    if !active.dry && !active.shooter.is_spent() {
        if let Some(hit) = rail.trace_ray(grid, active.rail_index) {
            let id = active.shooter.id();
            if hit.color == active.shooter.color() {
                let _ = grid.set_empty(hit.cell);
                let _ = active.shooter.spend_round();
                events.push(Event::PixelRemoved {
                    shooter: id,
                    cell: hit.cell,
                    color: hit.color,
                });
            } else {
                events.push(Event::ShooterBlocked {
                    shooter: id,
                    cell: hit.cell,
                    color: hit.color,
                });
                if policy == MismatchPolicy::DryForLap {
                    active.dry = true;
                }
            }
        }
    }

    active.rail_index = rail.next(active.rail_index);
    active.lap_progress += 1;

    if active.has_completed_lap(rail.len()) {
        return finish_lap(active, waiting, events);
    }
    false
}

fn finish_lap(
    active: &mut ActiveShooter,
    waiting: &mut WaitingSlots,
    events: &mut Vec<Event>,
) -> bool {
    let shooter = active.shooter.id();
    if active.shooter.is_spent() {
        trace!(shooter = shooter.get(), "discarded after lap");
        events.push(Event::LapCompleted {
            shooter,
            outcome: LapOutcome::Discarded,
        });
        return true;
    }

    match waiting.park(active.shooter) {
        Ok(slot) => {
            trace!(shooter = shooter.get(), slot, "parked after lap");
            events.push(Event::LapCompleted {
                shooter,
                outcome: LapOutcome::Parked { slot },
            });
            true
        }
        Err(_) => {
            if !active.stalled {
                trace!(shooter = shooter.get(), "stalled waiting for a slot");
                active.stalled = true;
                events.push(Event::LapCompleted {
                    shooter,
                    outcome: LapOutcome::Stalled,
                });
            }
            false
        }
    }
}

/// Applies the provided command to the state, recording what happened.
pub fn apply(state: &mut State, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LaunchFromQueue { queue } => {
            let source = LaunchSource::Queue { index: queue };
            out_events.push(launch_event(state.try_launch_from_queue(queue), source));
        }
        Command::LaunchFromWaiting { slot } => {
            let source = LaunchSource::Waiting { index: slot };
            out_events.push(launch_event(state.try_launch_from_waiting(slot), source));
        }
        Command::AutoLaunch => match state.try_auto_launch() {
            Ok((shooter, source)) => out_events.push(Event::ShooterLaunched { shooter, source }),
            Err(reason) => out_events.push(Event::LaunchRejected {
                source: LaunchSource::Auto,
                reason,
            }),
        },
        Command::Tick => out_events.extend(state.step_tick().events),
    }
}

fn launch_event(result: Result<ShooterId, LaunchError>, source: LaunchSource) -> Event {
    match result {
        Ok(shooter) => Event::ShooterLaunched { shooter, source },
        Err(reason) => Event::LaunchRejected { source, reason },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shooter(id: u32, color: Color, ammo: u32) -> Shooter {
        Shooter::new(ShooterId::new(id), color, ammo)
    }

    fn single_queue(shooters: Vec<Shooter>) -> Deck {
        Deck::from_queues(vec![shooters])
    }

    #[test]
    fn next_id_follows_highest_deck_id() {
        let state = State::new(
            Grid::new(2, 2),
            single_queue(vec![shooter(4, Color::Red, 1), shooter(9, Color::Red, 1)]),
            1,
        );
        assert_eq!(state.next_id(), 10);
        assert_eq!(State::new(Grid::new(2, 2), Deck::new(1), 1).next_id(), 0);
    }

    #[test]
    fn launch_respects_capacity() {
        let mut state = State::new(
            Grid::new(3, 3),
            single_queue(vec![shooter(0, Color::Red, 1), shooter(1, Color::Red, 1)]),
            1,
        );
        assert_eq!(state.try_launch_from_queue(0), Ok(ShooterId::new(0)));
        let before = state.clone();
        assert_eq!(state.try_launch_from_queue(0), Err(LaunchError::RailFull));
        assert_eq!(state, before);
        assert_eq!(state.active().len(), 1);
    }

    #[test]
    fn launch_reports_unknown_and_empty_sources() {
        let mut state = State::new(Grid::new(3, 3), Deck::new(2), 2);
        assert_eq!(state.try_launch_from_queue(5), Err(LaunchError::UnknownSource));
        assert_eq!(state.try_launch_from_queue(1), Err(LaunchError::EmptySource));
        assert_eq!(state.try_launch_from_waiting(2), Err(LaunchError::UnknownSource));
        assert_eq!(state.try_launch_from_waiting(0), Err(LaunchError::EmptySource));
        assert_eq!(state.try_auto_launch(), Err(LaunchError::NothingToLaunch));
        assert!(!state.launch_from_queue(0));
        assert!(!state.auto_launch());
    }

    #[test]
    fn launched_shooter_starts_at_spawn() {
        let mut state = State::new(
            Grid::new(3, 3),
            single_queue(vec![shooter(0, Color::Red, 2)]),
            1,
        );
        assert!(state.launch_from_queue(0));
        let active = state.active()[0];
        assert_eq!(active.rail_index(), 0);
        assert_eq!(active.start_index(), 0);
        assert_eq!(active.lap_progress(), 0);
        assert!(!active.is_dry());
        assert!(!active.is_stalled());
    }

    #[test]
    fn auto_launch_prefers_deck_over_waiting() {
        let mut state = State::new(
            Grid::new(1, 1),
            Deck::from_queues(vec![vec![], vec![shooter(1, Color::Red, 3)]]),
            2,
        );
        assert_eq!(state.waiting.park(shooter(0, Color::Blue, 2)), Ok(0));

        assert_eq!(
            state.try_auto_launch(),
            Ok((ShooterId::new(1), LaunchSource::Queue { index: 1 }))
        );
        assert_eq!(
            state.try_auto_launch(),
            Ok((ShooterId::new(0), LaunchSource::Waiting { index: 0 }))
        );
        assert_eq!(state.try_auto_launch(), Err(LaunchError::NothingToLaunch));
    }

    #[test]
    fn mismatch_skips_without_spending_under_default_policy() {
        let grid = Grid::from_pixels(
            2,
            2,
            [
                (CellCoord::new(0, 0), Color::Blue),
                (CellCoord::new(1, 0), Color::Red),
            ],
        );
        let mut state = State::new(grid, single_queue(vec![shooter(0, Color::Red, 1)]), 1);
        assert!(state.launch_from_queue(0));

        let first = state.step_tick();
        assert_eq!(first.blocked().count(), 1);
        assert_eq!(first.removals().count(), 0);
        assert_eq!(state.active()[0].shooter().ammo(), 1);
        assert!(!state.active()[0].is_dry());

        let second = state.step_tick();
        assert_eq!(
            second.removals().collect::<Vec<_>>(),
            vec![(ShooterId::new(0), CellCoord::new(1, 0), Color::Red)]
        );
    }

    #[test]
    fn dry_policy_stops_firing_for_the_lap() {
        let grid = Grid::from_pixels(
            2,
            2,
            [
                (CellCoord::new(0, 0), Color::Blue),
                (CellCoord::new(1, 0), Color::Red),
            ],
        );
        let mut state = State::new(grid, single_queue(vec![shooter(0, Color::Red, 1)]), 1)
            .with_policy(MismatchPolicy::DryForLap);
        assert!(state.launch_from_queue(0));

        let _ = state.step_tick();
        assert!(state.active()[0].is_dry());
        let second = state.step_tick();
        assert_eq!(second.removals().count(), 0);
        assert_eq!(second.blocked().count(), 0);
    }

    #[test]
    fn stalled_shooter_parks_once_a_slot_frees() {
        let mut state = State::new(
            Grid::from_pixels(1, 1, [(CellCoord::new(0, 0), Color::Blue)]),
            single_queue(vec![shooter(1, Color::Red, 2)]),
            1,
        );
        assert_eq!(state.waiting.park(shooter(0, Color::Blue, 1)), Ok(0));
        assert!(state.launch_from_queue(0));

        let mut outcomes = Vec::new();
        for _ in 0..state.rail().len() {
            outcomes.extend(state.step_tick().lap_completions());
        }
        assert_eq!(outcomes, vec![(ShooterId::new(1), LapOutcome::Stalled)]);
        assert!(state.active()[0].is_stalled());
        assert!(state.is_deadlocked());

        let progress = state.active()[0].lap_progress();
        let quiet = state.step_tick();
        assert_eq!(quiet.lap_completions().count(), 0);
        assert_eq!(state.active()[0].lap_progress(), progress);

        let parked = state.waiting.take(0).expect("parked shooter");
        assert_eq!(parked.id(), ShooterId::new(0));
        let resumed = state.step_tick();
        assert_eq!(
            resumed.lap_completions().collect::<Vec<_>>(),
            vec![(ShooterId::new(1), LapOutcome::Parked { slot: 0 })]
        );
        assert!(state.active().is_empty());
    }

    #[test]
    fn apply_reports_launches_and_rejections() {
        let mut state = State::new(
            Grid::from_pixels(2, 2, [(CellCoord::new(0, 0), Color::Red)]),
            single_queue(vec![shooter(0, Color::Red, 1)]),
            1,
        );
        let mut events = Vec::new();
        apply(&mut state, Command::LaunchFromQueue { queue: 0 }, &mut events);
        apply(&mut state, Command::AutoLaunch, &mut events);
        apply(&mut state, Command::Tick, &mut events);

        assert_eq!(
            events,
            vec![
                Event::ShooterLaunched {
                    shooter: ShooterId::new(0),
                    source: LaunchSource::Queue { index: 0 },
                },
                Event::LaunchRejected {
                    source: LaunchSource::Auto,
                    reason: LaunchError::NothingToLaunch,
                },
                Event::TimeAdvanced { tick: 1 },
                Event::PixelRemoved {
                    shooter: ShooterId::new(0),
                    cell: CellCoord::new(0, 0),
                    color: Color::Red,
                },
                Event::GridCleared,
            ]
        );
    }

    #[test]
    fn lost_only_when_nothing_remains_to_fire() {
        let grid = Grid::from_pixels(1, 1, [(CellCoord::new(0, 0), Color::Red)]);
        let state = State::new(grid.clone(), Deck::new(1), 1);
        assert!(state.is_lost());
        assert!(!state.is_won());

        let state = State::new(grid, single_queue(vec![shooter(0, Color::Red, 1)]), 1);
        assert!(!state.is_lost());
    }

    #[test]
    fn empty_level_is_already_won() {
        let mut state = State::new(Grid::new(0, 0), Deck::new(1), 3);
        assert!(state.is_won());
        let outcome = state.run_until_idle(10);
        assert_eq!(
            outcome,
            RunOutcome {
                status: RunStatus::Cleared,
                steps: 0,
            }
        );
    }

    #[test]
    fn zero_capacity_runs_out_of_shooters() {
        let mut state = State::new(
            Grid::from_pixels(1, 1, [(CellCoord::new(0, 0), Color::Red)]),
            single_queue(vec![shooter(0, Color::Red, 1)]),
            0,
        );
        assert_eq!(state.run_until_idle(10).status, RunStatus::OutOfShooters);
    }

    #[test]
    fn shooter_locations_cover_every_container() {
        let mut state = State::new(
            Grid::new(2, 2),
            Deck::from_queues(vec![
                vec![shooter(0, Color::Red, 1)],
                vec![shooter(1, Color::Red, 1)],
            ]),
            2,
        );
        assert!(state.launch_from_queue(0));
        assert_eq!(state.waiting.park(shooter(2, Color::Red, 1)), Ok(0));
        assert_eq!(
            state.shooter_locations(),
            vec![
                (ShooterId::new(1), ShooterLocation::Queue { index: 1 }),
                (ShooterId::new(0), ShooterLocation::Active),
                (ShooterId::new(2), ShooterLocation::Waiting { slot: 0 }),
            ]
        );
    }
}
