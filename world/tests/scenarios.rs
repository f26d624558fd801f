use pixel_rail_core::{CellCoord, Color, Event, LapOutcome, RailSide, Shooter, ShooterId};
use pixel_rail_world::{Deck, Grid, Rail, State};

fn red_pair_level() -> State {
    let grid = Grid::from_pixels(
        5,
        5,
        [
            (CellCoord::new(0, 0), Color::Red),
            (CellCoord::new(1, 0), Color::Red),
            (CellCoord::new(2, 0), Color::Blue),
        ],
    );
    let deck = Deck::from_queues(vec![vec![Shooter::new(ShooterId::new(0), Color::Red, 2)]]);
    State::new(grid, deck, 1)
}

#[test]
fn red_shooter_clears_its_pair_and_is_discarded() {
    let mut state = red_pair_level();
    assert!(state.launch_from_queue(0));

    let first = state.step_tick();
    assert_eq!(
        first.removals().collect::<Vec<_>>(),
        vec![(ShooterId::new(0), CellCoord::new(0, 0), Color::Red)]
    );

    let second = state.step_tick();
    assert_eq!(
        second.removals().collect::<Vec<_>>(),
        vec![(ShooterId::new(0), CellCoord::new(1, 0), Color::Red)]
    );
    assert_eq!(state.active()[0].shooter().ammo(), 0);

    let rail_len = state.rail().len();
    let mut later = Vec::new();
    for _ in 2..rail_len {
        later.extend(state.step_tick().events);
    }

    assert!(
        !later.iter().any(|event| matches!(
            event,
            Event::PixelRemoved { .. } | Event::ShooterBlocked { .. }
        )),
        "a spent shooter must not fire or inspect pixels"
    );
    assert!(later.contains(&Event::LapCompleted {
        shooter: ShooterId::new(0),
        outcome: LapOutcome::Discarded,
    }));
    assert!(state.active().is_empty());
    assert!(state.waiting().is_empty());
    assert_eq!(state.grid().get(CellCoord::new(2, 0)), Some(Color::Blue));
    assert_eq!(state.grid().filled_count(), 1);
}

#[test]
fn idle_lap_over_empty_grid_parks_with_full_ammo() {
    let deck = Deck::from_queues(vec![vec![Shooter::new(ShooterId::new(0), Color::Pink, 5)]]);
    let mut state = State::new(Grid::new(3, 3), deck, 2);
    assert_eq!(state.rail().len(), 12);
    assert!(state.launch_from_queue(0));

    for _ in 0..11 {
        let result = state.step_tick();
        assert_eq!(result.removals().count(), 0);
        assert_eq!(result.lap_completions().count(), 0);
    }
    assert_eq!(state.active()[0].lap_progress(), 11);

    let last = state.step_tick();
    assert_eq!(
        last.lap_completions().collect::<Vec<_>>(),
        vec![(ShooterId::new(0), LapOutcome::Parked { slot: 0 })]
    );
    assert_eq!(state.tick(), 12);
    assert!(state.active().is_empty());
    assert_eq!(state.waiting().get(0).map(Shooter::ammo), Some(5));
}

#[test]
fn rail_geometry_holds_for_assorted_sizes() {
    for (width, height) in [(1, 1), (2, 5), (5, 5), (8, 3), (13, 21)] {
        let rail = Rail::new(width, height);
        let expected = 2 * (width + height) as usize;
        assert_eq!(rail.len(), expected, "{width}x{height}");

        let spawn = rail.get(rail.spawn_index()).expect("spawn position");
        assert_eq!(spawn.side(), RailSide::Top);

        let mut index = rail.spawn_index();
        for _ in 0..rail.len() {
            index = rail.next(index);
        }
        assert_eq!(index, rail.spawn_index());
    }
}

#[test]
fn autoplay_clears_a_level_with_blocked_rays() {
    // Blue launches first and bounces off the red top row until the red
    // shooter clears it.
    let grid = Grid::from_pixels(
        2,
        2,
        [
            (CellCoord::new(0, 0), Color::Red),
            (CellCoord::new(1, 0), Color::Red),
            (CellCoord::new(0, 1), Color::Blue),
            (CellCoord::new(1, 1), Color::Blue),
        ],
    );
    let deck = Deck::from_queues(vec![
        vec![Shooter::new(ShooterId::new(0), Color::Blue, 2)],
        vec![Shooter::new(ShooterId::new(1), Color::Red, 2)],
    ]);
    let mut state = State::new(grid, deck, 2);

    let outcome = state.run_until_idle(1_000);
    assert!(outcome.is_cleared(), "{outcome:?}");
    assert!(state.is_won());
    assert!(!state.is_lost());
    assert!(state.ammo_by_color().values().all(|ammo| *ammo == 0));
}
