#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deck validation: color membership, exact ammo and solvability.
//!
//! The checks run in a fixed order and stop at the first failure. The
//! solvability check plays the level on a fresh [`State`] under the automatic
//! launch policy, so the deck under test is never mutated.

use std::fmt;

use pixel_rail_core::MismatchPolicy;
use pixel_rail_world::{Deck, Grid, RunOutcome, RunStatus, State};
use thiserror::Error;
use tracing::debug;

/// Default number of ticks a solvability run may take.
pub const DEFAULT_MAX_SIM_STEPS: u32 = 50_000;

/// Default number of shooters allowed on the rail at once.
pub const DEFAULT_CAPACITY: usize = 5;

/// Closed set of reasons a deck can be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValidationCode {
    /// The deck carries a color the grid does not contain.
    InvalidColor,
    /// The deck carries fewer rounds of a color than the grid has pixels.
    InsufficientAmmo,
    /// The deck carries more rounds of a color than the grid has pixels.
    ExcessAmmo,
    /// Autoplay did not clear the grid within the step budget.
    NotSolvable,
}

impl ValidationCode {
    /// Stable machine-readable name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidColor => "invalid_color",
            Self::InsufficientAmmo => "insufficient_ammo",
            Self::ExcessAmmo => "excess_ammo",
            Self::NotSolvable => "not_solvable",
        }
    }
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed rejection with a human-readable explanation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{code}: {detail}")]
pub struct ValidationError {
    /// Which check failed.
    pub code: ValidationCode,
    /// What exactly was wrong.
    pub detail: String,
}

impl ValidationError {
    fn new(code: ValidationCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: detail.into(),
        }
    }
}

/// Rules a level is played under when checking solvability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlayRules {
    /// Maximum shooters on the rail (and number of waiting slots).
    pub capacity: usize,
    /// How a shooter reacts to a mismatched pixel.
    pub policy: MismatchPolicy,
    /// Tick ceiling for the autoplay run.
    pub max_sim_steps: u32,
}

impl Default for PlayRules {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            policy: MismatchPolicy::default(),
            max_sim_steps: DEFAULT_MAX_SIM_STEPS,
        }
    }
}

/// Summary of a deck that passed every check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    /// How the autoplay run ended.
    pub outcome: RunOutcome,
    /// Shooters in the validated deck.
    pub shooters: usize,
}

/// Cheap pre-screen: color membership and exact ammo only.
pub fn quick_validate_deck(grid: &Grid, deck: &Deck) -> Result<(), ValidationError> {
    let pixels = grid.count_by_color();
    let ammo = deck.ammo_by_color();

    if let Some(color) = deck.colors().into_iter().find(|c| !pixels.contains_key(c)) {
        return Err(ValidationError::new(
            ValidationCode::InvalidColor,
            format!("deck carries {color} but the grid has no {color} pixels"),
        ));
    }

    for (color, &needed) in &pixels {
        let needed = u64::from(needed);
        let carried = ammo.get(color).copied().unwrap_or(0);
        if carried < needed {
            return Err(ValidationError::new(
                ValidationCode::InsufficientAmmo,
                format!("{color}: deck carries {carried} rounds for {needed} pixels"),
            ));
        }
        if carried > needed {
            return Err(ValidationError::new(
                ValidationCode::ExcessAmmo,
                format!("{color}: deck carries {carried} rounds for {needed} pixels"),
            ));
        }
    }

    Ok(())
}

/// Runs every check, including an autoplay run on a fresh copy of the level.
pub fn validate_deck(
    grid: &Grid,
    deck: &Deck,
    rules: &PlayRules,
) -> Result<ValidationReport, ValidationError> {
    if let Err(error) = quick_validate_deck(grid, deck) {
        debug!(code = %error.code, detail = %error.detail, "deck rejected");
        return Err(error);
    }

    let mut state =
        State::new(grid.clone(), deck.clone(), rules.capacity).with_policy(rules.policy);
    let outcome = state.run_until_idle(rules.max_sim_steps);
    let detail = match outcome.status {
        RunStatus::Cleared => {
            return Ok(ValidationReport {
                outcome,
                shooters: deck.len(),
            })
        }
        RunStatus::StepBudgetExhausted => format!(
            "{} pixels left after {} steps",
            state.grid().filled_count(),
            outcome.steps
        ),
        RunStatus::OutOfShooters => format!(
            "shooters ran out with {} pixels left after {} steps",
            state.grid().filled_count(),
            outcome.steps
        ),
        RunStatus::Deadlocked => format!(
            "rail and waiting slots jammed after {} steps",
            outcome.steps
        ),
    };
    debug!(status = ?outcome.status, steps = outcome.steps, "deck not solvable");
    Err(ValidationError::new(ValidationCode::NotSolvable, detail))
}
