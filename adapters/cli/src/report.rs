//! Human and JSON renderings of a CLI run.

use std::fmt::Write as _;

use pixel_rail_core::{Color, WELCOME_BANNER};
use pixel_rail_system_deck_generation::GeneratedDeck;
use pixel_rail_world::{Deck, Grid, RunOutcome, RunStatus, State};
use serde::Serialize;

use crate::pattern::Pattern;

/// Everything the CLI reports about one generate-and-play run.
#[derive(Debug, Serialize)]
pub(crate) struct Report {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) pattern: Pattern,
    pub(crate) pixels: usize,
    pub(crate) root_seed: u64,
    pub(crate) attempt_seed: u64,
    pub(crate) attempts: u32,
    pub(crate) queues: Vec<Vec<ShooterSummary>>,
    pub(crate) status: &'static str,
    pub(crate) steps: u32,
    pub(crate) snapshot: String,
}

/// One queued shooter as shown to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct ShooterSummary {
    pub(crate) id: u32,
    pub(crate) color: Color,
    pub(crate) ammo: u32,
}

impl Report {
    pub(crate) fn new(
        grid: &Grid,
        pattern: Pattern,
        root_seed: u64,
        generated: &GeneratedDeck,
        outcome: RunOutcome,
        finished: &State,
    ) -> Self {
        Self {
            width: grid.width(),
            height: grid.height(),
            pattern,
            pixels: grid.filled_count(),
            root_seed,
            attempt_seed: generated.seed,
            attempts: generated.attempts,
            queues: summarize_queues(&generated.deck),
            status: status_label(outcome.status),
            steps: outcome.steps,
            snapshot: finished.snapshot().to_string(),
        }
    }

    pub(crate) fn render_text(&self) -> String {
        let mut out = String::new();
        let shooters: usize = self.queues.iter().map(Vec::len).sum();
        let _ = writeln!(out, "{WELCOME_BANNER}");
        let _ = writeln!(
            out,
            "grid {}x{} ({:?}, {} pixels)",
            self.width, self.height, self.pattern, self.pixels
        );
        let _ = writeln!(
            out,
            "deck {} shooters in {} queues after {} attempt(s), seed {:#018x}",
            shooters,
            self.queues.len(),
            self.attempts,
            self.attempt_seed
        );
        for (index, queue) in self.queues.iter().enumerate() {
            let entries: Vec<String> = queue
                .iter()
                .map(|shooter| format!("{}:{}", shooter.color, shooter.ammo))
                .collect();
            let _ = writeln!(out, "  queue {index}: {}", entries.join(" "));
        }
        let _ = writeln!(out, "outcome {} after {} steps", self.status, self.steps);
        let _ = writeln!(out, "snapshot {}", self.snapshot);
        out
    }
}

fn summarize_queues(deck: &Deck) -> Vec<Vec<ShooterSummary>> {
    deck.queues()
        .map(|queue| {
            queue
                .iter()
                .map(|shooter| ShooterSummary {
                    id: shooter.id().get(),
                    color: shooter.color(),
                    ammo: shooter.ammo(),
                })
                .collect()
        })
        .collect()
}

pub(crate) const fn status_label(status: RunStatus) -> &'static str {
    match status {
        RunStatus::Cleared => "cleared",
        RunStatus::StepBudgetExhausted => "step_budget_exhausted",
        RunStatus::OutOfShooters => "out_of_shooters",
        RunStatus::Deadlocked => "deadlocked",
    }
}
