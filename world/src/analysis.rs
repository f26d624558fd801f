//! Non-mutating single-lap lookahead used by the deck generator.

use pixel_rail_core::{CellCoord, Color};

use crate::{grid::Grid, rail::Rail, State};

/// Outcome of a hypothetical single lap.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LapPreview {
    removed: Vec<CellCoord>,
    blocked_at: Option<usize>,
    ammo_left: u32,
}

impl LapPreview {
    /// Cells the shooter would clear, in firing order.
    #[must_use]
    pub fn removed(&self) -> &[CellCoord] {
        &self.removed
    }

    /// Rail index where a mismatched pixel would have stopped the lap.
    #[must_use]
    pub const fn blocked_at(&self) -> Option<usize> {
        self.blocked_at
    }

    /// Ammo the shooter would still carry afterwards.
    #[must_use]
    pub const fn ammo_left(&self) -> u32 {
        self.ammo_left
    }
}

/// Runs one shooter of `color` carrying `ammo` rounds around a copy of
/// `grid` for exactly one lap from the spawn position.
///
/// The lookahead stops early when the shooter runs out of ammo or when its ray
/// first meets a pixel of another color, so the result is a conservative
/// estimate of what a single pass can reach.
#[must_use]
pub fn simulate_lap(grid: &Grid, rail: &Rail, color: Color, ammo: u32) -> LapPreview {
    let mut scratch = grid.clone();
    let mut preview = LapPreview {
        ammo_left: ammo,
        ..LapPreview::default()
    };
    let mut index = rail.spawn_index();

    for _ in 0..rail.len() {
        if preview.ammo_left == 0 {
            break;
        }
        match rail.trace_ray(&scratch, index) {
            Some(hit) if hit.color == color => {
                let _ = scratch.set_empty(hit.cell);
                preview.ammo_left -= 1;
                preview.removed.push(hit.cell);
            }
            Some(_) => {
                preview.blocked_at = Some(index);
                break;
            }
            None => {}
        }
        index = rail.next(index);
    }

    preview
}

/// Number of `color` pixels a single unlimited-ammo lap could clear.
#[must_use]
pub fn count_potential_removals(grid: &Grid, rail: &Rail, color: Color) -> usize {
    simulate_lap(grid, rail, color, u32::MAX).removed.len()
}

impl State {
    /// Probes one lap of a hypothetical shooter against the current grid.
    #[must_use]
    pub fn simulate_single_shooter_lap(&self, color: Color, ammo: u32) -> LapPreview {
        simulate_lap(self.grid(), self.rail(), color, ammo)
    }

    /// Estimates how many `color` pixels one pass could currently reach.
    #[must_use]
    pub fn count_potential_removals_for_color(&self, color: Color) -> usize {
        count_potential_removals(self.grid(), self.rail(), color)
    }
}
