//! Demo grids the CLI can generate decks for.

use clap::ValueEnum;
use pixel_rail_core::{CellCoord, Color};
use pixel_rail_world::Grid;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Layout used to paint every cell of a demo grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Pattern {
    /// One color per row.
    Stripes,
    /// Concentric rectangles from the border inward.
    Rings,
    /// Diagonal color bands.
    Checker,
    /// Seeded random colors.
    Noise,
}

impl Pattern {
    /// Paints a fully filled `width` x `height` grid with `colors` colors.
    ///
    /// The color count is clamped to the palette; `seed` only affects
    /// [`Pattern::Noise`].
    pub(crate) fn build(self, width: u32, height: u32, colors: usize, seed: u64) -> Grid {
        let palette = &Color::ALL[..colors.clamp(1, Color::ALL.len())];
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut pixels = Vec::new();
        for row in 0..height {
            for column in 0..width {
                let band = match self {
                    Self::Stripes => row as usize,
                    Self::Rings => {
                        let across = column.min(width - 1 - column);
                        let down = row.min(height - 1 - row);
                        across.min(down) as usize
                    }
                    Self::Checker => (column + row) as usize,
                    Self::Noise => rng.gen_range(0..palette.len()),
                };
                pixels.push((CellCoord::new(column, row), palette[band % palette.len()]));
            }
        }
        Grid::from_pixels(width, height, pixels)
    }
}
