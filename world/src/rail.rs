//! Perimeter rail that carries shooters around the grid.

use pixel_rail_core::{CellCoord, Color, Direction, RailSide};

use crate::grid::Grid;

/// A single firing position on the rail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RailPos {
    index: usize,
    entry: CellCoord,
    side: RailSide,
}

impl RailPos {
    /// Position of this entry along the rail.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// First cell a ray fired from this position checks.
    #[must_use]
    pub const fn entry(&self) -> CellCoord {
        self.entry
    }

    /// Grid edge the position runs along.
    #[must_use]
    pub const fn side(&self) -> RailSide {
        self.side
    }

    /// Direction a shooter at this position fires in.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.side.inward()
    }
}

/// First filled cell met by a ray.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RayHit {
    /// Cell that stopped the ray.
    pub cell: CellCoord,
    /// Color of the pixel in that cell.
    pub color: Color,
}

/// Immutable clockwise ring of `2 * (width + height)` firing positions.
///
/// Position 0 sits above column 0 firing south. The ring runs east along the
/// top edge, south down the right edge, west along the bottom edge and north
/// up the left edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rail {
    positions: Vec<RailPos>,
}

impl Rail {
    /// Builds the rail surrounding a `width` x `height` grid.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let last_column = width.saturating_sub(1);
        let last_row = height.saturating_sub(1);

        let top = (0..width).map(|column| (CellCoord::new(column, 0), RailSide::Top));
        let right = (0..height).map(|row| (CellCoord::new(last_column, row), RailSide::Right));
        let bottom = (0..width)
            .rev()
            .map(|column| (CellCoord::new(column, last_row), RailSide::Bottom));
        let left = (0..height)
            .rev()
            .map(|row| (CellCoord::new(0, row), RailSide::Left));

        let positions = top
            .chain(right)
            .chain(bottom)
            .chain(left)
            .enumerate()
            .map(|(index, (entry, side))| RailPos { index, entry, side })
            .collect();

        Self { positions }
    }

    /// Number of positions on the rail.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Reports whether the rail has no positions (degenerate grid).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position at `index`, if it exists.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&RailPos> {
        self.positions.get(index)
    }

    /// Every position in rail order.
    #[must_use]
    pub fn positions(&self) -> &[RailPos] {
        &self.positions
    }

    /// Index following `index` clockwise, wrapping at the end.
    #[must_use]
    pub fn next(&self, index: usize) -> usize {
        if self.positions.is_empty() {
            return 0;
        }
        (index + 1) % self.positions.len()
    }

    /// Index every launched shooter starts from.
    #[must_use]
    pub const fn spawn_index(&self) -> usize {
        0
    }

    /// Walks inward from the position at `index` until the ray leaves the
    /// grid or meets a filled cell.
    #[must_use]
    pub fn trace_ray(&self, grid: &Grid, index: usize) -> Option<RayHit> {
        let position = self.positions.get(index)?;
        let direction = position.direction();
        let mut cursor = Some(position.entry());
        while let Some(cell) = cursor {
            if !grid.contains(cell) {
                return None;
            }
            if let Some(color) = grid.get(cell) {
                return Some(RayHit { cell, color });
            }
            cursor = cell.step(direction);
        }
        None
    }
}
