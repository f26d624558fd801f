//! Dense pixel grid cleared by the shooters.

use std::collections::BTreeMap;

use pixel_rail_core::{CellCoord, Color};
use sha2::{Digest, Sha256};

use crate::snapshot::finalize_digest;

/// Row-major matrix of cells, each either empty or filled with a [`Color`].
///
/// Reads outside the grid bounds report an empty cell so callers can walk
/// rays without bounds bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Option<Color>>,
}

impl Grid {
    /// Creates an empty grid with the provided dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let capacity_u64 = u64::from(width) * u64::from(height);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            width,
            height,
            cells: vec![None; capacity],
        }
    }

    /// Builds a grid from the filled cells supplied by a level loader.
    ///
    /// Pixels that fall outside the grid are ignored; later entries for the
    /// same cell overwrite earlier ones.
    #[must_use]
    pub fn from_pixels<I>(width: u32, height: u32, pixels: I) -> Self
    where
        I: IntoIterator<Item = (CellCoord, Color)>,
    {
        let mut grid = Self::new(width, height);
        for (cell, color) in pixels {
            let _ = grid.set_pixel(cell, color);
        }
        grid
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the cell lies within the grid bounds.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    /// Color of the pixel at `cell`, or `None` when empty or out of bounds.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<Color> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    /// Clears the cell, returning the color it held.
    pub fn set_empty(&mut self, cell: CellCoord) -> Option<Color> {
        let index = self.index(cell)?;
        self.cells.get_mut(index).and_then(Option::take)
    }

    /// Paints the cell with `color`; returns `false` when out of bounds.
    pub fn set_pixel(&mut self, cell: CellCoord, color: Color) -> bool {
        match self.index(cell).and_then(|index| self.cells.get_mut(index)) {
            Some(slot) => {
                *slot = Some(color);
                true
            }
            None => false,
        }
    }

    /// Number of filled cells.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Filled-cell counts keyed by color, in palette order.
    #[must_use]
    pub fn count_by_color(&self) -> BTreeMap<Color, u32> {
        let mut counts = BTreeMap::new();
        for color in self.cells.iter().flatten() {
            *counts.entry(*color).or_insert(0) += 1;
        }
        counts
    }

    /// Reports whether every cell is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Iterates the filled cells in row-major order.
    pub fn iter_filled(&self) -> impl Iterator<Item = (CellCoord, Color)> + '_ {
        let width = self.width;
        self.cells.iter().enumerate().filter_map(move |(index, cell)| {
            let color = (*cell)?;
            let index = u32::try_from(index).ok()?;
            Some((CellCoord::new(index % width, index / width), color))
        })
    }

    /// Order-stable 64-bit digest of the dimensions and every cell.
    #[must_use]
    pub fn hash(&self) -> u64 {
        let mut hasher = Sha256::new();
        self.feed(&mut hasher);
        finalize_digest(hasher)
    }

    pub(crate) fn feed(&self, hasher: &mut Sha256) {
        hasher.update(self.width.to_le_bytes());
        hasher.update(self.height.to_le_bytes());
        for cell in &self.cells {
            let byte = cell.map_or(0, |color| color.index() + 1);
            hasher.update([byte]);
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.width).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Grid {
        Grid::from_pixels(
            4,
            3,
            [
                (CellCoord::new(0, 0), Color::Red),
                (CellCoord::new(3, 2), Color::Blue),
                (CellCoord::new(1, 1), Color::Red),
            ],
        )
    }

    #[test]
    fn out_of_bounds_reads_are_empty() {
        let grid = sample();
        assert_eq!(grid.get(CellCoord::new(4, 0)), None);
        assert_eq!(grid.get(CellCoord::new(0, 3)), None);
        assert_eq!(grid.get(CellCoord::new(3, 2)), Some(Color::Blue));
    }

    #[test]
    fn out_of_bounds_pixels_are_ignored() {
        let grid = Grid::from_pixels(2, 2, [(CellCoord::new(5, 5), Color::Green)]);
        assert!(grid.is_empty());
        assert_eq!(grid.filled_count(), 0);
    }

    #[test]
    fn counts_track_removal() {
        let mut grid = sample();
        assert_eq!(grid.filled_count(), 3);
        assert_eq!(grid.count_by_color().get(&Color::Red), Some(&2));

        assert_eq!(grid.set_empty(CellCoord::new(0, 0)), Some(Color::Red));
        assert_eq!(grid.set_empty(CellCoord::new(0, 0)), None);
        assert_eq!(grid.count_by_color().get(&Color::Red), Some(&1));
        assert!(!grid.is_empty());
    }

    #[test]
    fn iter_filled_reports_row_major_coordinates() {
        let cells: Vec<_> = sample().iter_filled().collect();
        assert_eq!(
            cells,
            vec![
                (CellCoord::new(0, 0), Color::Red),
                (CellCoord::new(1, 1), Color::Red),
                (CellCoord::new(3, 2), Color::Blue),
            ]
        );
    }

    #[test]
    fn hash_tracks_contents_not_history() {
        let mut first = sample();
        let second = sample();
        assert_eq!(first.hash(), second.hash());

        let _ = first.set_empty(CellCoord::new(1, 1));
        assert_ne!(first.hash(), second.hash());

        let _ = first.set_pixel(CellCoord::new(1, 1), Color::Red);
        assert_eq!(first.hash(), second.hash());
    }

    #[test]
    fn zero_sized_grid_is_empty() {
        let grid = Grid::new(0, 7);
        assert!(grid.is_empty());
        assert_eq!(grid.get(CellCoord::new(0, 0)), None);
    }
}
