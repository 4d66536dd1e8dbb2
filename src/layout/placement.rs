//! Automatic tile placement.
//!
//! Each arrangement pass builds a fresh [`PlacementGrid`] for the current
//! terminal size and places the visible tiles one at a time, in configuration
//! order. A tile goes to the first position where it fits entirely on screen
//! without overlapping; when none exists it goes where the least of it hangs
//! off screen. Overlap is never allowed.
//!
//! ```
//! use room_tiles::layout::PlacementGrid;
//! use room_tiles::{Rect, Size};
//!
//! let mut grid = PlacementGrid::new(Size::new(40, 24), 0);
//! let first = grid.search(20, 10).unwrap();
//! grid.reserve(Rect::new(first.x, first.y, 10, 20))?;
//! let second = grid.search(20, 10).unwrap();
//! assert_eq!((second.y, second.x), (0, 10));
//! # Ok::<(), room_tiles::layout::GridError>(())
//! ```

use thiserror::Error;

use crate::geometry::{Rect, Size};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    #[error("cell ({row}, {col}) is already reserved")]
    CellOccupied { row: u16, col: u16 },
}

/// Chosen top-left corner plus the number of cells left off screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub y: u16,
    pub x: u16,
    pub loss: u32,
}

/// Occupancy map for a single arrangement pass.
#[derive(Debug, Clone)]
pub struct PlacementGrid {
    size: Size,
    inset: u16,
    cells: Vec<bool>,
}

impl PlacementGrid {
    /// `inset` keeps candidates off the outer frame when the screen has a border.
    pub fn new(size: Size, inset: u16) -> Self {
        Self {
            size,
            inset,
            cells: vec![false; size.width as usize * size.height as usize],
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    fn bottom(&self) -> u16 {
        self.size.height.saturating_sub(self.inset)
    }

    fn right(&self) -> u16 {
        self.size.width.saturating_sub(self.inset)
    }

    pub fn is_occupied(&self, row: u16, col: u16) -> bool {
        self.size.contains(row, col) && self.cells[self.index(row, col)]
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.iter().filter(|cell| **cell).count()
    }

    /// Loss of placing a `height`×`width` tile at `y`/`x`, or `None` when any
    /// on-screen cell of the footprint is taken.
    ///
    /// Every row past the bottom edge costs `width`; every row reaching past
    /// the right edge costs its overhang.
    pub fn inquire(&self, y: u16, x: u16, height: u16, width: u16) -> Option<u32> {
        let (bottom, right) = (self.bottom() as u32, self.right() as u32);
        let mut loss = 0u32;
        for dy in 0..height as u32 {
            let row = y as u32 + dy;
            if row >= bottom {
                loss += width as u32;
                continue;
            }
            for dx in 0..width as u32 {
                let col = x as u32 + dx;
                if col >= right {
                    loss += 1;
                } else if self.cells[self.index(row as u16, col as u16)] {
                    return None;
                }
            }
        }
        Some(loss)
    }

    /// Row-major scan for the best position. The first zero-loss candidate wins
    /// outright; otherwise the lowest loss, earliest in scan order on ties.
    pub fn search(&self, height: u16, width: u16) -> Option<Placement> {
        let mut best: Option<Placement> = None;
        for y in self.inset..self.bottom() {
            for x in self.inset..self.right() {
                let Some(loss) = self.inquire(y, x, height, width) else {
                    continue;
                };
                if loss == 0 {
                    return Some(Placement { y, x, loss });
                }
                if best.is_none_or(|current| loss < current.loss) {
                    best = Some(Placement { y, x, loss });
                }
            }
        }
        best
    }

    /// Mark the on-screen part of `rect` as taken. Fails without marking
    /// anything if a cell is already reserved.
    pub fn reserve(&mut self, rect: Rect) -> Result<(), GridError> {
        let visible = rect.clip(self.size);
        let rows = visible.y..visible.bottom();
        for row in rows.clone() {
            for col in visible.x..visible.right() {
                if self.cells[self.index(row, col)] {
                    return Err(GridError::CellOccupied { row, col });
                }
            }
        }
        for row in rows {
            for col in visible.x..visible.right() {
                let idx = self.index(row, col);
                self.cells[idx] = true;
            }
        }
        Ok(())
    }

    /// Search and reserve in one step.
    pub fn place(&mut self, height: u16, width: u16) -> Result<Option<Placement>, GridError> {
        let Some(placement) = self.search(height, width) else {
            return Ok(None);
        };
        self.reserve(Rect::new(placement.x, placement.y, width, height))?;
        Ok(Some(placement))
    }

    fn index(&self, row: u16, col: u16) -> usize {
        row as usize * self.size.width as usize + col as usize
    }
}

/// Place footprints (`height`, `width`) in order on a fresh grid. `None`
/// footprints belong to hidden tiles and are skipped.
pub fn arrange(
    size: Size,
    inset: u16,
    footprints: &[Option<(u16, u16)>],
) -> Result<Vec<Option<Placement>>, GridError> {
    let mut grid = PlacementGrid::new(size, inset);
    footprints
        .iter()
        .map(|footprint| match footprint {
            Some((height, width)) => grid.place(*height, *width),
            None => Ok(None),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tile_goes_top_left() {
        let grid = PlacementGrid::new(Size::new(40, 24), 0);
        assert_eq!(grid.search(5, 5), Some(Placement { y: 0, x: 0, loss: 0 }));
    }

    #[test]
    fn border_inset_shifts_the_origin() {
        let grid = PlacementGrid::new(Size::new(40, 24), 1);
        assert_eq!(grid.search(5, 5), Some(Placement { y: 1, x: 1, loss: 0 }));
        assert_eq!(grid.inquire(1, 35, 1, 5), Some(1));
    }

    #[test]
    fn loss_counts_rows_and_columns_off_screen() {
        let grid = PlacementGrid::new(Size::new(10, 5), 0);
        assert_eq!(grid.inquire(0, 0, 5, 10), Some(0));
        // Two rows below the bottom edge, width 4 each.
        assert_eq!(grid.inquire(3, 0, 4, 4), Some(8));
        // Two columns past the right edge on each of three rows.
        assert_eq!(grid.inquire(0, 8, 3, 4), Some(6));
    }

    #[test]
    fn occupied_cells_reject_candidates() {
        let mut grid = PlacementGrid::new(Size::new(10, 5), 0);
        grid.reserve(Rect::new(2, 2, 1, 1)).unwrap();
        assert_eq!(grid.inquire(0, 0, 3, 3), None);
        assert_eq!(grid.inquire(0, 3, 3, 3), Some(0));
    }

    #[test]
    fn oversized_tile_takes_minimum_loss_position() {
        let mut grid = PlacementGrid::new(Size::new(10, 4), 0);
        grid.reserve(Rect::new(0, 0, 10, 2)).unwrap();
        let placement = grid.search(3, 4).unwrap();
        assert_eq!((placement.y, placement.x, placement.loss), (2, 0, 4));
    }

    #[test]
    fn full_grid_yields_no_placement() {
        let mut grid = PlacementGrid::new(Size::new(4, 4), 0);
        grid.reserve(Rect::new(0, 0, 4, 4)).unwrap();
        assert_eq!(grid.search(1, 1), None);
    }

    #[test]
    fn reserving_twice_is_an_error_and_atomic() {
        let mut grid = PlacementGrid::new(Size::new(10, 5), 0);
        grid.reserve(Rect::new(0, 0, 3, 3)).unwrap();
        let err = grid.reserve(Rect::new(2, 2, 3, 3)).unwrap_err();
        assert_eq!(err, GridError::CellOccupied { row: 2, col: 2 });
        assert_eq!(grid.occupied_cells(), 9);
    }

    #[test]
    fn placed_tiles_never_overlap() {
        let footprints: Vec<Option<(u16, u16)>> = [(5, 7), (3, 12), (8, 4), (2, 2), (6, 9), (4, 4)]
            .into_iter()
            .map(Some)
            .collect();
        let placements = arrange(Size::new(30, 15), 0, &footprints).unwrap();
        let rects: Vec<Rect> = placements
            .iter()
            .zip(&footprints)
            .filter_map(|(placement, footprint)| {
                let (height, width) = (*footprint)?;
                placement.map(|p| Rect::new(p.x, p.y, width, height).clip(Size::new(30, 15)))
            })
            .collect();
        assert_eq!(rects.len(), footprints.len());
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn hiding_a_tile_frees_its_footprint() {
        let size = Size::new(40, 24);
        let both = arrange(size, 0, &[Some((20, 10)), Some((20, 10))]).unwrap();
        assert_eq!(both[1].map(|p| (p.y, p.x)), Some((0, 10)));

        let after_hide = arrange(size, 0, &[Some((20, 10)), None, Some((20, 10))]).unwrap();
        assert_eq!(after_hide[1], None);
        assert_eq!(after_hide[2].map(|p| (p.y, p.x, p.loss)), Some((0, 10, 0)));
    }
}
