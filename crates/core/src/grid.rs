//! Grid module - logical occupancy of the playfield
//!
//! Columns run `1..=width`, rows run `1..=height` from the bottom up. Storage
//! is a flat row-major vector so a bounds check is one comparison per axis and
//! clearing or shifting never reallocates.
//!
//! Only the locked geometry and ghost preview cells live here; the active
//! piece is kept separately and validated against the grid.
//!
//! Accessors that take a coordinate panic when it is out of range. Placement
//! validation is the one place that expects arbitrary coordinates and goes
//! through [`Grid::is_valid_placement`].

use serde::Serialize;

use crate::shapes::CellLayout;
use crate::types::{Cell, ShapeId};

/// A real tile on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Tile {
    pub col: i32,
    pub row: i32,
    pub shape: ShapeId,
}

/// The playfield occupancy matrix
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: u16,
    height: u16,
    /// Row-major cells, bottom row first: `(row - 1) * width + (col - 1)`
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty grid
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// True when `(col, row)` lies inside `[1, width] × [1, height]`
    #[inline(always)]
    pub fn contains(&self, col: i32, row: i32) -> bool {
        col >= 1 && col <= self.width as i32 && row >= 1 && row <= self.height as i32
    }

    #[inline(always)]
    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if !self.contains(col, row) {
            return None;
        }
        Some((row - 1) as usize * self.width as usize + (col - 1) as usize)
    }

    #[inline(always)]
    fn slot(&self, col: i32, row: i32) -> usize {
        match self.index(col, row) {
            Some(idx) => idx,
            None => panic!(
                "grid access out of range: ({}, {}) on a {}x{} grid",
                col, row, self.width, self.height
            ),
        }
    }

    /// Cell at `(col, row)`, or `None` when out of range
    pub fn get(&self, col: i32, row: i32) -> Option<Cell> {
        self.index(col, row).map(|idx| self.cells[idx])
    }

    /// Occupant of an in-range cell
    pub fn occupant(&self, col: i32, row: i32) -> Cell {
        self.cells[self.slot(col, row)]
    }

    /// Write `shape` into a cell.
    ///
    /// A real shape replaces whatever was there. A ghost never displaces a
    /// real tile, so writing `Ghost` over real geometry is a no-op.
    pub fn place(&mut self, col: i32, row: i32, shape: ShapeId) {
        let idx = self.slot(col, row);
        if shape == ShapeId::Ghost && self.cells[idx].is_some_and(|s| s.is_real()) {
            return;
        }
        self.cells[idx] = Some(shape);
    }

    /// Empty a cell. With `ghost_only` set, real tiles are left alone.
    pub fn clear(&mut self, col: i32, row: i32, ghost_only: bool) {
        let idx = self.slot(col, row);
        if ghost_only && self.cells[idx] != Some(ShapeId::Ghost) {
            return;
        }
        self.cells[idx] = None;
    }

    /// True iff the cell holds a shape other than `Ghost`
    pub fn has_real_tile(&self, col: i32, row: i32) -> bool {
        self.occupant(col, row).is_some_and(|s| s.is_real())
    }

    /// True iff every column of `row` has a real tile
    pub fn is_row_full(&self, row: i32) -> bool {
        (1..=self.width as i32).all(|col| self.has_real_tile(col, row))
    }

    /// Clear `row` and shift every real tile above it down by one.
    ///
    /// Each source cell is vacated before its tile is written one row lower,
    /// so a cell never holds two occupants mid-shift.
    pub fn compact_from(&mut self, row: i32) {
        for col in 1..=self.width as i32 {
            self.clear(col, row, false);
        }

        for src_row in (row + 1)..=self.height as i32 {
            for col in 1..=self.width as i32 {
                let src = self.slot(col, src_row);
                let Some(shape) = self.cells[src].filter(|s| s.is_real()) else {
                    continue;
                };
                self.cells[src] = None;
                self.place(col, src_row - 1, shape);
            }
        }
    }

    /// True when every cell of `cells` offset by `(col, row)` is in range and
    /// free of real tiles. Ghost cells never block.
    pub fn is_valid_placement(&self, cells: &CellLayout, col: i32, row: i32) -> bool {
        cells.iter().all(|&(dx, dy)| match self.get(col + dx, row + dy) {
            Some(cell) => !cell.is_some_and(|s| s.is_real()),
            None => false,
        })
    }

    /// Commit a piece's cells into the grid
    pub fn set_piece(&mut self, cells: &CellLayout, col: i32, row: i32, shape: ShapeId) {
        for &(dx, dy) in cells {
            self.place(col + dx, row + dy, shape);
        }
    }

    /// Empty the whole grid
    pub fn clear_all(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Iterate over every real tile, bottom row first
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        let width = self.width as usize;
        self.cells.iter().enumerate().filter_map(move |(idx, cell)| {
            let shape = cell.filter(|s| s.is_real())?;
            Some(Tile {
                col: (idx % width) as i32 + 1,
                row: (idx / width) as i32 + 1,
                shape,
            })
        })
    }

    /// Number of real tiles on the grid
    pub fn real_tile_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| c.is_some_and(|s| s.is_real()))
            .count()
    }

    /// Cell codes row by row, bottom row first (0 = empty)
    pub fn code_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.width as usize)
            .map(|row| row.iter().map(|c| c.map_or(0, |s| s.code())).collect())
            .collect()
    }
}
