//! Active piece - position, rotation, and the gravity / lock timers
//!
//! The piece never writes itself into the grid; every movement is checked
//! against the grid with [`Grid::is_valid_placement`] and only committed when
//! valid, so the piece is always at a legal position.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::scoring::step_delay_ms;
use crate::shapes::{
    definition_of, kick_row, rotate_layout, wrap_index, CellLayout, ShapeDefinition,
};
use crate::types::{MoveDirection, RotationDirection, ShapeId};

/// Integer placement of a piece; `depth` is carried through for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    pub col: i32,
    pub row: i32,
    pub depth: i32,
}

impl Position {
    pub fn new(col: i32, row: i32, depth: i32) -> Self {
        Self { col, row, depth }
    }

    pub fn translated(self, dx: i32, dy: i32) -> Self {
        Self {
            col: self.col + dx,
            row: self.row + dy,
            ..self
        }
    }
}

/// Result of one gravity step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// The piece fell one row
    pub moved: bool,
    /// Lock delay has elapsed; the caller must lock the piece now
    pub lock_due: bool,
}

/// The currently controlled piece
#[derive(Debug, Clone, PartialEq)]
pub struct ActivePiece {
    definition: &'static ShapeDefinition,
    position: Position,
    cells: CellLayout,
    rotation: u8,
    lock_elapsed_ms: u32,
    next_step_at_ms: u64,
    level: u32,
}

impl ActivePiece {
    /// Create a piece at `position` with rotation 0.
    ///
    /// Returns `None` for `Ghost`, which cannot be spawned.
    pub fn new(shape: ShapeId, position: Position, level: u32, now_ms: u64) -> Option<Self> {
        let definition = definition_of(shape)?;
        let mut piece = Self {
            definition,
            position,
            cells: definition.cells,
            rotation: 0,
            lock_elapsed_ms: 0,
            next_step_at_ms: 0,
            level,
        };
        piece.schedule_step(now_ms);
        Some(piece)
    }

    pub fn shape(&self) -> ShapeId {
        self.definition.shape
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Cell offsets after rotation, relative to `position`
    pub fn cells(&self) -> &CellLayout {
        &self.cells
    }

    /// Rotation state in `0..4`
    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lock_elapsed_ms(&self) -> u32 {
        self.lock_elapsed_ms
    }

    pub fn next_step_at_ms(&self) -> u64 {
        self.next_step_at_ms
    }

    /// Absolute `(col, row)` of every cell
    pub fn absolute_cells(&self) -> [(i32, i32); 4] {
        self.cells
            .map(|(dx, dy)| (self.position.col + dx, self.position.row + dy))
    }

    /// True when one of the piece's cells sits on `(col, row)`
    pub fn covers(&self, col: i32, row: i32) -> bool {
        self.absolute_cells().contains(&(col, row))
    }

    /// True when the piece fits the grid where it is
    pub fn is_valid(&self, grid: &Grid) -> bool {
        grid.is_valid_placement(&self.cells, self.position.col, self.position.row)
    }

    /// Set the next gravity deadline from the level's step delay
    pub fn schedule_step(&mut self, now_ms: u64) {
        self.next_step_at_ms = now_ms + step_delay_ms(self.level) as u64;
    }

    /// Advance the lock timer
    pub fn accumulate_lock_time(&mut self, elapsed_ms: u32) {
        self.lock_elapsed_ms = self.lock_elapsed_ms.saturating_add(elapsed_ms);
    }

    /// True once the gravity deadline has passed
    pub fn step_due(&self, now_ms: u64) -> bool {
        now_ms >= self.next_step_at_ms
    }

    /// Translate by `(dx, dy)` if the destination is valid.
    ///
    /// A successful move resets the lock timer.
    pub fn translate(&mut self, grid: &Grid, dx: i32, dy: i32) -> bool {
        let candidate = self.position.translated(dx, dy);
        if !grid.is_valid_placement(&self.cells, candidate.col, candidate.row) {
            return false;
        }
        self.position = candidate;
        self.lock_elapsed_ms = 0;
        true
    }

    /// One-cell move in `direction`
    pub fn shift(&mut self, grid: &Grid, direction: MoveDirection) -> bool {
        let (dx, dy) = direction.delta();
        self.translate(grid, dx, dy)
    }

    /// Rotate with wall kicks.
    ///
    /// The first kick candidate that yields a valid position wins. When none
    /// does, rotation index and cells are restored exactly.
    pub fn rotate(&mut self, grid: &Grid, direction: RotationDirection) -> bool {
        let original_rotation = self.rotation;
        self.rotation = wrap_index(self.rotation as i32 + direction.sign(), 4) as u8;
        rotate_layout(&mut self.cells, self.definition.pivot, direction);

        let kicks = self.definition.kicks;
        let row = kick_row(self.rotation, direction, kicks.len());
        let kicked = kicks[row]
            .iter()
            .any(|&(dx, dy)| self.translate(grid, dx, dy));

        if !kicked {
            self.rotation = original_rotation;
            rotate_layout(&mut self.cells, self.definition.pivot, direction.reversed());
        }
        kicked
    }

    /// Gravity tick: reschedule, try to fall one row, then report whether
    /// the lock delay has run out (regardless of whether the fall succeeded).
    pub fn step(&mut self, grid: &Grid, now_ms: u64, lock_delay_ms: u32) -> StepOutcome {
        self.schedule_step(now_ms);
        let moved = self.shift(grid, MoveDirection::Down);
        StepOutcome {
            moved,
            lock_due: self.lock_elapsed_ms >= lock_delay_ms,
        }
    }

    /// Fall until blocked; returns the number of rows dropped
    pub fn drop_to_floor(&mut self, grid: &Grid) -> u32 {
        let mut rows = 0;
        while self.shift(grid, MoveDirection::Down) {
            rows += 1;
        }
        rows
    }

    /// Position the piece would come to rest at if dropped now
    pub fn landing_position(&self, grid: &Grid) -> Position {
        let mut landing = self.position;
        while grid.is_valid_placement(&self.cells, landing.col, landing.row - 1) {
            landing.row -= 1;
        }
        landing
    }
}
