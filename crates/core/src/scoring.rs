//! Scoring module - line clears, score table and level progression
//!
//! A single lock scores `LINE_CLEAR_MULTIPLIERS[lines] * POINTS_PER_MULTIPLIER`.
//! Level is tracked separately: every `ROWS_PER_LEVEL` rows cleared (counted per
//! row, not per lock) raise the level by one. Level only affects gravity.

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::types::{
    LINE_CLEAR_MULTIPLIERS, POINTS_PER_MULTIPLIER, ROWS_PER_LEVEL, STEP_DELAYS_MS,
};

/// Running score and level state for one game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub score: u32,
    pub level: u32,
    /// Rows cleared since the last level-up
    pub rows_since_level_up: u32,
}

impl Progress {
    pub fn new(starting_level: u32) -> Self {
        Self {
            score: 0,
            level: starting_level,
            rows_since_level_up: 0,
        }
    }

    /// Count one cleared row; returns the new level if it just went up
    fn record_row(&mut self) -> Option<u32> {
        self.rows_since_level_up += 1;
        if self.rows_since_level_up >= ROWS_PER_LEVEL {
            self.level += 1;
            self.rows_since_level_up = 0;
            return Some(self.level);
        }
        None
    }
}

/// What a single `clear_lines` pass did
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineClear {
    /// Number of rows removed
    pub lines: u32,
    /// Row indices as examined, bottom first (first four only)
    pub rows: ArrayVec<i32, 4>,
    /// Points added to the score
    pub points: u32,
    /// Levels reached during this pass, in order
    pub level_ups: ArrayVec<u32, 4>,
}

/// Points for clearing `lines` rows with one lock.
///
/// Counts above four use the four-line entry.
pub fn line_clear_points(lines: u32) -> u32 {
    let idx = (lines as usize).min(LINE_CLEAR_MULTIPLIERS.len() - 1);
    LINE_CLEAR_MULTIPLIERS[idx] * POINTS_PER_MULTIPLIER
}

/// Remove every full row and update `progress`.
///
/// Rows are examined bottom to top. After a full row is compacted the same
/// row index is examined again, since the row above has just slid into it.
pub fn clear_lines(grid: &mut Grid, progress: &mut Progress) -> LineClear {
    let mut result = LineClear::default();
    let mut row = 1;

    while row <= grid.height() as i32 {
        if !grid.is_row_full(row) {
            row += 1;
            continue;
        }

        result.lines += 1;
        let _ = result.rows.try_push(row);
        if let Some(level) = progress.record_row() {
            let _ = result.level_ups.try_push(level);
        }
        grid.compact_from(row);
    }

    result.points = line_clear_points(result.lines);
    progress.score = progress.score.saturating_add(result.points);
    result
}

/// Gravity interval for a level, clamped to the table's range
pub fn step_delay_ms(level: u32) -> u32 {
    let idx = (level.max(1) as usize - 1).min(STEP_DELAYS_MS.len() - 1);
    STEP_DELAYS_MS[idx]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ShapeId;

    fn fill_row(grid: &mut Grid, row: i32) {
        for col in 1..=grid.width() as i32 {
            grid.place(col, row, ShapeId::I);
        }
    }

    #[test]
    fn test_line_clear_points() {
        assert_eq!(line_clear_points(0), 0);
        assert_eq!(line_clear_points(1), 1000);
        assert_eq!(line_clear_points(2), 2000);
        assert_eq!(line_clear_points(3), 4000);
        assert_eq!(line_clear_points(4), 8000);
        assert_eq!(line_clear_points(6), 8000);
    }

    #[test]
    fn test_step_delays() {
        assert_eq!(step_delay_ms(0), 800);
        assert_eq!(step_delay_ms(1), 800);
        assert_eq!(step_delay_ms(10), 100);
        assert_eq!(step_delay_ms(30), 17);
        assert_eq!(step_delay_ms(31), 17);
    }

    #[test]
    fn test_clear_lines_rechecks_same_row() {
        let mut grid = Grid::new(4, 6);
        fill_row(&mut grid, 1);
        fill_row(&mut grid, 2);
        grid.place(2, 3, ShapeId::T);

        let mut progress = Progress::new(1);
        let clear = clear_lines(&mut grid, &mut progress);

        assert_eq!(clear.lines, 2);
        assert_eq!(clear.rows.as_slice(), &[1, 1]);
        assert_eq!(clear.points, 2000);
        assert_eq!(progress.score, 2000);
        assert_eq!(grid.occupant(2, 1), Some(ShapeId::T));
        assert_eq!(grid.real_tile_count(), 1);
    }

    #[test]
    fn test_level_up_every_ten_rows() {
        let mut grid = Grid::new(4, 12);
        let mut progress = Progress::new(1);
        progress.rows_since_level_up = 8;

        fill_row(&mut grid, 1);
        fill_row(&mut grid, 2);
        fill_row(&mut grid, 3);
        let clear = clear_lines(&mut grid, &mut progress);

        assert_eq!(clear.lines, 3);
        assert_eq!(clear.level_ups.as_slice(), &[2]);
        assert_eq!(progress.level, 2);
        assert_eq!(progress.rows_since_level_up, 1);
        assert_eq!(progress.score, 4000);
    }

    #[test]
    fn test_no_full_rows_is_noop() {
        let mut grid = Grid::new(4, 4);
        grid.place(1, 1, ShapeId::S);
        grid.place(3, 2, ShapeId::Ghost);
        let before = grid.clone();

        let mut progress = Progress::new(1);
        let clear = clear_lines(&mut grid, &mut progress);

        assert_eq!(clear, LineClear::default());
        assert_eq!(grid, before);
        assert_eq!(progress, Progress::new(1));
    }
}
