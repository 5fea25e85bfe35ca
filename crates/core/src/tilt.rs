//! Weight / tilt simulator - turns board imbalance into a platform angle
//!
//! Every real tile pushes down on its side of the platform with a force equal
//! to its column's distance from the centre. The difference between the two
//! sides, divided by the goal divisor, is the angle the platform swings
//! towards. The swing speed is the remaining distance, so the platform eases
//! into the goal. Leaving `[-fatal, +fatal]` degrees while moving breaks the
//! platform.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::grid::Grid;
use crate::piece::ActivePiece;
use crate::types::{BASELINE_WEIGHT, FATAL_TILT_DEG, TILT_GOAL_DIVISOR};

/// Tunables for the tilt simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiltConfig {
    /// Weight each side starts with before tiles are counted
    pub baseline_weight: i32,
    /// `goal = (left - right) / goal_divisor`
    pub goal_divisor: f32,
    /// Angle magnitude (degrees) past which the platform breaks
    pub fatal_angle_deg: f32,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            baseline_weight: BASELINE_WEIGHT,
            goal_divisor: TILT_GOAL_DIVISOR,
            fatal_angle_deg: FATAL_TILT_DEG,
        }
    }
}

/// Observable tilt state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TiltState {
    /// Angle the platform is heading for (degrees)
    pub goal_deg: f32,
    /// Current platform angle (degrees)
    pub angle_deg: f32,
    /// Still converging on the goal
    pub moving: bool,
    /// Times the angle reached or crossed the goal (wobbles)
    pub passed_goal_count: u32,
    /// Speed used by the last step (degrees per second)
    pub speed: f32,
    pub left_weight: i32,
    pub right_weight: i32,
}

/// Result of one simulation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiltStep {
    /// Not moving; nothing happened
    Idle,
    /// Moved towards the goal and is still within tolerance
    Moving,
    /// The angle left the safe range
    Fatal,
}

/// Per-column weight table plus the tilt state machine
#[derive(Debug, Clone, PartialEq)]
pub struct TiltSimulator {
    config: TiltConfig,
    /// Distance from centre for columns `1..=width`, at index `col - 1`
    column_weights: Vec<i32>,
    /// Columns `<= left_columns` push the left side down
    left_columns: i32,
    state: TiltState,
}

/// Distance-from-centre weights for every column of a `width`-wide grid.
///
/// Even widths give `w/2 .. 1, 1 .. w/2`; odd widths put a zero-weight
/// column in the middle.
pub fn column_weights(width: u16) -> Vec<i32> {
    let per_side = (width / 2) as i32;
    let mid_column = if width % 2 != 0 { per_side + 1 } else { 0 };

    let mut weights = Vec::with_capacity(width as usize);
    let mut offset = -per_side;
    for col in 1..=width as i32 {
        if col == mid_column {
            weights.push(0);
            continue;
        }
        weights.push(offset.abs());
        offset += 1;
        if offset == 0 {
            offset += 1;
        }
    }
    weights
}

impl TiltSimulator {
    /// Level simulator for a grid `width` columns wide; columns up to `width / 2` weigh on the left
    pub fn new(width: u16, config: TiltConfig) -> Self {
        if width % 2 != 0 {
            warn!(
                width,
                "odd grid width: centre column carries no weight and counts as right"
            );
        }
        Self {
            config,
            column_weights: column_weights(width),
            left_columns: (width / 2) as i32,
            state: TiltState {
                left_weight: config.baseline_weight,
                right_weight: config.baseline_weight,
                ..TiltState::default()
            },
        }
    }

    pub fn config(&self) -> &TiltConfig {
        &self.config
    }

    pub fn state(&self) -> &TiltState {
        &self.state
    }

    pub fn goal_deg(&self) -> f32 {
        self.state.goal_deg
    }

    pub fn angle_deg(&self) -> f32 {
        self.state.angle_deg
    }

    pub fn is_moving(&self) -> bool {
        self.state.moving
    }

    /// Overwrite the current angle (the host's physics owns the platform)
    pub fn set_angle(&mut self, angle_deg: f32) {
        self.state.angle_deg = angle_deg;
    }

    /// Weight of a single column
    pub fn column_weight(&self, col: i32) -> i32 {
        self.column_weights[(col - 1) as usize]
    }

    /// Recompute both side weights from the grid and aim at the new goal.
    ///
    /// Cells covered by `exclude` are skipped. Re-arms `moving`.
    pub fn calculate_weight(&mut self, grid: &Grid, exclude: Option<&ActivePiece>) {
        let mut left = self.config.baseline_weight;
        let mut right = self.config.baseline_weight;

        for tile in grid.tiles() {
            if exclude.is_some_and(|piece| piece.covers(tile.col, tile.row)) {
                continue;
            }
            let weight = self.column_weight(tile.col);
            if tile.col > self.left_columns {
                right += weight;
            } else {
                left += weight;
            }
        }

        self.state.left_weight = left;
        self.state.right_weight = right;
        self.state.goal_deg = (left - right) as f32 / self.config.goal_divisor;
        self.state.moving = true;
    }

    /// Advance the platform by `elapsed_ms`
    pub fn step(&mut self, elapsed_ms: u32) -> TiltStep {
        let state = &mut self.state;
        if !state.moving {
            return TiltStep::Idle;
        }

        let dt = elapsed_ms as f32 / 1000.0;
        state.speed = (state.angle_deg - state.goal_deg).abs();

        if state.angle_deg < state.goal_deg {
            state.angle_deg += dt * state.speed;
            if state.angle_deg >= state.goal_deg {
                state.passed_goal_count += 1;
            }
        } else if state.angle_deg > state.goal_deg {
            state.angle_deg -= dt * state.speed;
            if state.angle_deg <= state.goal_deg {
                state.passed_goal_count += 1;
            }
        }

        let limit = self.config.fatal_angle_deg;
        if state.angle_deg < -limit || state.angle_deg > limit {
            return TiltStep::Fatal;
        }
        TiltStep::Moving
    }

    /// Stop moving; the angle stays where it is
    pub fn halt(&mut self) {
        self.state.moving = false;
    }

    /// Level platform, baseline weights, not moving
    pub fn reset(&mut self) {
        self.state = TiltState {
            left_weight: self.config.baseline_weight,
            right_weight: self.config.baseline_weight,
            ..TiltState::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Position;
    use crate::types::ShapeId;

    #[test]
    fn test_even_column_weights() {
        assert_eq!(column_weights(10), vec![5, 4, 3, 2, 1, 1, 2, 3, 4, 5]);
        assert_eq!(column_weights(4), vec![2, 1, 1, 2]);
    }

    #[test]
    fn test_odd_column_weights() {
        assert_eq!(column_weights(9), vec![4, 3, 2, 1, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_grid_is_level() {
        let grid = Grid::new(10, 20);
        let mut tilt = TiltSimulator::new(10, TiltConfig::default());
        tilt.calculate_weight(&grid, None);

        assert_eq!(tilt.state().left_weight, 30);
        assert_eq!(tilt.state().right_weight, 30);
        assert_eq!(tilt.goal_deg(), 0.0);
        assert!(tilt.is_moving());
    }

    #[test]
    fn test_left_heavy_tilts_positive() {
        let mut grid = Grid::new(10, 20);
        grid.place(1, 1, ShapeId::I);
        grid.place(1, 2, ShapeId::I);
        grid.place(1, 3, ShapeId::Ghost);

        let mut tilt = TiltSimulator::new(10, TiltConfig::default());
        tilt.calculate_weight(&grid, None);

        assert_eq!(tilt.state().left_weight, 40);
        assert!((tilt.goal_deg() - 10.0 / 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_excluded_piece_does_not_weigh() {
        let mut grid = Grid::new(10, 20);
        let piece = ActivePiece::new(ShapeId::O, Position::new(9, 1, 0), 1, 0).unwrap();
        for (col, row) in piece.absolute_cells() {
            grid.place(col, row, ShapeId::O);
        }

        let mut tilt = TiltSimulator::new(10, TiltConfig::default());
        tilt.calculate_weight(&grid, Some(&piece));
        assert_eq!(tilt.state().right_weight, 30);

        tilt.calculate_weight(&grid, None);
        assert_eq!(tilt.state().right_weight, 30 + 2 * 4 + 2 * 5);
    }

    #[test]
    fn test_step_converges_towards_goal() {
        let mut tilt = TiltSimulator::new(10, TiltConfig::default());
        tilt.state.goal_deg = 3.0;
        tilt.state.moving = true;

        let mut last = tilt.angle_deg();
        for _ in 0..60 {
            assert_eq!(tilt.step(16), TiltStep::Moving);
            assert!(tilt.angle_deg() > last);
            assert!(tilt.angle_deg() <= 3.0);
            last = tilt.angle_deg();
        }
    }

    #[test]
    fn test_reaching_goal_counts_a_wobble() {
        let mut tilt = TiltSimulator::new(10, TiltConfig::default());
        tilt.state.goal_deg = -1.0;
        tilt.state.moving = true;

        // A full second at speed 1 lands exactly on the goal.
        assert_eq!(tilt.step(1000), TiltStep::Moving);
        assert_eq!(tilt.angle_deg(), -1.0);
        assert_eq!(tilt.state().passed_goal_count, 1);
    }

    #[test]
    fn test_reaching_positive_goal_counts_a_wobble() {
        let mut tilt = TiltSimulator::new(10, TiltConfig::default());
        tilt.state.goal_deg = 1.0;
        tilt.state.moving = true;

        assert_eq!(tilt.step(1000), TiltStep::Moving);
        assert_eq!(tilt.angle_deg(), 1.0);
        assert_eq!(tilt.state().passed_goal_count, 1);
    }

    #[test]
    fn test_fatal_on_either_side() {
        let grid = Grid::new(10, 20);
        for angle in [7.5, -7.5] {
            let mut tilt = TiltSimulator::new(10, TiltConfig::default());
            tilt.calculate_weight(&grid, None);
            tilt.set_angle(angle);
            assert_eq!(tilt.step(16), TiltStep::Fatal);
        }
    }

    #[test]
    fn test_idle_when_not_moving() {
        let mut tilt = TiltSimulator::new(10, TiltConfig::default());
        tilt.set_angle(9.0);
        assert_eq!(tilt.step(16), TiltStep::Idle);
    }

    #[test]
    fn test_reset_restores_baseline() {
        let grid = Grid::new(10, 20);
        let mut tilt = TiltSimulator::new(10, TiltConfig::default());
        tilt.calculate_weight(&grid, None);
        tilt.set_angle(2.5);

        tilt.reset();
        assert!(!tilt.is_moving());
        assert_eq!(tilt.angle_deg(), 0.0);
        assert_eq!(tilt.state().left_weight, 30);
    }
}
