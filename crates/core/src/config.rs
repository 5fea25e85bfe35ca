//! Session configuration
//!
//! Everything here is user input (usually a JSON file handed to the headless
//! binary), so it is validated once when a session is built. Command paths
//! never see an invalid configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::Grid;
use crate::piece::Position;
use crate::shapes::definition_of;
use crate::tilt::TiltConfig;
use crate::types::{
    ShapeId, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, DEFAULT_SPAWN_COL, DEFAULT_SPAWN_ROW,
    DEFAULT_STARTING_LEVEL, LOCK_DELAY_MS,
};

/// Smallest grid every shape can spawn and rotate in
pub const MIN_GRID_WIDTH: u16 = 4;
pub const MIN_GRID_HEIGHT: u16 = 4;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Grid is too small to hold every shape.
    #[error("grid {width}x{height} is smaller than the 4x4 minimum")]
    GridTooSmall { width: u16, height: u16 },

    /// A shape would spawn partly outside the grid.
    #[error("spawn point ({col}, {row}) puts shape {shape:?} outside the grid")]
    SpawnOutOfBounds { col: i32, row: i32, shape: ShapeId },

    /// Levels start at 1.
    #[error("starting level must be at least 1")]
    StartingLevel,

    /// Tilt tunable must be strictly positive.
    #[error("tilt {name} must be positive, got {value}")]
    NonPositiveTilt { name: &'static str, value: f32 },

    /// Malformed JSON.
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tunables for one session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub grid_width: u16,
    pub grid_height: u16,
    /// Where new pieces appear (rotation 0)
    pub spawn: Position,
    pub starting_level: u32,
    /// Grace period before a resting piece locks
    pub lock_delay_ms: u32,
    /// Seeds the bag randomizer
    pub seed: u32,
    /// Paint ghost cells at the landing position
    pub show_ghost: bool,
    /// Allow only one hold per spawned piece
    pub hold_once_per_piece: bool,
    pub tilt: TiltConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            grid_width: DEFAULT_GRID_WIDTH,
            grid_height: DEFAULT_GRID_HEIGHT,
            spawn: Position::new(DEFAULT_SPAWN_COL, DEFAULT_SPAWN_ROW, 0),
            starting_level: DEFAULT_STARTING_LEVEL,
            lock_delay_ms: LOCK_DELAY_MS,
            seed: 1,
            show_ghost: true,
            hold_once_per_piece: false,
            tilt: TiltConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Parse and validate a JSON document; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width < MIN_GRID_WIDTH || self.grid_height < MIN_GRID_HEIGHT {
            return Err(ConfigError::GridTooSmall {
                width: self.grid_width,
                height: self.grid_height,
            });
        }

        let empty = Grid::new(self.grid_width, self.grid_height);
        for shape in ShapeId::PLAYABLE {
            let Some(definition) = definition_of(shape) else {
                continue;
            };
            if !empty.is_valid_placement(&definition.cells, self.spawn.col, self.spawn.row) {
                return Err(ConfigError::SpawnOutOfBounds {
                    col: self.spawn.col,
                    row: self.spawn.row,
                    shape,
                });
            }
        }

        if self.starting_level < 1 {
            return Err(ConfigError::StartingLevel);
        }

        let tilt = &self.tilt;
        for (name, value) in [
            ("goal_divisor", tilt.goal_divisor),
            ("fatal_angle_deg", tilt.fatal_angle_deg),
        ] {
            // `!(x > 0)` also rejects NaN
            if !(value > 0.0) {
                return Err(ConfigError::NonPositiveTilt { name, value });
            }
        }

        Ok(())
    }
}
