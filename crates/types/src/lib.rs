//! Shared types and constants for the tilting-board simulation.
//!
//! Everything here is plain data with no behavior beyond parsing and small
//! conversions, so it can be used by the simulation core, a renderer, or a
//! remote controller alike.
//!
//! # Grid coordinates
//!
//! Columns run `1..=width` left to right, rows run `1..=height` bottom to top.
//! "Down" decrements the row. The default playfield is 10 × 20.
//!
//! # Timing
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Reference tick interval (~60 FPS) |
//! | `LOCK_DELAY_MS` | 500 | Grace period before a resting piece locks |
//! | `STEP_DELAYS_MS` | 800 … 17 | Gravity cadence for levels 1..=30 |
//!
//! # Examples
//!
//! ```
//! use tiltris_types::{GameCommand, ShapeId, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH};
//!
//! assert_eq!(ShapeId::from_str("t"), Some(ShapeId::T));
//! assert_eq!(GameCommand::from_str("hardDrop"), Some(GameCommand::HardDrop));
//! assert_eq!(DEFAULT_GRID_WIDTH, 10);
//! assert_eq!(DEFAULT_GRID_HEIGHT, 20);
//! ```

use serde::{Deserialize, Serialize};

/// Default grid width in columns
pub const DEFAULT_GRID_WIDTH: u16 = 10;

/// Default grid height in rows
pub const DEFAULT_GRID_HEIGHT: u16 = 20;

/// Default spawn column (1-based)
pub const DEFAULT_SPAWN_COL: i32 = 5;

/// Default spawn row (1-based, counted from the bottom)
pub const DEFAULT_SPAWN_ROW: i32 = 19;

/// Reference tick interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Grace period before a piece that cannot fall is committed to the grid
pub const LOCK_DELAY_MS: u32 = 500;

/// Level a fresh session starts on
pub const DEFAULT_STARTING_LEVEL: u32 = 1;

/// Gravity step delay per level (milliseconds per row).
///
/// Index 0 = level 1, index 29 = level 30 and above.
pub const STEP_DELAYS_MS: [u32; 30] = [
    800, 717, 633, 550, 467, 383, 300, 217, 133, 100, // 1-10
    83, 83, 83, 67, 67, 67, 50, 50, 50, 33, // 11-20
    33, 33, 33, 33, 33, 33, 33, 33, 33, 17, // 21-30
];

/// Score multiplier per number of lines cleared by a single lock
pub const LINE_CLEAR_MULTIPLIERS: [u32; 5] = [0, 1, 2, 4, 8];

/// Points awarded per unit of line-clear multiplier
pub const POINTS_PER_MULTIPLIER: u32 = 1000;

/// Rows that must be cleared to gain one level
pub const ROWS_PER_LEVEL: u32 = 10;

/// Weight each side of the platform starts with before tiles are counted
pub const BASELINE_WEIGHT: i32 = 30;

/// Weight difference is divided by this to get the goal angle in degrees
pub const TILT_GOAL_DIVISOR: f32 = 3.0;

/// The platform breaks once its angle leaves `[-FATAL_TILT_DEG, FATAL_TILT_DEG]`
pub const FATAL_TILT_DEG: f32 = 7.0;

/// The seven tetromino kinds plus the preview-only ghost marker
///
/// `Ghost` cells are painted into the grid to show where the active piece
/// will land. They never block placement, never count as weight and never
/// complete a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeId {
    I,
    O,
    T,
    J,
    L,
    S,
    Z,
    Ghost,
}

impl ShapeId {
    /// Every shape a bag can produce, in catalog order
    pub const PLAYABLE: [ShapeId; 7] = [
        ShapeId::I,
        ShapeId::O,
        ShapeId::T,
        ShapeId::J,
        ShapeId::L,
        ShapeId::S,
        ShapeId::Z,
    ];

    /// Parse a shape from its letter (case-insensitive)
    ///
    /// ```
    /// use tiltris_types::ShapeId;
    ///
    /// assert_eq!(ShapeId::from_str("i"), Some(ShapeId::I));
    /// assert_eq!(ShapeId::from_str("Ghost"), Some(ShapeId::Ghost));
    /// assert_eq!(ShapeId::from_str("x"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(ShapeId::I),
            "o" => Some(ShapeId::O),
            "t" => Some(ShapeId::T),
            "j" => Some(ShapeId::J),
            "l" => Some(ShapeId::L),
            "s" => Some(ShapeId::S),
            "z" => Some(ShapeId::Z),
            "ghost" => Some(ShapeId::Ghost),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeId::I => "i",
            ShapeId::O => "o",
            ShapeId::T => "t",
            ShapeId::J => "j",
            ShapeId::L => "l",
            ShapeId::S => "s",
            ShapeId::Z => "z",
            ShapeId::Ghost => "ghost",
        }
    }

    /// Compact cell code used by snapshots: 1..=7 for real shapes, 8 for ghost
    pub fn code(&self) -> u8 {
        match self {
            ShapeId::I => 1,
            ShapeId::O => 2,
            ShapeId::T => 3,
            ShapeId::J => 4,
            ShapeId::L => 5,
            ShapeId::S => 6,
            ShapeId::Z => 7,
            ShapeId::Ghost => 8,
        }
    }

    /// True for every shape except `Ghost`
    pub fn is_real(&self) -> bool {
        !matches!(self, ShapeId::Ghost)
    }
}

/// A grid cell: `None` when empty
pub type Cell = Option<ShapeId>;

/// Translation direction for the active piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveDirection {
    Left,
    Right,
    Down,
}

impl MoveDirection {
    /// Column/row delta for this direction (rows grow upward)
    pub fn delta(&self) -> (i32, i32) {
        match self {
            MoveDirection::Left => (-1, 0),
            MoveDirection::Right => (1, 0),
            MoveDirection::Down => (0, -1),
        }
    }
}

/// Rotation direction; `Clockwise` is `+1` in the rotation-index space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    pub fn sign(&self) -> i32 {
        match self {
            RotationDirection::Clockwise => 1,
            RotationDirection::CounterClockwise => -1,
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            RotationDirection::Clockwise => RotationDirection::CounterClockwise,
            RotationDirection::CounterClockwise => RotationDirection::Clockwise,
        }
    }
}

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    MainMenu,
    Playing,
    GameOver,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::MainMenu => "mainMenu",
            SessionPhase::Playing => "playing",
            SessionPhase::GameOver => "gameOver",
        }
    }
}

/// Discrete commands a host can send to a session
///
/// These are the only inputs the simulation understands; device handling
/// (keys, repeat, gamepads) is the host's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameCommand {
    /// Shift one column left
    MoveLeft,
    /// Shift one column right
    MoveRight,
    /// Shift one row down
    SoftDrop,
    /// Fall until blocked, then lock
    HardDrop,
    /// Rotate 90° clockwise
    RotateCw,
    /// Rotate 90° counter-clockwise
    RotateCcw,
    /// Swap the active shape with the hold slot
    Hold,
    /// Leave the main menu and begin a game
    Start,
    /// Dismiss the game-over screen and return to the main menu
    AcknowledgeGameOver,
}

impl GameCommand {
    /// Parse a command from its camelCase name (case-insensitive)
    ///
    /// ```
    /// use tiltris_types::GameCommand;
    ///
    /// assert_eq!(GameCommand::from_str("moveLeft"), Some(GameCommand::MoveLeft));
    /// assert_eq!(GameCommand::from_str("ROTATECW"), Some(GameCommand::RotateCw));
    /// assert_eq!(GameCommand::from_str("pause"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameCommand::MoveLeft),
            "moveright" => Some(GameCommand::MoveRight),
            "softdrop" => Some(GameCommand::SoftDrop),
            "harddrop" => Some(GameCommand::HardDrop),
            "rotatecw" => Some(GameCommand::RotateCw),
            "rotateccw" => Some(GameCommand::RotateCcw),
            "hold" => Some(GameCommand::Hold),
            "start" => Some(GameCommand::Start),
            "acknowledgegameover" => Some(GameCommand::AcknowledgeGameOver),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameCommand::MoveLeft => "moveLeft",
            GameCommand::MoveRight => "moveRight",
            GameCommand::SoftDrop => "softDrop",
            GameCommand::HardDrop => "hardDrop",
            GameCommand::RotateCw => "rotateCw",
            GameCommand::RotateCcw => "rotateCcw",
            GameCommand::Hold => "hold",
            GameCommand::Start => "start",
            GameCommand::AcknowledgeGameOver => "acknowledgeGameOver",
        }
    }
}
