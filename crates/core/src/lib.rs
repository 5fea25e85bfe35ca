//! Core simulation - pure, deterministic, and testable
//!
//! This crate contains the rules of a falling-block puzzle played on a
//! platform that tilts under the weight of the stack. It has no dependency on
//! rendering, audio, physics or networking; hosts drive it with discrete
//! commands and a tick, and react to the events it emits.
//!
//! - **Deterministic**: the same seed (or scripted queue) and the same command
//!   / tick sequence always produce the same game
//! - **Headless**: runs anywhere, including tests and benchmarks
//!
//! # Module Structure
//!
//! - [`shapes`]: tetromino cell layouts, rotation transform, wall-kick tables
//! - [`bag`]: 7-bag randomizer and the draw queue
//! - [`grid`]: occupancy matrix with ghost-aware placement and compaction
//! - [`piece`]: the active piece (moves, rotation with kicks, gravity, lock timer)
//! - [`scoring`]: line clears, score table, level progression, step delays
//! - [`tilt`]: weight imbalance → goal angle → platform angle state machine
//! - [`events`]: the [`EventSink`] trait audio / UI collaborators implement
//! - [`config`]: validated [`SessionConfig`]
//! - [`session`]: the [`Session`] orchestrator
//! - [`snapshot`]: serializable [`SessionSnapshot`]
//!
//! # Example
//!
//! ```
//! use tiltris_core::{Session, SessionConfig};
//! use tiltris_core::events::GameEvent;
//! use tiltris_types::{GameCommand, SessionPhase};
//!
//! let mut session = Session::new(SessionConfig::default(), Vec::<GameEvent>::new()).unwrap();
//! session.apply(GameCommand::Start);
//! assert_eq!(session.phase(), SessionPhase::Playing);
//!
//! session.apply(GameCommand::MoveLeft);
//! session.apply(GameCommand::HardDrop);
//! assert!(session.sink().contains(&GameEvent::PieceLocked));
//!
//! // Advance one 16ms frame.
//! session.tick(16);
//! ```
//!
//! # Timing
//!
//! Time only moves through [`Session::tick`]. Gravity fires when the session
//! clock passes the piece's step deadline (800ms at level 1, down to 17ms at
//! level 30); a piece that has not moved for the lock delay (500ms) locks on
//! the next gravity step.

pub mod bag;
pub mod config;
pub mod events;
pub mod grid;
pub mod piece;
pub mod scoring;
pub mod session;
pub mod shapes;
pub mod snapshot;
pub mod tilt;

pub use tiltris_types as types;

// Re-export commonly used types for convenience
pub use bag::{DrawQueue, SimpleRng};
pub use config::{ConfigError, SessionConfig};
pub use events::{EventSink, GameEvent, NullSink};
pub use grid::{Grid, Tile};
pub use piece::{ActivePiece, Position};
pub use scoring::{clear_lines, line_clear_points, step_delay_ms, LineClear, Progress};
pub use session::Session;
pub use shapes::{definition_of, ShapeDefinition};
pub use snapshot::{ActiveSnapshot, SessionSnapshot};
pub use tilt::{TiltConfig, TiltSimulator, TiltState, TiltStep};
