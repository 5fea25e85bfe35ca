//! Tiltris (workspace facade crate).
//!
//! Re-exports the simulation as `tiltris::{core,types}` while the
//! implementation lives in dedicated crates under `crates/`.

pub use tiltris_core as core;
pub use tiltris_types as types;
