use std::hash::Hasher;

use serde::Serialize;

use crate::events::EventSink;
use crate::piece::{ActivePiece, Position};
use crate::session::Session;
use crate::tilt::TiltState;
use crate::types::{SessionPhase, ShapeId};

/// Stable 64-bit FNV-1a hasher for the board hash.
///
/// `DefaultHasher` output is not guaranteed stable across Rust versions.
#[derive(Debug, Clone)]
pub struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl Default for Fnv1aHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= b as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActiveSnapshot {
    pub shape: ShapeId,
    pub position: Position,
    pub rotation: u8,
    pub cells: [(i32, i32); 4],
}

impl From<&ActivePiece> for ActiveSnapshot {
    fn from(value: &ActivePiece) -> Self {
        Self {
            shape: value.shape(),
            position: value.position(),
            rotation: value.rotation(),
            cells: value.absolute_cells(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub score: u32,
    pub level: u32,
    pub rows_since_level_up: u32,
    pub next: Option<ShapeId>,
    pub held: Option<ShapeId>,
    pub active: Option<ActiveSnapshot>,
    /// Cell codes, bottom row first: 0 empty, 1..=7 shapes, 8 ghost
    pub grid: Vec<Vec<u8>>,
    /// FNV-1a over `grid` in row order
    pub board_hash: u64,
    pub tilt: TiltState,
    pub clock_ms: u64,
}

impl SessionSnapshot {
    pub fn capture<S: EventSink>(session: &Session<S>) -> Self {
        let grid = session.grid().code_rows();
        let board_hash = board_hash(&grid);

        Self {
            phase: session.phase(),
            score: session.score(),
            level: session.level(),
            rows_since_level_up: session.rows_since_level_up(),
            next: session.next_shape(),
            held: session.held_shape(),
            active: session.active().map(ActiveSnapshot::from),
            grid,
            board_hash,
            tilt: *session.tilt_state(),
            clock_ms: session.clock_ms(),
        }
    }

    pub fn playable(&self) -> bool {
        self.phase == SessionPhase::Playing
    }
}

/// FNV-1a over every cell code, bottom row first
pub fn board_hash(rows: &[Vec<u8>]) -> u64 {
    let mut hasher = Fnv1aHasher::new();
    for row in rows {
        hasher.write(row);
    }
    hasher.finish()
}
