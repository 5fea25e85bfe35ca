//! Event sink - notifications for audio / UI collaborators
//!
//! The session calls one method per event. Every method has a default that
//! forwards to [`EventSink::on_event`], so a sink can either match on
//! [`GameEvent`] in one place or override just the callbacks it cares about.

use serde::Serialize;

/// Something a host may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum GameEvent {
    /// A player command moved the piece (gravity and hard drops are silent)
    PieceMoved,
    /// The active piece was committed to the grid
    PieceLocked,
    /// Rows removed by one lock
    LinesCleared(u32),
    /// New level reached
    LevelUp(u32),
    /// The session entered `GameOver`
    GameOver,
    /// The platform angle left the safe range
    TiltFatal,
}

pub trait EventSink {
    /// Catch-all; the per-event methods below route here by default
    fn on_event(&mut self, _event: GameEvent) {}

    fn piece_moved(&mut self) {
        self.on_event(GameEvent::PieceMoved);
    }

    fn piece_locked(&mut self) {
        self.on_event(GameEvent::PieceLocked);
    }

    fn lines_cleared(&mut self, count: u32) {
        self.on_event(GameEvent::LinesCleared(count));
    }

    fn level_up(&mut self, level: u32) {
        self.on_event(GameEvent::LevelUp(level));
    }

    fn game_over(&mut self) {
        self.on_event(GameEvent::GameOver);
    }

    fn tilt_fatal(&mut self) {
        self.on_event(GameEvent::TiltFatal);
    }
}

/// Records every event in order
impl EventSink for Vec<GameEvent> {
    fn on_event(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn on_event(&mut self, event: GameEvent) {
        (**self).on_event(event);
    }

    fn piece_moved(&mut self) {
        (**self).piece_moved();
    }

    fn piece_locked(&mut self) {
        (**self).piece_locked();
    }

    fn lines_cleared(&mut self, count: u32) {
        (**self).lines_cleared(count);
    }

    fn level_up(&mut self, level: u32) {
        (**self).level_up(level);
    }

    fn game_over(&mut self) {
        (**self).game_over();
    }

    fn tilt_fatal(&mut self) {
        (**self).tilt_fatal();
    }
}
