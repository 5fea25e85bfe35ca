//! Game session - ties grid, pieces, scoring and tilt together
//!
//! A [`Session`] owns everything one game needs and drives the
//! spawn → step → lock → clear → reweigh → respawn cycle. Hosts talk to it
//! through a small command surface (`start`, `move_piece`, `rotate`,
//! `hold_swap`, `hard_drop`, `soft_drop`, `tick`, `acknowledge_game_over`) or
//! the equivalent [`GameCommand`]s via [`Session::apply`], and observe it
//! through the query accessors, [`Session::snapshot`], and the
//! [`EventSink`] it was built with.
//!
//! Commands never fail with an error: an illegal move just returns `false`,
//! and the two losing conditions (blocked spawn, fatal tilt) are phase
//! transitions to [`SessionPhase::GameOver`].

use tracing::{debug, info};

use crate::bag::DrawQueue;
use crate::config::{ConfigError, SessionConfig};
use crate::events::{EventSink, NullSink};
use crate::grid::{Grid, Tile};
use crate::piece::ActivePiece;
use crate::scoring::{clear_lines, LineClear, Progress};
use crate::snapshot::SessionSnapshot;
use crate::tilt::{TiltSimulator, TiltState, TiltStep};
use crate::types::{GameCommand, MoveDirection, RotationDirection, SessionPhase, ShapeId};

/// One game, from main menu to game over
#[derive(Debug, Clone)]
pub struct Session<S: EventSink = NullSink> {
    config: SessionConfig,
    phase: SessionPhase,
    grid: Grid,
    active: Option<ActivePiece>,
    /// Preview of the shape the next spawn will use
    next: Option<ShapeId>,
    held: Option<ShapeId>,
    /// A hold already happened for the current piece
    hold_used: bool,
    /// Cells painted as ghost for the current landing position
    ghost: Option<[(i32, i32); 4]>,
    queue: DrawQueue,
    progress: Progress,
    tilt: TiltSimulator,
    /// Monotonic session clock, advanced only by `tick`
    clock_ms: u64,
    last_clear: Option<LineClear>,
    released: Vec<Tile>,
    sink: S,
}

impl Session<NullSink> {
    /// Session with the default configuration and no event sink
    pub fn with_defaults() -> Self {
        let config = SessionConfig::default();
        Self::build(config, DrawQueue::new(config.seed), NullSink)
    }
}

impl<S: EventSink> Session<S> {
    /// Validate `config` and build a session in the main menu
    pub fn new(config: SessionConfig, sink: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, DrawQueue::new(config.seed), sink))
    }

    /// Like [`Session::new`] but drawing from a prepared queue
    /// (e.g. [`DrawQueue::scripted`])
    pub fn with_queue(
        config: SessionConfig,
        queue: DrawQueue,
        sink: S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, queue, sink))
    }

    fn build(config: SessionConfig, queue: DrawQueue, sink: S) -> Self {
        Self {
            config,
            phase: SessionPhase::MainMenu,
            grid: Grid::new(config.grid_width, config.grid_height),
            active: None,
            next: None,
            held: None,
            hold_used: false,
            ghost: None,
            queue,
            progress: Progress::new(config.starting_level),
            tilt: TiltSimulator::new(config.grid_width, config.tilt),
            clock_ms: 0,
            last_clear: None,
            released: Vec::new(),
            sink,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == SessionPhase::Playing
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable access to the grid, for hosts and tests that set up boards
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn next_shape(&self) -> Option<ShapeId> {
        self.next
    }

    pub fn held_shape(&self) -> Option<ShapeId> {
        self.held
    }

    /// False only when the swap lock is on and already used for this piece
    pub fn can_hold(&self) -> bool {
        !(self.config.hold_once_per_piece && self.hold_used)
    }

    pub fn score(&self) -> u32 {
        self.progress.score
    }

    pub fn level(&self) -> u32 {
        self.progress.level
    }

    pub fn rows_since_level_up(&self) -> u32 {
        self.progress.rows_since_level_up
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn tilt(&self) -> &TiltSimulator {
        &self.tilt
    }

    pub fn tilt_state(&self) -> &TiltState {
        self.tilt.state()
    }

    /// Let the host's physics overwrite the platform angle
    pub fn set_tilt_angle(&mut self, angle_deg: f32) {
        self.tilt.set_angle(angle_deg);
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    /// Result of the most recent lock's line clear
    pub fn last_clear(&self) -> Option<&LineClear> {
        self.last_clear.as_ref()
    }

    /// Tiles that were on the grid when the game ended, for the physics hand-off
    pub fn released_tiles(&self) -> &[Tile] {
        &self.released
    }

    pub fn queue(&self) -> &DrawQueue {
        &self.queue
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(self)
    }

    /// Leave the main menu and begin a game.
    ///
    /// Resets grid, tilt, score and level, then spawns the first piece.
    /// Does nothing outside `MainMenu`.
    pub fn start(&mut self) -> bool {
        if self.phase != SessionPhase::MainMenu {
            return false;
        }

        self.reset_board();
        self.tilt.reset();
        self.progress = Progress::new(self.config.starting_level);
        self.active = None;
        self.held = None;
        self.hold_used = false;
        self.last_clear = None;
        self.released.clear();
        self.phase = SessionPhase::Playing;
        info!(
            seed = self.config.seed,
            level = self.progress.level,
            "game started"
        );

        self.next = Some(self.queue.draw());
        self.spawn_next()
    }

    /// Return from `GameOver` to the main menu
    pub fn acknowledge_game_over(&mut self) -> bool {
        if self.phase != SessionPhase::GameOver {
            return false;
        }
        self.reset_board();
        self.phase = SessionPhase::MainMenu;
        true
    }

    /// Empty every grid cell; score and level are untouched
    pub fn reset_board(&mut self) {
        self.grid.clear_all();
        self.ghost = None;
    }

    /// End the game. Idempotent; only has an effect while playing.
    pub fn game_over(&mut self) -> bool {
        if self.phase != SessionPhase::Playing {
            return false;
        }

        self.tilt.halt();
        self.active = None;
        self.clear_ghost();
        self.released = self.grid.tiles().collect();
        self.grid.clear_all();
        self.phase = SessionPhase::GameOver;

        info!(
            score = self.progress.score,
            level = self.progress.level,
            released = self.released.len(),
            "game over"
        );
        self.sink.game_over();
        true
    }

    /// Shift the active piece one cell
    pub fn move_piece(&mut self, direction: MoveDirection) -> bool {
        if self.phase != SessionPhase::Playing {
            return false;
        }
        let Some(piece) = self.active.as_mut() else {
            return false;
        };

        let moved = piece.shift(&self.grid, direction);
        if moved {
            self.sink.piece_moved();
            self.refresh_ghost();
        }
        moved
    }

    /// One row down on request; locking is still left to gravity
    pub fn soft_drop(&mut self) -> bool {
        self.move_piece(MoveDirection::Down)
    }

    /// Rotate with wall kicks
    pub fn rotate(&mut self, direction: RotationDirection) -> bool {
        if self.phase != SessionPhase::Playing {
            return false;
        }
        let Some(piece) = self.active.as_mut() else {
            return false;
        };

        let rotated = piece.rotate(&self.grid, direction);
        if rotated {
            self.sink.piece_moved();
            self.refresh_ghost();
        }
        rotated
    }

    /// Fall until blocked, then lock immediately
    pub fn hard_drop(&mut self) -> bool {
        if self.phase != SessionPhase::Playing {
            return false;
        }
        let Some(piece) = self.active.as_mut() else {
            return false;
        };

        let rows = piece.drop_to_floor(&self.grid);
        debug!(shape = ?piece.shape(), rows, "hard drop");
        self.lock_active();
        true
    }

    /// Swap the active shape with the hold slot.
    ///
    /// With an empty slot the replacement comes straight from the draw queue,
    /// leaving the next-piece preview as it was.
    pub fn hold_swap(&mut self) -> bool {
        if self.phase != SessionPhase::Playing || !self.can_hold() {
            return false;
        }
        let Some(current) = self.active.as_ref().map(ActivePiece::shape) else {
            return false;
        };

        let incoming = match self.held.replace(current) {
            Some(shape) => shape,
            None => self.queue.draw(),
        };
        debug!(held = ?current, incoming = ?incoming, "hold swap");

        self.hold_used = true;
        self.spawn_shape(incoming)
    }

    /// Advance the session by `elapsed_ms`.
    ///
    /// Lock time accrues first; when the gravity deadline has passed the piece
    /// steps down and locks if its lock delay has run out. The tilt
    /// simulation advances afterwards.
    pub fn tick(&mut self, elapsed_ms: u32) {
        if self.phase != SessionPhase::Playing {
            return;
        }
        self.clock_ms += elapsed_ms as u64;

        if let Some(piece) = self.active.as_mut() {
            piece.accumulate_lock_time(elapsed_ms);
            if piece.step_due(self.clock_ms) {
                let outcome = piece.step(&self.grid, self.clock_ms, self.config.lock_delay_ms);
                if outcome.lock_due {
                    self.lock_active();
                }
            }
        }

        if self.phase == SessionPhase::Playing {
            self.step_tilt(elapsed_ms);
        }
    }

    /// Dispatch a command; returns whether it had an effect
    pub fn apply(&mut self, command: GameCommand) -> bool {
        match command {
            GameCommand::MoveLeft => self.move_piece(MoveDirection::Left),
            GameCommand::MoveRight => self.move_piece(MoveDirection::Right),
            GameCommand::SoftDrop => self.soft_drop(),
            GameCommand::HardDrop => self.hard_drop(),
            GameCommand::RotateCw => self.rotate(RotationDirection::Clockwise),
            GameCommand::RotateCcw => self.rotate(RotationDirection::CounterClockwise),
            GameCommand::Hold => self.hold_swap(),
            GameCommand::Start => self.start(),
            GameCommand::AcknowledgeGameOver => self.acknowledge_game_over(),
        }
    }

    fn step_tilt(&mut self, elapsed_ms: u32) {
        if self.tilt.step(elapsed_ms) == TiltStep::Fatal {
            info!(
                angle = self.tilt.angle_deg(),
                goal = self.tilt.goal_deg(),
                "platform tilted past tolerance"
            );
            self.sink.tilt_fatal();
            self.game_over();
        }
    }

    /// Commit the active piece, clear rows, spawn the next piece, reweigh
    fn lock_active(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };
        self.clear_ghost();

        let position = piece.position();
        self.grid
            .set_piece(piece.cells(), position.col, position.row, piece.shape());
        debug!(shape = ?piece.shape(), col = position.col, row = position.row, "piece locked");
        self.sink.piece_locked();

        let clear = clear_lines(&mut self.grid, &mut self.progress);
        if clear.lines > 0 {
            debug!(lines = clear.lines, points = clear.points, "lines cleared");
            self.sink.lines_cleared(clear.lines);
        }
        for &level in &clear.level_ups {
            info!(level, "level up");
            self.sink.level_up(level);
        }
        self.last_clear = Some(clear);

        if !self.spawn_next() {
            return;
        }
        self.tilt.calculate_weight(&self.grid, self.active.as_ref());
        debug!(
            left = self.tilt.state().left_weight,
            right = self.tilt.state().right_weight,
            goal = self.tilt.goal_deg(),
            "weight recalculated"
        );
    }

    /// Promote the preview shape to active and draw a new preview
    fn spawn_next(&mut self) -> bool {
        let shape = match self.next.take() {
            Some(shape) => shape,
            None => self.queue.draw(),
        };
        self.next = Some(self.queue.draw());
        self.hold_used = false;
        self.spawn_shape(shape)
    }

    /// Put `shape` at the spawn point; a blocked spawn ends the game
    fn spawn_shape(&mut self, shape: ShapeId) -> bool {
        self.clear_ghost();
        self.active = None;

        let piece = ActivePiece::new(
            shape,
            self.config.spawn,
            self.progress.level,
            self.clock_ms,
        );
        let Some(piece) = piece.filter(|p| p.is_valid(&self.grid)) else {
            debug!(shape = ?shape, "spawn blocked");
            self.game_over();
            return false;
        };

        debug!(shape = ?shape, next = ?self.next, "piece spawned");
        self.active = Some(piece);
        self.refresh_ghost();
        true
    }

    fn clear_ghost(&mut self) {
        if let Some(cells) = self.ghost.take() {
            for (col, row) in cells {
                self.grid.clear(col, row, true);
            }
        }
    }

    /// Repaint ghost cells at the active piece's landing position
    fn refresh_ghost(&mut self) {
        self.clear_ghost();
        if !self.config.show_ghost {
            return;
        }
        let Some(piece) = self.active.as_ref() else {
            return;
        };

        let landing = piece.landing_position(&self.grid);
        let cells = piece
            .cells()
            .map(|(dx, dy)| (landing.col + dx, landing.row + dy));
        for (col, row) in cells {
            self.grid.place(col, row, ShapeId::Ghost);
        }
        self.ghost = Some(cells);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::GameEvent;
    use crate::types::TICK_MS;

    fn scripted(shapes: &[ShapeId]) -> Session<Vec<GameEvent>> {
        Session::with_queue(
            SessionConfig::default(),
            DrawQueue::scripted(1, shapes.iter().copied()),
            Vec::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_session_in_main_menu() {
        let session = Session::with_defaults();
        assert_eq!(session.phase(), SessionPhase::MainMenu);
        assert!(session.active().is_none());
        assert_eq!(session.score(), 0);
        assert_eq!(session.level(), 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SessionConfig {
            starting_level: 0,
            ..SessionConfig::default()
        };
        assert!(Session::new(config, NullSink).is_err());
    }

    #[test]
    fn test_start_spawns_and_previews() {
        let mut session = scripted(&[ShapeId::T, ShapeId::O, ShapeId::I]);
        assert!(session.start());

        assert_eq!(session.phase(), SessionPhase::Playing);
        let active = session.active().unwrap();
        assert_eq!(active.shape(), ShapeId::T);
        assert_eq!(active.position().col, 5);
        assert_eq!(active.position().row, 19);
        assert_eq!(session.next_shape(), Some(ShapeId::O));

        // Only from the main menu.
        assert!(!session.start());
    }

    #[test]
    fn test_commands_ignored_outside_play() {
        let mut session = scripted(&[ShapeId::T]);
        assert!(!session.move_piece(MoveDirection::Left));
        assert!(!session.hard_drop());
        assert!(!session.hold_swap());
        assert!(!session.acknowledge_game_over());
        assert!(session.sink().is_empty());
    }

    #[test]
    fn test_player_move_emits_event_and_ghost() {
        let mut session = scripted(&[ShapeId::O, ShapeId::O]);
        session.start();

        assert!(session.move_piece(MoveDirection::Left));
        assert_eq!(session.sink().as_slice(), &[GameEvent::PieceMoved]);

        // Ghost sits on the floor under the piece.
        assert_eq!(session.grid().occupant(4, 1), Some(ShapeId::Ghost));
        assert_eq!(session.grid().occupant(5, 2), Some(ShapeId::Ghost));
        assert_eq!(session.grid().occupant(6, 1), None);
    }

    #[test]
    fn test_ghost_disabled() {
        let config = SessionConfig {
            show_ghost: false,
            ..SessionConfig::default()
        };
        let mut session = Session::new(config, NullSink).unwrap();
        session.start();
        assert!(session.grid().code_rows().iter().flatten().all(|&c| c == 0));
    }

    #[test]
    fn test_gravity_steps_on_schedule() {
        let mut session = scripted(&[ShapeId::T]);
        session.start();

        for _ in 0..49 {
            session.tick(TICK_MS);
        }
        assert_eq!(session.active().unwrap().position().row, 19);

        session.tick(TICK_MS);
        assert_eq!(session.clock_ms(), 800);
        assert_eq!(session.active().unwrap().position().row, 18);
        // Gravity is silent.
        assert!(session.sink().is_empty());
    }

    #[test]
    fn test_resting_piece_locks_on_next_step() {
        let mut session = scripted(&[ShapeId::O, ShapeId::T]);
        session.start();
        while session.soft_drop() {}
        session.sink_mut().clear();

        for _ in 0..49 {
            session.tick(TICK_MS);
        }
        assert!(session.sink().is_empty());

        session.tick(TICK_MS);
        assert_eq!(session.sink().as_slice(), &[GameEvent::PieceLocked]);
        assert_eq!(session.active().unwrap().shape(), ShapeId::T);
        assert!(session.grid().has_real_tile(5, 1));
    }

    #[test]
    fn test_hold_from_empty_slot_keeps_preview() {
        let mut session = scripted(&[ShapeId::T, ShapeId::O, ShapeId::I, ShapeId::S]);
        session.start();
        assert_eq!(session.next_shape(), Some(ShapeId::O));

        assert!(session.hold_swap());
        assert_eq!(session.held_shape(), Some(ShapeId::T));
        assert_eq!(session.active().unwrap().shape(), ShapeId::I);
        assert_eq!(session.next_shape(), Some(ShapeId::O));

        assert!(session.hold_swap());
        assert_eq!(session.held_shape(), Some(ShapeId::I));
        assert_eq!(session.active().unwrap().shape(), ShapeId::T);
    }

    #[test]
    fn test_hold_into_blocked_spawn_ends_game() {
        let mut session = scripted(&[ShapeId::T, ShapeId::O, ShapeId::I, ShapeId::S]);
        session.start();
        // The active T is not on the grid; the incoming I needs (5, 20).
        session.grid_mut().place(5, 20, ShapeId::Z);

        assert!(!session.hold_swap());
        assert_eq!(session.phase(), SessionPhase::GameOver);
        assert_eq!(session.held_shape(), Some(ShapeId::T));
        assert!(session.active().is_none());
        assert_eq!(session.sink().last(), Some(&GameEvent::GameOver));
    }

    #[test]
    fn test_into_sink_returns_recorded_events() {
        let mut session = scripted(&[ShapeId::O, ShapeId::T, ShapeId::I]);
        session.start();
        session.hard_drop();
        assert_eq!(session.queue().bags_filled(), 0);

        let events = session.into_sink();
        assert_eq!(events.first(), Some(&GameEvent::PieceLocked));
    }

    #[test]
    fn test_hold_once_per_piece() {
        let config = SessionConfig {
            hold_once_per_piece: true,
            ..SessionConfig::default()
        };
        let queue = DrawQueue::scripted(1, [ShapeId::T, ShapeId::O, ShapeId::I, ShapeId::S]);
        let mut session = Session::with_queue(config, queue, NullSink).unwrap();
        session.start();

        assert!(session.hold_swap());
        assert!(!session.can_hold());
        assert!(!session.hold_swap());

        session.hard_drop();
        assert!(session.can_hold());
    }

    #[test]
    fn test_lock_arms_tilt() {
        let mut session = scripted(&[ShapeId::O, ShapeId::O]);
        session.start();
        assert!(!session.tilt().is_moving());

        for _ in 0..4 {
            session.move_piece(MoveDirection::Left);
        }
        session.hard_drop();

        let tilt = session.tilt_state();
        assert!(tilt.moving);
        // Columns 1 and 2 weigh 5 and 4.
        assert_eq!(tilt.left_weight, 30 + 2 * 5 + 2 * 4);
        assert_eq!(tilt.right_weight, 30);
        assert!((tilt.goal_deg - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_forced_angle_is_fatal_on_same_tick() {
        let mut session = scripted(&[ShapeId::O, ShapeId::O]);
        session.start();
        session.hard_drop();
        session.sink_mut().clear();

        session.set_tilt_angle(7.5);
        session.tick(TICK_MS);

        assert_eq!(session.phase(), SessionPhase::GameOver);
        assert_eq!(
            session.sink().as_slice(),
            &[GameEvent::TiltFatal, GameEvent::GameOver]
        );
        assert!(!session.tilt().is_moving());
    }

    #[test]
    fn test_blocked_spawn_ends_game_without_reweigh() {
        let mut session = scripted(&[ShapeId::O, ShapeId::O]);
        session.start();
        session.grid_mut().place(5, 20, ShapeId::Z);

        session.hard_drop();

        assert_eq!(session.phase(), SessionPhase::GameOver);
        assert!(session.active().is_none());
        assert!(!session.tilt().is_moving());
        assert_eq!(session.grid().real_tile_count(), 0);
        // The dropped O plus the blocker.
        assert_eq!(session.released_tiles().len(), 5);
        assert_eq!(
            session.sink().as_slice(),
            &[GameEvent::PieceLocked, GameEvent::GameOver]
        );
    }

    #[test]
    fn test_game_over_is_idempotent() {
        let mut session = scripted(&[ShapeId::T]);
        session.start();

        assert!(session.game_over());
        assert!(!session.game_over());
        let overs = session
            .sink()
            .iter()
            .filter(|e| **e == GameEvent::GameOver)
            .count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn test_acknowledge_returns_to_menu_and_restart_resets() {
        let mut session = scripted(&[ShapeId::O, ShapeId::O, ShapeId::O]);
        session.start();
        session.grid_mut().place(1, 1, ShapeId::I);
        session.game_over();

        assert!(session.acknowledge_game_over());
        assert_eq!(session.phase(), SessionPhase::MainMenu);
        assert_eq!(session.grid().real_tile_count(), 0);

        assert!(session.start());
        assert_eq!(session.score(), 0);
        assert!(session.released_tiles().is_empty());
    }

    #[test]
    fn test_apply_dispatches() {
        let mut session = scripted(&[ShapeId::T, ShapeId::O]);
        assert!(!session.apply(GameCommand::MoveLeft));
        assert!(session.apply(GameCommand::Start));
        assert!(session.apply(GameCommand::MoveRight));
        assert_eq!(session.active().unwrap().position().col, 6);
        assert!(session.apply(GameCommand::RotateCw));
        assert_eq!(session.active().unwrap().rotation(), 1);
        assert!(session.apply(GameCommand::HardDrop));
        assert_eq!(session.active().unwrap().shape(), ShapeId::O);
    }
}
