//! Headless simulation runner (default binary).
//!
//! Plays one game with a deterministic autoplay driver at a fixed 16ms tick
//! and prints the final snapshot as pretty JSON on stdout.
//!
//! Usage: `tiltris-sim [config.json]`. Log verbosity follows `RUST_LOG`
//! (default `info`).

use std::env;
use std::fs;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tiltris::core::{EventSink, GameEvent, Session, SessionConfig, SimpleRng};
use tiltris::types::{GameCommand, TICK_MS};

/// Ten minutes of frames
const MAX_TICKS: u32 = 10 * 60 * 1000 / TICK_MS;

/// The driver issues one command every this many ticks (~100ms)
const TICKS_PER_COMMAND: u32 = 6;

/// Repeats bias the driver towards shuffling pieces around before dropping
const AUTOPLAY_COMMANDS: [GameCommand; 10] = [
    GameCommand::MoveLeft,
    GameCommand::MoveRight,
    GameCommand::MoveLeft,
    GameCommand::MoveRight,
    GameCommand::RotateCw,
    GameCommand::RotateCcw,
    GameCommand::SoftDrop,
    GameCommand::SoftDrop,
    GameCommand::Hold,
    GameCommand::HardDrop,
];

/// Logs every event and keeps a few totals for the summary line
#[derive(Debug, Default)]
struct TracingSink {
    locks: u32,
    lines: u32,
    moves: u32,
}

impl EventSink for TracingSink {
    fn on_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::PieceMoved => self.moves += 1,
            GameEvent::PieceLocked => self.locks += 1,
            GameEvent::LinesCleared(count) => self.lines += count,
            GameEvent::LevelUp(_) | GameEvent::GameOver | GameEvent::TiltFatal => {}
        }
        debug!(?event, "event");
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    let config = load_config()?;
    info!(
        width = config.grid_width,
        height = config.grid_height,
        seed = config.seed,
        "starting headless simulation"
    );

    let mut session = Session::new(config, TracingSink::default())?;
    let ticks = run(&mut session);

    let snapshot = session.snapshot();
    let bags = session.queue().bags_filled();
    let stats = session.into_sink();
    info!(
        ticks,
        score = snapshot.score,
        level = snapshot.level,
        bags,
        locks = stats.locks,
        lines = stats.lines,
        moves = stats.moves,
        phase = snapshot.phase.as_str(),
        "simulation finished"
    );

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn load_config() -> Result<SessionConfig> {
    let Some(path) = env::args().nth(1) else {
        return Ok(SessionConfig::default());
    };
    let json =
        fs::read_to_string(&path).with_context(|| format!("failed to read config {}", path))?;
    let config = SessionConfig::from_json_str(&json)
        .with_context(|| format!("invalid config {}", path))?;
    Ok(config)
}

/// Drive the session until game over or the tick limit; returns ticks run
fn run(session: &mut Session<TracingSink>) -> u32 {
    // Separate stream from the bag's.
    let mut rng = SimpleRng::new(session.config().seed ^ 0x9e37_79b9);
    session.apply(GameCommand::Start);

    let mut ticks = 0;
    while ticks < MAX_TICKS && session.is_playing() {
        if ticks % TICKS_PER_COMMAND == 0 {
            let idx = rng.next_range(AUTOPLAY_COMMANDS.len() as u32) as usize;
            session.apply(AUTOPLAY_COMMANDS[idx]);
        }
        session.tick(TICK_MS);
        ticks += 1;
    }

    if session.is_playing() {
        warn!(ticks, "tick limit reached before game over");
    }
    ticks
}
