//! repargnou: guided rehabilitation workouts in the terminal.
//!
//! Entry point for the `repargnou` binary. Wires together the terminal lifecycle
//! (`tui`), event bus (`event`), rendering (`ui`), theme system (`theme`), config
//! and logging, and the workout engine from `repargnou-core`.
//!
//! # Startup sequence
//!
//! 1. Logging into the data directory, then config. Both are safe before terminal
//!    init and neither writes to the terminal.
//! 2. Catalog, history store, and announcer. A broken catalog file or history
//!    database degrades to the built-in catalog or in-memory history.
//! 3. `install_panic_hook()` before `init_tui()` so a panic restores the terminal.
//! 4. `register_sigterm()`, then `init_tui()`.
//! 5. Spawn the terminal event task and enter the loop.
//!
//! # Safety
//!
//! `restore_tui()` is called after the loop exits on every path (quit key, SIGTERM,
//! input stream closed, draw error). The `?` operator is only used before
//! `init_tui()`. The panic hook covers unexpected panics.

mod app;
mod config;
mod event;
mod logging;
mod theme;
mod tui;
mod ui;

use std::path::Path;
use std::sync::atomic::Ordering;

use repargnou_core::{
    Announcer, Catalog, CommandAnnouncer, CountdownTimer, LogAnnouncer, MemoryHistoryStore,
    Orchestrator, SessionRecorder, SqliteHistoryStore,
};
use tracing::{info, warn};

use crate::config::{Config, VoiceConfig};
use crate::ui::keybindings::{handle_key, KeyAction};

/// Loads the configured catalog, falling back to the built-in one.
///
/// # Errors
///
/// Returns `Err` only if the built-in catalog itself is invalid.
fn load_catalog(config: &Config) -> std::io::Result<Catalog> {
    if let Some(path) = &config.catalog {
        match Catalog::load(path) {
            Ok(catalog) => {
                info!(path = %path.display(), phases = catalog.phases.len(), "catalog loaded");
                return Ok(catalog);
            }
            Err(err) => warn!(%err, "catalog rejected, using the built-in program"),
        }
    }
    Catalog::builtin().map_err(std::io::Error::other)
}

/// Opens the SQLite history, or an in-memory store if the database is unusable.
fn open_recorder(config: &Config, data_dir: &Path) -> SessionRecorder {
    let path = config.history_db_path(data_dir);
    if let Some(parent) = path.parent() {
        if let Err(err) = std::fs::create_dir_all(parent) {
            warn!(%err, dir = %parent.display(), "cannot create history directory");
        }
    }
    match SqliteHistoryStore::open(&path) {
        Ok(store) => {
            info!(path = %path.display(), "history database opened");
            SessionRecorder::new(Box::new(store))
        }
        Err(err) => {
            warn!(%err, path = %path.display(), "history database unavailable, history kept in memory");
            SessionRecorder::new(Box::new(MemoryHistoryStore::new()))
        }
    }
}

/// Spoken cues through the configured TTS program, or log lines when voice is
/// disabled or no program is configured.
fn build_announcer(voice: &VoiceConfig) -> Box<dyn Announcer> {
    if !voice.enabled || voice.command.trim().is_empty() {
        info!("voice output disabled, cues go to the log");
        return Box::new(LogAnnouncer);
    }
    Box::new(CommandAnnouncer::spawn(voice.command.clone(), voice.args.clone()))
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Step 0: logging first so config problems are recorded.
    let data_dir = config::data_dir();
    let _log_guard = logging::init(&data_dir)?;
    let config = Config::load(&config::config_path());
    let theme = theme::Theme::from_name(&config.theme);

    // Step 1: workout engine. The timer's receiver is polled by the loop below.
    let catalog = load_catalog(&config)?;
    let (timer, mut timer_rx) = CountdownTimer::channel();
    let mut orch = Orchestrator::new(
        build_announcer(&config.voice),
        open_recorder(&config, &data_dir),
        timer,
    );
    let mut state = app::AppState::new(catalog.phases);
    info!("repargnou started");

    // Step 2: panic hook installed first so it restores the terminal.
    tui::install_panic_hook();

    // Step 3: SIGTERM flag, polled in the heartbeat arm.
    let term_flag = tui::register_sigterm()?;

    // Step 4: enter alternate screen and raw mode.
    let mut terminal = tui::init_tui()?;

    // Step 5: terminal events.
    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let mut rx = handler.rx;

    // Event loop. Exits only via `break` so `restore_tui()` is always reached.
    let mut result = Ok(());
    'event_loop: loop {
        tokio::select! {
            // Heartbeat: checks SIGTERM even when no other event arrives.
            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => {}
            Some(timer_event) = timer_rx.recv() => {
                orch.handle_timer_event(timer_event);
            }
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(event::AppEvent::Render) => {
                        if let Err(err) =
                            terminal.draw(|frame| ui::render(frame, &mut state, &orch, &theme))
                        {
                            result = Err(err);
                            break 'event_loop;
                        }
                    }
                    Some(event::AppEvent::Key(key)) => {
                        if handle_key(key, &mut state, &mut orch) == KeyAction::Quit {
                            break 'event_loop;
                        }
                    }
                    // ratatui picks up the new size on the next Render.
                    Some(event::AppEvent::Resize(_, _)) => {}
                    Some(event::AppEvent::Quit) | None => break 'event_loop,
                }
            }
        }
        if term_flag.load(Ordering::Relaxed) {
            info!("SIGTERM received");
            break 'event_loop;
        }
    }

    orch.reset_workout();
    tui::restore_tui()?;
    info!("repargnou stopped");
    result
}
