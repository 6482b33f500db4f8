//! Log setup for the repargnou binary.
//!
//! The TUI owns stderr, so every log line goes to `repargnou.log` in the data
//! directory through a non-blocking appender. The filter defaults to `info` and
//! honours `RUST_LOG`.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Name of the log file inside the data directory.
pub const LOG_FILE: &str = "repargnou.log";

/// Installs the global subscriber writing to `<dir>/repargnou.log`.
///
/// The returned guard flushes buffered lines when dropped; keep it alive for the
/// whole run.
///
/// # Errors
///
/// Returns `Err` if `dir` cannot be created or a global subscriber is already set.
pub fn init(dir: &Path) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false),
        )
        .try_init()
        .map_err(std::io::Error::other)?;

    Ok(guard)
}
