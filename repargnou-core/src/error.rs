//! Error types for repargnou-core.
//!
//! Three enums cover the three fallible edges of the crate:
//! - `CatalogError`: reading, parsing, and validating an exercise catalog
//! - `StoreError`: history persistence
//! - `TimerError`: countdown misuse (double start, resume with nothing paused)
//!
//! The orchestrator itself never fails: its transitions are no-ops when their
//! preconditions are unmet.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading an exercise catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid catalog: {0}")]
    Invalid(String),
}

/// Errors from the history store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("snapshot encoding error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("stored timestamp {0} is out of range")]
    Timestamp(i64),

    #[error("history store lock poisoned")]
    LockPoisoned,
}

/// Errors from the countdown timer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimerError {
    #[error("a countdown is already running ({remaining}s left)")]
    AlreadyRunning { remaining: u32 },

    #[error("no paused countdown to resume")]
    NothingToResume,
}
