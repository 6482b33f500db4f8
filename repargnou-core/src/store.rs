//! History persistence boundary.
//!
//! The recorder loads history once at startup and saves the whole list after
//! every completed session. Failures on either side are the recorder's to log;
//! a store only reports them.

use std::sync::{Arc, Mutex};

use crate::error::StoreError;
use crate::types::WorkoutSession;

/// Where completed sessions are kept between runs.
pub trait HistoryStore: Send {
    /// Returns the stored history, or `None` when nothing was ever saved.
    fn load(&mut self) -> Result<Option<Vec<WorkoutSession>>, StoreError>;

    /// Persists the full history, replacing what was stored for the same sessions.
    fn save(&mut self, history: &[WorkoutSession]) -> Result<(), StoreError>;
}

/// Keeps history in memory only. Clones share the same contents.
#[derive(Debug, Default, Clone)]
pub struct MemoryHistoryStore {
    saved: Arc<Mutex<Option<Vec<WorkoutSession>>>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `history`, as if saved by a previous run.
    pub fn with_history(history: Vec<WorkoutSession>) -> Self {
        Self { saved: Arc::new(Mutex::new(Some(history))) }
    }

    /// The last saved history, if any.
    pub fn saved(&self) -> Option<Vec<WorkoutSession>> {
        self.saved.lock().ok().and_then(|saved| saved.clone())
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&mut self) -> Result<Option<Vec<WorkoutSession>>, StoreError> {
        let saved = self.saved.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(saved.clone())
    }

    fn save(&mut self, history: &[WorkoutSession]) -> Result<(), StoreError> {
        let mut saved = self.saved.lock().map_err(|_| StoreError::LockPoisoned)?;
        *saved = Some(history.to_vec());
        Ok(())
    }
}
