//! Workout progression engine: exercise catalog, countdown timer, session
//! recording, and the orchestrator state machine that ties them together.
//!
//! The crate has no UI. A host builds an [`Orchestrator`] from an [`Announcer`], a
//! [`SessionRecorder`], and a [`CountdownTimer`], then forwards the timer's events
//! back into [`Orchestrator::handle_timer_event`] from its own event loop.

pub mod announcer;
pub mod catalog;
pub mod db;
pub mod error;
pub mod orchestrator;
pub mod recorder;
pub mod schema;
pub mod store;
pub mod timer;
pub mod types;

pub use announcer::{Announcer, CommandAnnouncer, LogAnnouncer, MemoryAnnouncer};
pub use catalog::Catalog;
pub use db::SqliteHistoryStore;
pub use error::{CatalogError, StoreError, TimerError};
pub use orchestrator::{Orchestrator, WorkoutState, WorkoutStatus};
pub use recorder::SessionRecorder;
pub use store::{HistoryStore, MemoryHistoryStore};
pub use timer::{CountdownTimer, TimerEvent};
pub use types::{
    Exercise, ExercisePhase, ExerciseProgress, RestType, Timing, WorkoutSession, WorkoutStats,
};
