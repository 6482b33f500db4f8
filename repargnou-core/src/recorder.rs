//! Session bookkeeping: the one active workout session and the append-only history.
//!
//! The recorder has no timing logic. The orchestrator reports progress through it
//! and never touches a `WorkoutSession` directly. Persistence goes through a
//! [`HistoryStore`]; read and write failures are logged and otherwise ignored, so
//! a broken store degrades to "no history" without affecting the workout.

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::store::{HistoryStore, MemoryHistoryStore};
use crate::types::{ExercisePhase, ExerciseProgress, WorkoutSession, WorkoutStats};

pub struct SessionRecorder {
    current: Option<WorkoutSession>,
    history: Vec<WorkoutSession>,
    store: Box<dyn HistoryStore>,
}

impl SessionRecorder {
    /// Creates a recorder and loads the stored history once.
    pub fn new(mut store: Box<dyn HistoryStore>) -> Self {
        let history = match store.load() {
            Ok(Some(history)) => {
                info!(sessions = history.len(), "workout history loaded");
                history
            }
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(%err, "could not load workout history, starting empty");
                Vec::new()
            }
        };
        Self { current: None, history, store }
    }

    /// A recorder backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryHistoryStore::new()))
    }

    /// Opens a session for `phase`, replacing any session still open.
    pub fn open_session(&mut self, phase: &ExercisePhase) -> &WorkoutSession {
        let now = Utc::now();
        let session = WorkoutSession {
            id: uuid::Uuid::new_v4().to_string(),
            phase: phase.clone(),
            started_at: now,
            ended_at: None,
            exercises: phase
                .exercises
                .iter()
                .map(|exercise| ExerciseProgress {
                    exercise: exercise.clone(),
                    completed_sets: 0,
                    completed_reps: 0,
                    started_at: now,
                    ended_at: None,
                })
                .collect(),
        };
        if let Some(previous) = &self.current {
            debug!(session = %previous.id, "replacing open session");
        }
        info!(session = %session.id, phase = phase.phase, "session opened");
        self.current.insert(session)
    }

    /// Records the counters reached for `exercise_id` in the current session.
    ///
    /// No-op without an open session or when no exercise matches. The exercise's
    /// end time is stamped the first time `sets` reaches its required set count.
    pub fn update_progress(&mut self, exercise_id: &str, sets: u32, reps: u32) {
        let Some(session) = self.current.as_mut() else {
            return;
        };
        let Some(progress) = session
            .exercises
            .iter_mut()
            .find(|p| p.exercise.id == exercise_id)
        else {
            debug!(exercise = exercise_id, "no progress entry for exercise");
            return;
        };

        progress.completed_sets = sets;
        progress.completed_reps = reps;
        if sets >= progress.exercise.sets && progress.ended_at.is_none() {
            progress.ended_at = Some(Utc::now());
        }
    }

    /// Stamps the end time of the current session, appends it to history, and
    /// persists the history. Returns the closed session.
    pub fn close_session(&mut self) -> Option<&WorkoutSession> {
        let mut session = self.current.take()?;
        session.ended_at = Some(Utc::now());
        info!(session = %session.id, "session closed");
        self.history.push(session);

        if let Err(err) = self.store.save(&self.history) {
            warn!(%err, "could not save workout history");
        }
        self.history.last()
    }

    /// Drops the current session without recording it.
    pub fn cancel_session(&mut self) {
        if let Some(session) = self.current.take() {
            info!(session = %session.id, "session cancelled");
        }
    }

    pub fn current_session(&self) -> Option<&WorkoutSession> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &[WorkoutSession] {
        &self.history
    }

    /// Aggregates completed (end-stamped) sessions.
    pub fn compute_stats(&self) -> WorkoutStats {
        let completed: Vec<&WorkoutSession> =
            self.history.iter().filter(|s| s.is_completed()).collect();

        if completed.is_empty() {
            return WorkoutStats::default();
        }

        let total_exercises = completed.iter().map(|s| s.exercises.len()).sum();
        let total_seconds: i64 = completed
            .iter()
            .filter_map(|s| s.duration())
            .map(|d| d.num_seconds())
            .sum();
        let average_duration_minutes = total_seconds as f64 / completed.len() as f64 / 60.0;

        let mut workouts_by_phase = BTreeMap::new();
        for session in &completed {
            *workouts_by_phase.entry(session.phase.phase).or_insert(0) += 1;
        }

        WorkoutStats {
            total_workouts: completed.len(),
            total_exercises,
            average_duration_minutes,
            workouts_by_phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration};

    use super::*;
    use crate::error::StoreError;
    use crate::types::Exercise;

    fn phase(number: u32, ids: &[&str]) -> ExercisePhase {
        ExercisePhase {
            phase: number,
            name: format!("Phase {number}"),
            rest_between_exercises_seconds: Some(60),
            exercises: ids
                .iter()
                .map(|id| Exercise {
                    id: (*id).into(),
                    name: (*id).into(),
                    description: None,
                    phase: number,
                    sets: 2,
                    reps: Some(10),
                    hold_seconds: None,
                    per_rep_hold_seconds: None,
                    rest_between_sets_seconds: None,
                    per_rep_rest_seconds: None,
                })
                .collect(),
        }
    }

    fn closed_session(phase: ExercisePhase, start: i64, minutes: i64) -> WorkoutSession {
        let started_at = DateTime::from_timestamp(start, 0).unwrap();
        WorkoutSession {
            id: uuid::Uuid::new_v4().to_string(),
            exercises: phase
                .exercises
                .iter()
                .map(|e| ExerciseProgress {
                    exercise: e.clone(),
                    completed_sets: e.sets,
                    completed_reps: 10,
                    started_at,
                    ended_at: None,
                })
                .collect(),
            phase,
            started_at,
            ended_at: Some(started_at + Duration::minutes(minutes)),
        }
    }

    struct BrokenStore;

    impl HistoryStore for BrokenStore {
        fn load(&mut self) -> Result<Option<Vec<WorkoutSession>>, StoreError> {
            Err(StoreError::LockPoisoned)
        }

        fn save(&mut self, _history: &[WorkoutSession]) -> Result<(), StoreError> {
            Err(StoreError::LockPoisoned)
        }
    }

    #[test]
    fn open_session_tracks_every_exercise() {
        let mut recorder = SessionRecorder::in_memory();
        let session = recorder.open_session(&phase(1, &["a", "b", "c"]));
        assert_eq!(session.exercises.len(), 3);
        assert!(session.exercises.iter().all(|p| p.completed_sets == 0
            && p.completed_reps == 0
            && p.ended_at.is_none()));
        assert!(session.ended_at.is_none());
    }

    #[test]
    fn update_progress_stamps_end_on_last_set() {
        let mut recorder = SessionRecorder::in_memory();
        recorder.open_session(&phase(1, &["a", "b"]));

        recorder.update_progress("a", 1, 10);
        let a = &recorder.current_session().unwrap().exercises[0];
        assert_eq!((a.completed_sets, a.completed_reps), (1, 10));
        assert!(a.ended_at.is_none());

        recorder.update_progress("a", 2, 10);
        assert!(recorder.current_session().unwrap().exercises[0].ended_at.is_some());
        assert_eq!(recorder.current_session().unwrap().exercises[1].completed_sets, 0);
    }

    #[test]
    fn update_progress_without_session_or_match_is_noop() {
        let mut recorder = SessionRecorder::in_memory();
        recorder.update_progress("a", 1, 1);
        assert!(recorder.current_session().is_none());

        recorder.open_session(&phase(1, &["a"]));
        recorder.update_progress("zzz", 5, 5);
        assert_eq!(recorder.current_session().unwrap().exercises[0].completed_sets, 0);
    }

    #[test]
    fn close_appends_and_persists() {
        let store = MemoryHistoryStore::new();
        let mut recorder = SessionRecorder::new(Box::new(store.clone()));
        recorder.open_session(&phase(2, &["a"]));
        let closed = recorder.close_session().unwrap();
        assert!(closed.ended_at.is_some());

        assert!(recorder.current_session().is_none());
        assert_eq!(recorder.history().len(), 1);
        assert_eq!(store.saved().map(|h| h.len()), Some(1));
        assert!(recorder.close_session().is_none());
    }

    #[test]
    fn cancel_discards_session() {
        let store = MemoryHistoryStore::new();
        let mut recorder = SessionRecorder::new(Box::new(store.clone()));
        recorder.open_session(&phase(1, &["a"]));
        recorder.cancel_session();
        assert!(recorder.current_session().is_none());
        assert!(recorder.history().is_empty());
        assert!(store.saved().is_none());
    }

    #[test]
    fn broken_store_degrades_to_empty_history() {
        let mut recorder = SessionRecorder::new(Box::new(BrokenStore));
        assert!(recorder.history().is_empty());
        recorder.open_session(&phase(1, &["a"]));
        assert!(recorder.close_session().is_some());
        assert_eq!(recorder.history().len(), 1);
    }

    #[test]
    fn stats_over_completed_sessions() {
        let mut open = closed_session(phase(3, &["x"]), 1_700_000_000, 0);
        open.ended_at = None;
        let history = vec![
            closed_session(phase(1, &["a", "b"]), 1_700_000_000, 30),
            closed_session(phase(1, &["a", "b"]), 1_700_100_000, 20),
            closed_session(phase(2, &["c", "d", "e"]), 1_700_200_000, 40),
            open,
        ];
        let recorder =
            SessionRecorder::new(Box::new(MemoryHistoryStore::with_history(history)));

        let stats = recorder.compute_stats();
        assert_eq!(stats.total_workouts, 3);
        assert_eq!(stats.total_exercises, 7);
        assert!((stats.average_duration_minutes - 30.0).abs() < f64::EPSILON);
        assert_eq!(stats.workouts_by_phase.get(&1), Some(&2));
        assert_eq!(stats.workouts_by_phase.get(&2), Some(&1));
        assert_eq!(stats.workouts_by_phase.get(&3), None);
    }

    #[test]
    fn stats_without_history_are_zero() {
        let stats = SessionRecorder::in_memory().compute_stats();
        assert_eq!(stats, WorkoutStats::default());
    }
}
