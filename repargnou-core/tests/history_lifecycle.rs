//! Integration test for the SQLite history store.
//!
//! Exercises: SqliteHistoryStore::open, migrate, save, load, and a recorder
//! reading history written by a previous process.

use chrono::{DateTime, Duration, Utc};
use repargnou_core::{
    Catalog, ExerciseProgress, HistoryStore, SessionRecorder, SqliteHistoryStore, WorkoutSession,
};

fn temp_db_path() -> std::path::PathBuf {
    let dir = tempfile::TempDir::new().unwrap();
    dir.keep().join("history.db")
}

fn session(phase_number: u32, started: DateTime<Utc>, minutes: i64) -> WorkoutSession {
    let catalog = Catalog::builtin().unwrap();
    let phase = catalog.phase(phase_number).unwrap().clone();
    WorkoutSession {
        id: uuid::Uuid::new_v4().to_string(),
        exercises: phase
            .exercises
            .iter()
            .enumerate()
            .map(|(i, exercise)| ExerciseProgress {
                exercise: exercise.clone(),
                completed_sets: exercise.sets,
                completed_reps: 10,
                started_at: started + Duration::minutes(i as i64 * 5),
                ended_at: Some(started + Duration::minutes(i as i64 * 5 + 4)),
            })
            .collect(),
        phase,
        started_at: started,
        ended_at: Some(started + Duration::minutes(minutes)),
    }
}

#[test]
fn open_creates_schema_in_wal_mode() {
    let path = temp_db_path();
    let store = SqliteHistoryStore::open(&path).unwrap();
    let conn = store.connection();

    let version: i64 = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |r| r.get(0))
        .unwrap();
    assert_eq!(version, 1, "schema_version should be 1");

    let journal: String = conn
        .query_row("PRAGMA journal_mode", [], |r| r.get(0))
        .unwrap();
    assert_eq!(journal, "wal", "journal_mode should be wal");

    let pk_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_table_info('exercise_progress') WHERE pk > 0",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(pk_count, 2, "exercise_progress should have composite PK");

    // Reopening must not re-run the migration.
    drop(store);
    let store = SqliteHistoryStore::open(&path).unwrap();
    let rows: i64 = store
        .connection()
        .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn empty_database_loads_as_none() {
    let mut store = SqliteHistoryStore::open(temp_db_path()).unwrap();
    assert!(store.load().unwrap().is_none());
}

#[test]
fn history_round_trips_to_the_second() {
    let path = temp_db_path();
    let started = DateTime::from_timestamp(1_760_000_000, 0).unwrap();
    let mut unfinished = session(3, started + Duration::days(2), 0);
    unfinished.ended_at = None;
    let history = vec![
        session(1, started, 25),
        session(2, started + Duration::days(1), 40),
        unfinished,
    ];

    {
        let mut store = SqliteHistoryStore::open(&path).unwrap();
        store.save(&history).unwrap();
        // Saving the same list again updates in place.
        store.save(&history).unwrap();
    }

    let mut store = SqliteHistoryStore::open(&path).unwrap();
    let loaded = store.load().unwrap().expect("history should be present");
    assert_eq!(loaded, history);

    let sessions: i64 = store
        .connection()
        .query_row("SELECT COUNT(*) FROM sessions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(sessions, 3, "resaving must not duplicate sessions");
}

#[test]
fn sub_second_timestamps_are_truncated() {
    let path = temp_db_path();
    let started = DateTime::from_timestamp(1_760_000_000, 750_000_000).unwrap();
    let mut store = SqliteHistoryStore::open(&path).unwrap();
    store.save(&[session(1, started, 10)]).unwrap();

    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded[0].started_at.timestamp(), started.timestamp());
    assert_eq!(loaded[0].started_at.timestamp_subsec_nanos(), 0);
}

#[test]
fn recorder_reads_history_from_a_previous_run() {
    let path = temp_db_path();
    let catalog = Catalog::builtin().unwrap();
    let phase = catalog.phase(1).unwrap();

    {
        let store = SqliteHistoryStore::open(&path).unwrap();
        let mut recorder = SessionRecorder::new(Box::new(store));
        recorder.open_session(phase);
        for exercise in &phase.exercises {
            recorder.update_progress(&exercise.id, exercise.sets, 5);
        }
        recorder.close_session().unwrap();
    }

    let store = SqliteHistoryStore::open(&path).unwrap();
    let recorder = SessionRecorder::new(Box::new(store));
    assert_eq!(recorder.history().len(), 1);
    let restored = &recorder.history()[0];
    assert_eq!(restored.phase.phase, 1);
    assert!(restored.is_completed());
    assert!(restored.exercises.iter().all(|p| p.ended_at.is_some()));

    let stats = recorder.compute_stats();
    assert_eq!(stats.total_workouts, 1);
    assert_eq!(stats.total_exercises, phase.exercises.len());
    assert_eq!(stats.workouts_by_phase.get(&1), Some(&1));
}
