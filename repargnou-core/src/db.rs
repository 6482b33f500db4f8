use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, TransactionBehavior};

use crate::error::StoreError;
use crate::store::HistoryStore;
use crate::types::{ExerciseProgress, WorkoutSession};

/// Workout history kept in a SQLite file.
///
/// Sessions and their per-exercise progress live in two tables (see
/// [`crate::schema`]). Phase and exercise definitions are stored as JSON snapshots
/// so a session is readable without the catalog it was recorded from.
pub struct SqliteHistoryStore {
    conn: Connection,
}

impl SqliteHistoryStore {
    /// Opens (or creates) the history database at `path`, configures WAL mode,
    /// and applies schema migrations.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the file cannot be opened, the pragmas
    /// are refused, or the schema DDL fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let mut conn = Connection::open(path)?;

        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.busy_timeout(Duration::from_secs(5))?;

        crate::schema::migrate(&mut conn)?;

        Ok(Self { conn })
    }

    /// Read access to the underlying connection, for inspection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// Rehydrates a stored Unix timestamp.
fn from_unix(secs: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp(secs, 0).ok_or(StoreError::Timestamp(secs))
}

type SessionRow = (String, String, i64, Option<i64>);
type ProgressRow = (String, u32, u32, i64, Option<i64>);

impl HistoryStore for SqliteHistoryStore {
    /// Loads every stored session, oldest first.
    ///
    /// Returns `Ok(None)` when the database holds no session yet.
    fn load(&mut self) -> Result<Option<Vec<WorkoutSession>>, StoreError> {
        let sessions: Vec<SessionRow> = {
            let mut stmt = self.conn.prepare(
                "SELECT id, phase_json, started_at, ended_at
                 FROM sessions
                 ORDER BY started_at, rowid",
            )?;
            let rows = stmt
                .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows
        };

        if sessions.is_empty() {
            return Ok(None);
        }

        let mut progress_stmt = self.conn.prepare(
            "SELECT exercise_json, completed_sets, completed_reps, started_at, ended_at
             FROM exercise_progress
             WHERE session_id = ?1
             ORDER BY position",
        )?;

        let mut history = Vec::with_capacity(sessions.len());
        for (id, phase_json, started_at, ended_at) in sessions {
            let rows: Vec<ProgressRow> = progress_stmt
                .query_map(params![&id], |r| {
                    Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            let exercises = rows
                .into_iter()
                .map(|(exercise_json, sets, reps, started, ended)| {
                    Ok(ExerciseProgress {
                        exercise: serde_json::from_str(&exercise_json)?,
                        completed_sets: sets,
                        completed_reps: reps,
                        started_at: from_unix(started)?,
                        ended_at: ended.map(from_unix).transpose()?,
                    })
                })
                .collect::<Result<Vec<_>, StoreError>>()?;

            history.push(WorkoutSession {
                id,
                phase: serde_json::from_str(&phase_json)?,
                started_at: from_unix(started_at)?,
                ended_at: ended_at.map(from_unix).transpose()?,
                exercises,
            });
        }

        Ok(Some(history))
    }

    /// Upserts every session and rewrites its progress rows inside one
    /// `BEGIN IMMEDIATE` transaction.
    fn save(&mut self, history: &[WorkoutSession]) -> Result<(), StoreError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        for session in history {
            let phase_json = serde_json::to_string(&session.phase)?;
            tx.execute(
                "INSERT INTO sessions (id, phase_number, phase_name, phase_json, started_at, ended_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(id)
                 DO UPDATE SET phase_number = excluded.phase_number,
                               phase_name = excluded.phase_name,
                               phase_json = excluded.phase_json,
                               started_at = excluded.started_at,
                               ended_at = excluded.ended_at",
                params![
                    &session.id,
                    session.phase.phase,
                    &session.phase.name,
                    phase_json,
                    session.started_at.timestamp(),
                    session.ended_at.map(|t| t.timestamp()),
                ],
            )?;

            tx.execute(
                "DELETE FROM exercise_progress WHERE session_id = ?1",
                params![&session.id],
            )?;
            for (position, progress) in session.exercises.iter().enumerate() {
                tx.execute(
                    "INSERT INTO exercise_progress
                         (session_id, position, exercise_id, exercise_json,
                          completed_sets, completed_reps, started_at, ended_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        &session.id,
                        position as i64,
                        &progress.exercise.id,
                        serde_json::to_string(&progress.exercise)?,
                        progress.completed_sets,
                        progress.completed_reps,
                        progress.started_at.timestamp(),
                        progress.ended_at.map(|t| t.timestamp()),
                    ],
                )?;
            }
        }

        tx.commit()?;
        Ok(())
    }
}
