/// DDL to create the schema_version tracking table.
///
/// Applied on every open before the version is read; `IF NOT EXISTS` keeps it
/// repeatable.
pub const SCHEMA_VERSION_DDL: &str = "
    CREATE TABLE IF NOT EXISTS schema_version (
        version INTEGER NOT NULL
    ) STRICT;
";

/// DDL for the v1 history schema.
///
/// - `sessions`: one row per workout session, keyed by UUID v4 text. The phase
///   performed is kept as a JSON snapshot next to its number and name.
/// - `exercise_progress`: one row per exercise of a session, ordered by `position`,
///   with the exercise snapshot and its counters.
///
/// Timestamps are Unix seconds. Removing a session cascades to its progress rows.
pub const SCHEMA_V1_SQL: &str = "
    CREATE TABLE IF NOT EXISTS sessions (
        id            TEXT    PRIMARY KEY,
        phase_number  INTEGER NOT NULL,
        phase_name    TEXT    NOT NULL,
        phase_json    TEXT    NOT NULL,
        started_at    INTEGER NOT NULL,
        ended_at      INTEGER
    ) STRICT;

    CREATE TABLE IF NOT EXISTS exercise_progress (
        session_id     TEXT    NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
        position       INTEGER NOT NULL,
        exercise_id    TEXT    NOT NULL,
        exercise_json  TEXT    NOT NULL,
        completed_sets INTEGER NOT NULL DEFAULT 0,
        completed_reps INTEGER NOT NULL DEFAULT 0,
        started_at     INTEGER NOT NULL,
        ended_at       INTEGER,
        PRIMARY KEY (session_id, position)
    ) STRICT;

    CREATE INDEX IF NOT EXISTS sessions_started_at ON sessions(started_at);
";

/// Brings the database up to the latest schema version.
///
/// Idempotent: safe to call on every open.
///
/// 1. Creates `schema_version` if missing.
/// 2. Reads the current version (`0` for a fresh file).
/// 3. Below 1, applies `SCHEMA_V1_SQL` and records `version = 1` inside one
///    `BEGIN IMMEDIATE` transaction.
///
/// # Errors
///
/// Returns `rusqlite::Error` if the DDL fails or the version row cannot be written.
pub fn migrate(db: &mut rusqlite::Connection) -> rusqlite::Result<()> {
    db.execute_batch(SCHEMA_VERSION_DDL)?;

    let version: i64 = db
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |r| r.get(0),
        )
        .unwrap_or(0);

    if version < 1 {
        let tx = db.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        tx.execute_batch(SCHEMA_V1_SQL)?;
        tx.execute("INSERT INTO schema_version (version) VALUES (1)", [])?;
        tx.commit()?;
    }

    Ok(())
}
