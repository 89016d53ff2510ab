//! Database schema migrations for sleepwell.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
///
/// Increment this when adding new migrations.
pub const SCHEMA_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            tracing::warn!("failed to read schema_version: {}", e);
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: profiles and sleep entries.
///
/// One entry per user per date is enforced by a unique constraint.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS sleep_profiles (
            user_id                 TEXT PRIMARY KEY,
            chronotype              TEXT NOT NULL,
            weekday_bedtime         TEXT NOT NULL,
            weekday_wake_time       TEXT NOT NULL,
            weekend_bedtime         TEXT NOT NULL,
            weekend_wake_time       TEXT NOT NULL,
            target_sleep_hours      REAL NOT NULL,
            sleep_efficiency_target REAL NOT NULL,
            updated_at              TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sleep_entries (
            id                   INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id              TEXT NOT NULL,
            date                 TEXT NOT NULL,
            bedtime              TEXT NOT NULL,
            wake_time            TEXT NOT NULL,
            sleep_quality        INTEGER NOT NULL,
            sleepiness_score     INTEGER NOT NULL,
            mood                 TEXT NOT NULL,
            caffeine_consumed    INTEGER NOT NULL DEFAULT 0,
            caffeine_amount_mg   REAL NOT NULL DEFAULT 0,
            caffeine_last_intake TEXT,
            exercise             INTEGER NOT NULL DEFAULT 0,
            stress               INTEGER NOT NULL,
            notes                TEXT,
            target_hours         REAL NOT NULL,
            created_at           TEXT NOT NULL,
            UNIQUE (user_id, date)
        );",
    )?;

    set_schema_version(&tx, 1)?;
    tx.commit()?;
    Ok(())
}

/// Migration v2: stored period summaries.
///
/// The summary body is kept as JSON; the key columns form the primary key
/// so regeneration is a single upsert.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS period_summaries (
            user_id       TEXT NOT NULL,
            period_type   TEXT NOT NULL,
            period_start  TEXT NOT NULL,
            period_end    TEXT NOT NULL,
            entries_count INTEGER NOT NULL,
            data          TEXT NOT NULL,
            generated_at  TEXT NOT NULL,
            PRIMARY KEY (user_id, period_type, period_start, period_end)
        );

        CREATE INDEX IF NOT EXISTS idx_period_summaries_user ON period_summaries(user_id, period_start);",
    )?;

    set_schema_version(&tx, 2)?;
    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrate_reaches_current_version() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn fresh_database_reports_version_zero() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema_version_table(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 0);
    }
}
