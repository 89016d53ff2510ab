//! SQLite-backed profile, entry and summary storage.
//!
//! Provides persistent storage for:
//! - Sleep profiles (one per user)
//! - Sleep entries (one per user per date)
//! - Period summaries (upserted by period key)

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use super::{data_dir, SleepStore};
use crate::error::{CoreError, DatabaseError, Result};
use crate::model::{Caffeine, ClockTime, SleepEntry, SleepProfile, SleepSchedule};
use crate::summary::{PeriodKey, PeriodSummary};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite database for sleep data.
///
/// The connection sits behind a mutex so one `Database` can be shared
/// across threads.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open the database at `~/.config/sleepwell/sleepwell.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("sleepwell.db");
        Self::open_at(&path)
    }

    /// Open (or create) a database file at `path`.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        super::migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        // a panic mid-statement leaves SQLite consistent; keep serving
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SleepStore for Database {
    fn get_profile(&self, user_id: &str) -> Result<Option<SleepProfile>> {
        let conn = self.conn();
        let row = conn
            .query_row(
                "SELECT user_id, chronotype, weekday_bedtime, weekday_wake_time,
                        weekend_bedtime, weekend_wake_time, target_sleep_hours,
                        sleep_efficiency_target, updated_at
                 FROM sleep_profiles WHERE user_id = ?1",
                params![user_id],
                ProfileRow::from_row,
            )
            .optional()?;
        row.map(ProfileRow::into_profile).transpose()
    }

    fn save_profile(&self, profile: &SleepProfile) -> Result<()> {
        self.conn().execute(
            "INSERT INTO sleep_profiles (
                user_id, chronotype, weekday_bedtime, weekday_wake_time,
                weekend_bedtime, weekend_wake_time, target_sleep_hours,
                sleep_efficiency_target, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(user_id) DO UPDATE SET
                chronotype = excluded.chronotype,
                weekday_bedtime = excluded.weekday_bedtime,
                weekday_wake_time = excluded.weekday_wake_time,
                weekend_bedtime = excluded.weekend_bedtime,
                weekend_wake_time = excluded.weekend_wake_time,
                target_sleep_hours = excluded.target_sleep_hours,
                sleep_efficiency_target = excluded.sleep_efficiency_target,
                updated_at = excluded.updated_at",
            params![
                profile.user_id,
                profile.chronotype.as_str(),
                profile.weekday.bedtime.to_string(),
                profile.weekday.wake_time.to_string(),
                profile.weekend.bedtime.to_string(),
                profile.weekend.wake_time.to_string(),
                profile.target_sleep_hours,
                profile.sleep_efficiency_target,
                profile.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn insert_entry(&self, entry: &SleepEntry) -> Result<i64> {
        let conn = self.conn();
        let result = conn.execute(
            "INSERT INTO sleep_entries (
                user_id, date, bedtime, wake_time, sleep_quality, sleepiness_score,
                mood, caffeine_consumed, caffeine_amount_mg, caffeine_last_intake,
                exercise, stress, notes, target_hours, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                entry.user_id,
                entry.date.format(DATE_FORMAT).to_string(),
                entry.bedtime.to_string(),
                entry.wake_time.to_string(),
                entry.sleep_quality,
                entry.sleepiness_score,
                entry.mood.as_str(),
                entry.caffeine.consumed,
                entry.caffeine.amount_mg,
                entry.caffeine.last_intake.map(|t| t.to_string()),
                entry.exercise,
                entry.stress,
                entry.notes,
                entry.target_hours,
                entry.created_at.to_rfc3339(),
            ],
        );

        match result {
            Ok(_) => Ok(conn.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(CoreError::DuplicateEntry {
                    user_id: entry.user_id.clone(),
                    date: entry.date,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn entries_between(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SleepEntry>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, date, bedtime, wake_time, sleep_quality, sleepiness_score,
                    mood, caffeine_consumed, caffeine_amount_mg, caffeine_last_intake,
                    exercise, stress, notes, target_hours, created_at
             FROM sleep_entries
             WHERE user_id = ?1 AND date >= ?2 AND date <= ?3
             ORDER BY date ASC",
        )?;
        let rows = stmt.query_map(
            params![
                user_id,
                start.format(DATE_FORMAT).to_string(),
                end.format(DATE_FORMAT).to_string()
            ],
            EntryRow::from_row,
        )?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?.into_entry()?);
        }
        Ok(entries)
    }

    fn delete_entry(&self, user_id: &str, date: NaiveDate) -> Result<bool> {
        let removed = self.conn().execute(
            "DELETE FROM sleep_entries WHERE user_id = ?1 AND date = ?2",
            params![user_id, date.format(DATE_FORMAT).to_string()],
        )?;
        Ok(removed > 0)
    }

    fn upsert_summary(&self, summary: &PeriodSummary) -> Result<()> {
        let data = serde_json::to_string(summary)?;
        let key = &summary.key;

        let mut conn = self.conn();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO period_summaries (
                user_id, period_type, period_start, period_end, entries_count, data, generated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(user_id, period_type, period_start, period_end) DO UPDATE SET
                entries_count = excluded.entries_count,
                data = excluded.data,
                generated_at = excluded.generated_at",
            params![
                key.user_id,
                key.period_type.as_str(),
                key.period_start.format(DATE_FORMAT).to_string(),
                key.period_end.format(DATE_FORMAT).to_string(),
                summary.entries_count as i64,
                data,
                summary.generated_at.to_rfc3339(),
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn get_summary(&self, key: &PeriodKey) -> Result<Option<PeriodSummary>> {
        let data = self
            .conn()
            .query_row(
                "SELECT data FROM period_summaries
                 WHERE user_id = ?1 AND period_type = ?2 AND period_start = ?3 AND period_end = ?4",
                params![
                    key.user_id,
                    key.period_type.as_str(),
                    key.period_start.format(DATE_FORMAT).to_string(),
                    key.period_end.format(DATE_FORMAT).to_string(),
                ],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        data.as_deref().map(decode_summary).transpose()
    }
}

fn decode_summary(data: &str) -> Result<PeriodSummary> {
    serde_json::from_str(data).map_err(|e| corrupt("period_summaries", e))
}

fn corrupt(table: &str, message: impl ToString) -> CoreError {
    DatabaseError::CorruptRow {
        table: table.to_string(),
        message: message.to_string(),
    }
    .into()
}

fn parse_date(table: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| corrupt(table, e))
}

fn parse_clock(table: &str, value: &str) -> Result<ClockTime> {
    value.parse().map_err(|e| corrupt(table, e))
}

fn parse_timestamp(table: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| corrupt(table, e))
}

/// Raw `sleep_profiles` row before text columns are parsed.
struct ProfileRow {
    user_id: String,
    chronotype: String,
    weekday_bedtime: String,
    weekday_wake_time: String,
    weekend_bedtime: String,
    weekend_wake_time: String,
    target_sleep_hours: f64,
    sleep_efficiency_target: f64,
    updated_at: String,
}

impl ProfileRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            user_id: row.get(0)?,
            chronotype: row.get(1)?,
            weekday_bedtime: row.get(2)?,
            weekday_wake_time: row.get(3)?,
            weekend_bedtime: row.get(4)?,
            weekend_wake_time: row.get(5)?,
            target_sleep_hours: row.get(6)?,
            sleep_efficiency_target: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    fn into_profile(self) -> Result<SleepProfile> {
        const TABLE: &str = "sleep_profiles";
        Ok(SleepProfile {
            user_id: self.user_id,
            chronotype: self.chronotype.parse().map_err(|e| corrupt(TABLE, e))?,
            weekday: SleepSchedule {
                bedtime: parse_clock(TABLE, &self.weekday_bedtime)?,
                wake_time: parse_clock(TABLE, &self.weekday_wake_time)?,
            },
            weekend: SleepSchedule {
                bedtime: parse_clock(TABLE, &self.weekend_bedtime)?,
                wake_time: parse_clock(TABLE, &self.weekend_wake_time)?,
            },
            target_sleep_hours: self.target_sleep_hours,
            sleep_efficiency_target: self.sleep_efficiency_target,
            updated_at: parse_timestamp(TABLE, &self.updated_at)?,
        })
    }
}

/// Raw `sleep_entries` row before text columns are parsed.
struct EntryRow {
    id: i64,
    user_id: String,
    date: String,
    bedtime: String,
    wake_time: String,
    sleep_quality: u8,
    sleepiness_score: u8,
    mood: String,
    caffeine_consumed: bool,
    caffeine_amount_mg: f64,
    caffeine_last_intake: Option<String>,
    exercise: bool,
    stress: u8,
    notes: Option<String>,
    target_hours: f64,
    created_at: String,
}

impl EntryRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            date: row.get(2)?,
            bedtime: row.get(3)?,
            wake_time: row.get(4)?,
            sleep_quality: row.get(5)?,
            sleepiness_score: row.get(6)?,
            mood: row.get(7)?,
            caffeine_consumed: row.get(8)?,
            caffeine_amount_mg: row.get(9)?,
            caffeine_last_intake: row.get(10)?,
            exercise: row.get(11)?,
            stress: row.get(12)?,
            notes: row.get(13)?,
            target_hours: row.get(14)?,
            created_at: row.get(15)?,
        })
    }

    fn into_entry(self) -> Result<SleepEntry> {
        const TABLE: &str = "sleep_entries";
        Ok(SleepEntry {
            id: Some(self.id),
            user_id: self.user_id,
            date: parse_date(TABLE, &self.date)?,
            bedtime: parse_clock(TABLE, &self.bedtime)?,
            wake_time: parse_clock(TABLE, &self.wake_time)?,
            sleep_quality: self.sleep_quality,
            sleepiness_score: self.sleepiness_score,
            mood: self.mood.parse().map_err(|e| corrupt(TABLE, e))?,
            caffeine: Caffeine {
                consumed: self.caffeine_consumed,
                amount_mg: self.caffeine_amount_mg,
                last_intake: self
                    .caffeine_last_intake
                    .as_deref()
                    .map(|t| parse_clock(TABLE, t))
                    .transpose()?,
            },
            exercise: self.exercise,
            stress: self.stress,
            notes: self.notes,
            target_hours: self.target_hours,
            created_at: parse_timestamp(TABLE, &self.created_at)?,
        })
    }
}
