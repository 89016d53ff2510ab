mod config;
pub mod database;
pub mod migrations;

pub use config::{CacheConfig, Config, EngineConfig, LoggingConfig, TrendConfig, MAX_WINDOW_DAYS};
pub use database::Database;

use chrono::{Duration, NaiveDate};
use std::path::PathBuf;

use crate::error::{ConfigError, Result, ValidationError};
use crate::model::{SleepEntry, SleepProfile};
use crate::summary::{PeriodKey, PeriodSummary};

/// Persistence collaborator for profiles, entries and period summaries.
///
/// Implementations must reject a second entry for the same user and date
/// with [`CoreError::DuplicateEntry`](crate::CoreError::DuplicateEntry),
/// and `upsert_summary` must replace a stored summary atomically.
pub trait SleepStore: Send + Sync {
    fn get_profile(&self, user_id: &str) -> Result<Option<SleepProfile>>;

    /// Insert or replace the user's profile.
    fn save_profile(&self, profile: &SleepProfile) -> Result<()>;

    /// Insert a validated entry and return its id.
    fn insert_entry(&self, entry: &SleepEntry) -> Result<i64>;

    /// Entries dated within `[start, end]`, oldest first.
    fn entries_between(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SleepEntry>>;

    /// Entries in the `days`-long window ending on `as_of`, oldest first.
    fn recent_entries(&self, user_id: &str, as_of: NaiveDate, days: u32) -> Result<Vec<SleepEntry>> {
        let start = window_start(as_of, days)?;
        self.entries_between(user_id, start, as_of)
    }

    /// Remove the entry for `date`. Returns whether one existed.
    fn delete_entry(&self, user_id: &str, date: NaiveDate) -> Result<bool>;

    fn upsert_summary(&self, summary: &PeriodSummary) -> Result<()>;

    fn get_summary(&self, key: &PeriodKey) -> Result<Option<PeriodSummary>>;
}

/// First day of the `days`-long window ending on `as_of`.
///
/// # Errors
/// `InvalidValue` when the window reaches past the representable dates.
pub fn window_start(as_of: NaiveDate, days: u32) -> std::result::Result<NaiveDate, ValidationError> {
    as_of
        .checked_sub_signed(Duration::days(i64::from(days.saturating_sub(1))))
        .ok_or_else(|| ValidationError::InvalidValue {
            field: "window_days".to_string(),
            message: format!("a {days}-day window ending {as_of} is out of range"),
        })
}

/// Returns `~/.config/sleepwell[-dev]/` based on SLEEPWELL_ENV.
///
/// Set SLEEPWELL_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("SLEEPWELL_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("sleepwell-dev")
    } else {
        base_dir.join("sleepwell")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
