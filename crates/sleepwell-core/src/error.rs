//! Core error types for sleepwell-core.
//!
//! Validation failures are rejected at the boundary and never clamped.
//! A missing profile is an error; an empty entry window is not.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for sleepwell-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No sleep profile exists for the user
    #[error("No sleep profile found for user '{user_id}'")]
    ProfileNotFound { user_id: String },

    /// An entry for this user and date already exists
    #[error("A sleep entry for user '{user_id}' on {date} already exists")]
    DuplicateEntry { user_id: String, date: NaiveDate },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// A stored row could not be decoded
    #[error("Corrupt row in '{table}': {message}")]
    CorruptRow { table: String, message: String },

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// The data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Clock time not in HH:MM form
    #[error("Invalid clock time '{value}' for '{field}': expected HH:MM")]
    InvalidClockTime { field: String, value: String },

    /// Required field absent
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Numeric field outside its allowed range
    #[error("Value {value} for '{field}' is outside [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Sleep times missing, or a duration outside (0, 24] hours
    #[error("Invalid sleep entry: {reason}")]
    InvalidEntry { reason: String },

    /// Invalid enumerated or free-form value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Invalid date range
    #[error("Invalid period: end ({end}) is before start ({start})")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },
}

impl ValidationError {
    /// Check that `value` lies in `[min, max]`.
    pub fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), Self> {
        if value.is_finite() && value >= min && value <= max {
            Ok(())
        } else {
            Err(ValidationError::OutOfRange {
                field: field.to_string(),
                value,
                min,
                max,
            })
        }
    }
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked
                    || err.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
