//! # Sleepwell Core Library
//!
//! Sleep debt tracking and circadian productivity forecasting. All
//! operations are exposed through the standalone `sleepwell` CLI, which is
//! a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Model**: profiles, nightly entries and wall-clock times
//! - **Debt**: per-night and windowed sleep debt
//! - **Curve**: 24-hour productivity forecast from chronotype and debt,
//!   with deep-work and rest recommendations
//! - **Summary**: daily/weekly/monthly aggregation with trends and insights
//! - **Storage**: SQLite persistence and TOML configuration
//!
//! ## Key Components
//!
//! - [`SleepService`]: request-level facade tying storage to the calculators
//! - [`CurveGenerator`]: productivity curve model
//! - [`PeriodSummaryAggregator`]: period statistics and insights
//! - [`Database`]: SQLite-backed [`SleepStore`]
//! - [`Config`]: application configuration management

pub mod cache;
pub mod circadian;
pub mod curve;
pub mod debt;
pub mod error;
pub mod model;
pub mod recommendations;
pub mod service;
pub mod storage;
pub mod summary;

pub use cache::CurveCache;
pub use curve::{CurveGenerator, CurvePoint, CurveReport, ProductivityCurve, ProductivityZone};
pub use debt::{DebtResult, WindowDebt};
pub use error::{ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use model::{
    Caffeine, Chronotype, ClockTime, Mood, NewSleepEntry, SleepEntry, SleepProfile, SleepSchedule,
};
pub use recommendations::{Recommendation, RecommendationEngine, RecommendationType, TimeSlot};
pub use service::{ServiceSettings, SleepService};
pub use storage::{Config, Database, SleepStore};
pub use summary::{
    Insight, PeriodKey, PeriodSummary, PeriodSummaryAggregator, PeriodType, SummaryOutcome, Trend,
};
