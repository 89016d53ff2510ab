//! Per-user sleep preferences.

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ClockTime;
use crate::error::ValidationError;

pub const MIN_TARGET_SLEEP_HOURS: f64 = 4.0;
pub const MAX_TARGET_SLEEP_HOURS: f64 = 12.0;

/// Categorical sleep-timing disposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Chronotype {
    Morning,
    Evening,
    #[default]
    Intermediate,
}

impl Chronotype {
    pub const ALL: [Chronotype; 3] = [
        Chronotype::Morning,
        Chronotype::Evening,
        Chronotype::Intermediate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Chronotype::Morning => "morning",
            Chronotype::Evening => "evening",
            Chronotype::Intermediate => "intermediate",
        }
    }
}

impl fmt::Display for Chronotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chronotype {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "morning" => Ok(Chronotype::Morning),
            "evening" => Ok(Chronotype::Evening),
            "intermediate" => Ok(Chronotype::Intermediate),
            other => Err(ValidationError::InvalidValue {
                field: "chronotype".to_string(),
                message: format!("'{other}' is not one of morning, evening, intermediate"),
            }),
        }
    }
}

/// Planned bedtime and wake time for one kind of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepSchedule {
    pub bedtime: ClockTime,
    pub wake_time: ClockTime,
}

impl SleepSchedule {
    /// Planned hours of sleep, wrapping past midnight.
    pub fn planned_hours(&self) -> f64 {
        self.bedtime.hours_until(self.wake_time)
    }
}

/// A user's sleep preferences. One per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepProfile {
    pub user_id: String,
    pub chronotype: Chronotype,
    pub weekday: SleepSchedule,
    pub weekend: SleepSchedule,
    /// Hours of sleep the user aims for, in [4, 12]
    pub target_sleep_hours: f64,
    /// Percentage of target the user expects to reach, in [0, 100]
    pub sleep_efficiency_target: f64,
    pub updated_at: DateTime<Utc>,
}

impl SleepProfile {
    /// Create a profile with the usual 23:00-07:00 schedule.
    pub fn new(user_id: impl Into<String>, chronotype: Chronotype, target_sleep_hours: f64) -> Self {
        let schedule = SleepSchedule {
            bedtime: ClockTime::from_decimal_hours(23.0),
            wake_time: ClockTime::from_decimal_hours(7.0),
        };
        Self {
            user_id: user_id.into(),
            chronotype,
            weekday: schedule,
            weekend: schedule,
            target_sleep_hours,
            sleep_efficiency_target: 85.0,
            updated_at: Utc::now(),
        }
    }

    /// Check field ranges.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.user_id.trim().is_empty() {
            return Err(ValidationError::MissingField("user_id".to_string()));
        }
        ValidationError::check_range(
            "target_sleep_hours",
            self.target_sleep_hours,
            MIN_TARGET_SLEEP_HOURS,
            MAX_TARGET_SLEEP_HOURS,
        )?;
        ValidationError::check_range(
            "sleep_efficiency_target",
            self.sleep_efficiency_target,
            0.0,
            100.0,
        )?;
        Ok(())
    }

    /// Schedule that applies to the night starting on `date`.
    pub fn schedule_for(&self, date: NaiveDate) -> &SleepSchedule {
        match date.weekday() {
            Weekday::Sat | Weekday::Sun => &self.weekend,
            _ => &self.weekday,
        }
    }

    pub fn scheduled_duration(&self, date: NaiveDate) -> f64 {
        self.schedule_for(date).planned_hours()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    #[test]
    fn chronotype_parses_case_insensitively() {
        assert_eq!("Morning".parse::<Chronotype>().unwrap(), Chronotype::Morning);
        assert_eq!(" evening ".parse::<Chronotype>().unwrap(), Chronotype::Evening);
        assert!("owl".parse::<Chronotype>().is_err());
    }

    #[test]
    fn chronotype_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Chronotype::Intermediate).unwrap(),
            "\"intermediate\""
        );
    }

    #[test]
    fn validate_enforces_target_range() {
        let mut profile = SleepProfile::new("u1", Chronotype::Morning, 8.0);
        assert!(profile.validate().is_ok());

        profile.target_sleep_hours = 3.5;
        assert!(profile.validate().is_err());

        profile.target_sleep_hours = 12.5;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn validate_enforces_efficiency_range() {
        let mut profile = SleepProfile::new("u1", Chronotype::Morning, 8.0);
        profile.sleep_efficiency_target = 101.0;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn validate_requires_user() {
        let profile = SleepProfile::new("  ", Chronotype::Morning, 8.0);
        assert_eq!(
            profile.validate().unwrap_err(),
            ValidationError::MissingField("user_id".to_string())
        );
    }

    #[test]
    fn weekend_schedule_applies_on_saturday_and_sunday() {
        let mut profile = SleepProfile::new("u1", Chronotype::Evening, 8.0);
        profile.weekend = SleepSchedule {
            bedtime: clock("00:30"),
            wake_time: clock("09:30"),
        };

        let friday = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(profile.scheduled_duration(friday), 8.0);
        assert_eq!(profile.scheduled_duration(saturday), 9.0);
    }
}
