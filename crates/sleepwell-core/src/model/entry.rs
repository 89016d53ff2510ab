//! Logged sleep sessions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::ClockTime;
use crate::debt;
use crate::error::ValidationError;

/// Self-reported mood on waking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Terrible,
    Poor,
    #[default]
    Neutral,
    Good,
    Excellent,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Terrible => "terrible",
            Mood::Poor => "poor",
            Mood::Neutral => "neutral",
            Mood::Good => "good",
            Mood::Excellent => "excellent",
        }
    }
}

impl FromStr for Mood {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "terrible" => Ok(Mood::Terrible),
            "poor" => Ok(Mood::Poor),
            "neutral" => Ok(Mood::Neutral),
            "good" => Ok(Mood::Good),
            "excellent" => Ok(Mood::Excellent),
            other => Err(ValidationError::InvalidValue {
                field: "mood".to_string(),
                message: format!("unknown mood '{other}'"),
            }),
        }
    }
}

/// Caffeine intake on the day before the night being logged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Caffeine {
    pub consumed: bool,
    /// Milligrams
    pub amount_mg: f64,
    pub last_intake: Option<ClockTime>,
}

/// A validated sleep session. One per user per calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepEntry {
    pub id: Option<i64>,
    pub user_id: String,
    pub date: NaiveDate,
    pub bedtime: ClockTime,
    pub wake_time: ClockTime,
    /// 1-10
    pub sleep_quality: u8,
    /// Stanford sleepiness scale, 1-7
    pub sleepiness_score: u8,
    pub mood: Mood,
    pub caffeine: Caffeine,
    pub exercise: bool,
    /// 1-10
    pub stress: u8,
    pub notes: Option<String>,
    /// Target sleep hours in effect when the entry was logged
    pub target_hours: f64,
    pub created_at: DateTime<Utc>,
}

impl SleepEntry {
    /// Hours slept, wrapping past midnight. Always in (0, 24].
    pub fn sleep_duration(&self) -> f64 {
        self.bedtime.hours_until(self.wake_time)
    }

    /// Shortfall against the entry's own target.
    pub fn debt(&self) -> f64 {
        debt::entry_debt(self, self.target_hours)
    }
}

/// Unvalidated entry as it arrives from a caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSleepEntry {
    pub date: Option<NaiveDate>,
    pub bedtime: Option<String>,
    pub wake_time: Option<String>,
    pub sleep_quality: u8,
    pub sleepiness_score: u8,
    #[serde(default)]
    pub mood: Mood,
    #[serde(default)]
    pub caffeine: Caffeine,
    #[serde(default)]
    pub exercise: bool,
    pub stress: u8,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewSleepEntry {
    /// Validate every field and bind the entry to `user_id` with the
    /// currently applicable `target_hours`.
    pub fn validate(
        self,
        user_id: &str,
        target_hours: f64,
    ) -> Result<SleepEntry, ValidationError> {
        let date = self
            .date
            .ok_or_else(|| ValidationError::MissingField("date".to_string()))?;
        let bedtime = self
            .bedtime
            .as_deref()
            .map(|v| ClockTime::parse_field("bedtime", v))
            .transpose()?;
        let wake_time = self
            .wake_time
            .as_deref()
            .map(|v| ClockTime::parse_field("wake_time", v))
            .transpose()?;
        debt::sleep_duration(bedtime, wake_time)?;

        ValidationError::check_range("sleep_quality", self.sleep_quality as f64, 1.0, 10.0)?;
        ValidationError::check_range("sleepiness_score", self.sleepiness_score as f64, 1.0, 7.0)?;
        ValidationError::check_range("stress", self.stress as f64, 1.0, 10.0)?;
        ValidationError::check_range("caffeine.amount_mg", self.caffeine.amount_mg, 0.0, f64::MAX)?;
        ValidationError::check_range(
            "target_hours",
            target_hours,
            super::MIN_TARGET_SLEEP_HOURS,
            super::MAX_TARGET_SLEEP_HOURS,
        )?;

        // checked by sleep_duration above
        let (Some(bedtime), Some(wake_time)) = (bedtime, wake_time) else {
            return Err(ValidationError::InvalidEntry {
                reason: "missing sleep times".to_string(),
            });
        };

        Ok(SleepEntry {
            id: None,
            user_id: user_id.to_string(),
            date,
            bedtime,
            wake_time,
            sleep_quality: self.sleep_quality,
            sleepiness_score: self.sleepiness_score,
            mood: self.mood,
            caffeine: self.caffeine,
            exercise: self.exercise,
            stress: self.stress,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
            target_hours,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(bed: Option<&str>, wake: Option<&str>) -> NewSleepEntry {
        NewSleepEntry {
            date: NaiveDate::from_ymd_opt(2024, 5, 1),
            bedtime: bed.map(String::from),
            wake_time: wake.map(String::from),
            sleep_quality: 7,
            sleepiness_score: 3,
            stress: 4,
            ..Default::default()
        }
    }

    #[test]
    fn validate_builds_entry_with_target() {
        let entry = draft(Some("23:00"), Some("06:30")).validate("u1", 8.0).unwrap();
        assert_eq!(entry.user_id, "u1");
        assert_eq!(entry.sleep_duration(), 7.5);
        assert_eq!(entry.debt(), 0.5);
        assert_eq!(entry.target_hours, 8.0);
    }

    #[test]
    fn validate_requires_both_times() {
        let err = draft(None, Some("06:30")).validate("u1", 8.0).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidEntry { ref reason } if reason == "missing bedtime"));

        let err = draft(Some("23:00"), None).validate("u1", 8.0).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidEntry { ref reason } if reason == "missing wake_time"));
    }

    #[test]
    fn validate_rejects_bad_clock_time() {
        let err = draft(Some("25:00"), Some("06:30")).validate("u1", 8.0).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidClockTime { .. }));
    }

    #[test]
    fn validate_rejects_out_of_range_scores() {
        let mut d = draft(Some("23:00"), Some("07:00"));
        d.sleep_quality = 11;
        assert!(d.validate("u1", 8.0).is_err());

        let mut d = draft(Some("23:00"), Some("07:00"));
        d.sleepiness_score = 8;
        assert!(d.validate("u1", 8.0).is_err());

        let mut d = draft(Some("23:00"), Some("07:00"));
        d.stress = 0;
        assert!(d.validate("u1", 8.0).is_err());
    }

    #[test]
    fn blank_notes_are_dropped() {
        let mut d = draft(Some("23:00"), Some("07:00"));
        d.notes = Some("   ".to_string());
        assert_eq!(d.validate("u1", 8.0).unwrap().notes, None);
    }

    #[test]
    fn mood_round_trips_through_str() {
        for mood in [Mood::Terrible, Mood::Poor, Mood::Neutral, Mood::Good, Mood::Excellent] {
            assert_eq!(mood.as_str().parse::<Mood>().unwrap(), mood);
        }
        assert!("ecstatic".parse::<Mood>().is_err());
    }
}
