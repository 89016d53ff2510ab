//! Time-of-day values in `HH:MM` form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

const MINUTES_PER_DAY: u16 = 24 * 60;

/// A wall-clock time of day with minute precision.
///
/// Accepts `H:MM` or `HH:MM` (hour 0-23, minute 00-59) and always
/// displays zero-padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    minutes: u16,
}

impl ClockTime {
    /// Build from hour and minute components.
    pub fn new(hour: u8, minute: u8) -> Result<Self, ValidationError> {
        if hour > 23 || minute > 59 {
            return Err(ValidationError::InvalidClockTime {
                field: "time".to_string(),
                value: format!("{hour}:{minute:02}"),
            });
        }
        Ok(Self {
            minutes: hour as u16 * 60 + minute as u16,
        })
    }

    /// Parse a clock time, naming `field` in the error on failure.
    pub fn parse_field(field: &str, value: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidClockTime {
            field: field.to_string(),
            value: value.to_string(),
        };

        let (hour, minute) = value.trim().split_once(':').ok_or_else(invalid)?;
        let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(hour) || hour.len() > 2 || !all_digits(minute) || minute.len() != 2 {
            return Err(invalid());
        }

        let hour: u8 = hour.parse().map_err(|_| invalid())?;
        let minute: u8 = minute.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }

    /// Build from fractional hours, rounding to the nearest minute and
    /// wrapping into a single day.
    pub fn from_decimal_hours(hours: f64) -> Self {
        let total = (hours * 60.0).round() as i64;
        let wrapped = total.rem_euclid(MINUTES_PER_DAY as i64) as u16;
        Self { minutes: wrapped }
    }

    pub fn hour(&self) -> u8 {
        (self.minutes / 60) as u8
    }

    pub fn minute(&self) -> u8 {
        (self.minutes % 60) as u8
    }

    /// Minutes since midnight.
    pub fn minutes_since_midnight(&self) -> u16 {
        self.minutes
    }

    /// Time of day as fractional hours, e.g. 06:30 -> 6.5.
    pub fn as_decimal_hours(&self) -> f64 {
        self.minutes as f64 / 60.0
    }

    /// Hours from `self` until `later`, treating `later <= self` as the
    /// next day. The result is in (0, 24].
    pub fn hours_until(&self, later: ClockTime) -> f64 {
        let diff = if later.minutes <= self.minutes {
            later.minutes + MINUTES_PER_DAY - self.minutes
        } else {
            later.minutes - self.minutes
        };
        diff as f64 / 60.0
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_field("time", s)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}
