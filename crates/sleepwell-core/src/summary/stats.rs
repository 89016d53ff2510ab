//! Statistical helpers for period summaries.
//!
//! Every helper guards empty and short inputs and never returns NaN.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ClockTime;

/// Standard deviation (hours) that drives consistency to zero.
pub const CONSISTENCY_NORMALIZER: f64 = 3.0;

/// Minimum number of points before a trend is reported.
pub const MIN_TREND_POINTS: usize = 3;

/// Mean difference below which a trend is stable.
pub const TREND_STABLE_BAND: f64 = 0.1;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population (not sample) standard deviation.
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// `max(0, 1 - stddev / 3)`, in [0, 1]. No durations scores zero.
pub fn consistency_score(durations: &[f64]) -> f64 {
    match population_std_dev(durations) {
        Some(sd) => (1.0 - sd / CONSISTENCY_NORMALIZER).clamp(0.0, 1.0),
        None => 0.0,
    }
}

/// Round to the nearest half hour.
pub fn round_to_half_hour(hours: f64) -> f64 {
    (hours * 2.0).round() / 2.0
}

/// Most frequent half-hour bucket. Ties go to the bucket seen first in a
/// single left-to-right pass.
pub fn most_common_duration(durations: &[f64]) -> Option<f64> {
    let mut counts: Vec<(f64, usize)> = Vec::new();
    for &d in durations {
        let bucket = round_to_half_hour(d);
        match counts.iter_mut().find(|(b, _)| *b == bucket) {
            Some((_, n)) => *n += 1,
            None => counts.push((bucket, 1)),
        }
    }

    let mut best: Option<(f64, usize)> = None;
    for (bucket, n) in counts {
        match best {
            Some((_, best_n)) if best_n >= n => {}
            _ => best = Some((bucket, n)),
        }
    }
    best.map(|(bucket, _)| bucket)
}

/// Average of clock times as plain decimal hours, reformatted.
///
/// Times are not unwrapped around midnight: 23:00 and 01:00 average to
/// 12:00.
pub fn average_clock_time(times: &[ClockTime]) -> Option<ClockTime> {
    let hours: Vec<f64> = times.iter().map(ClockTime::as_decimal_hours).collect();
    mean(&hours).map(ClockTime::from_decimal_hours)
}

/// Direction of a metric across a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Worsening,
    Stable,
    InsufficientData,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Worsening => "worsening",
            Trend::Stable => "stable",
            Trend::InsufficientData => "insufficient_data",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compare the mean of the first half against the second half.
///
/// Halves are `values[..n/2]` and `values[ceil(n/2)..]`, so the middle
/// element of an odd-length series belongs to neither. With
/// `higher_is_better == false` a rise reads as worsening.
pub fn trend(values: &[f64], higher_is_better: bool) -> Trend {
    let n = values.len();
    if n < MIN_TREND_POINTS {
        return Trend::InsufficientData;
    }

    let first = &values[..n / 2];
    let second = &values[n.div_ceil(2)..];
    let (Some(first_mean), Some(second_mean)) = (mean(first), mean(second)) else {
        return Trend::InsufficientData;
    };

    let diff = second_mean - first_mean;
    if diff.abs() < TREND_STABLE_BAND {
        Trend::Stable
    } else if (diff > 0.0) == higher_is_better {
        Trend::Improving
    } else {
        Trend::Worsening
    }
}
