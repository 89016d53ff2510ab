//! Productivity curve generation.
//!
//! Combines the circadian baseline for a chronotype with the homeostatic
//! pressure from current sleep debt into one point per hour of the day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::circadian;
use crate::model::Chronotype;
use crate::recommendations::Recommendation;

/// Days of logging needed for full confidence.
pub const DEFAULT_CONFIDENCE_WINDOW_DAYS: u32 = 7;

/// Discretized productivity band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductivityZone {
    Critical,
    Low,
    Moderate,
    High,
    Peak,
}

impl ProductivityZone {
    /// peak >= 0.8, high >= 0.6, moderate >= 0.4, low >= 0.2, else critical.
    pub fn classify(productivity: f64) -> Self {
        match productivity {
            p if p >= 0.8 => ProductivityZone::Peak,
            p if p >= 0.6 => ProductivityZone::High,
            p if p >= 0.4 => ProductivityZone::Moderate,
            p if p >= 0.2 => ProductivityZone::Low,
            _ => ProductivityZone::Critical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductivityZone::Critical => "critical",
            ProductivityZone::Low => "low",
            ProductivityZone::Moderate => "moderate",
            ProductivityZone::High => "high",
            ProductivityZone::Peak => "peak",
        }
    }
}

impl fmt::Display for ProductivityZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Productivity estimate for one hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Hour of day (0-23)
    pub hour: u8,
    /// Estimated productivity (0.0-1.0)
    pub productivity: f64,
    pub zone: ProductivityZone,
    /// Baseline alertness for this hour
    pub circadian_factor: f64,
    /// Multiplier left after debt pressure, `1 - pressure`
    pub homeostatic_factor: f64,
}

/// A full 24-hour productivity curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductivityCurve {
    pub chronotype: Chronotype,
    pub debt_hours: f64,
    pub homeostatic_pressure: f64,
    pub points: Vec<CurvePoint>,
}

impl ProductivityCurve {
    /// Point for `hour`, if in range.
    pub fn point(&self, hour: u8) -> Option<&CurvePoint> {
        self.points.get(hour as usize)
    }

    /// Hour with the highest productivity; the earliest wins ties.
    pub fn peak_hour(&self) -> Option<u8> {
        self.points
            .iter()
            .fold(None::<&CurvePoint>, |best, p| match best {
                Some(b) if b.productivity >= p.productivity => Some(b),
                _ => Some(p),
            })
            .map(|p| p.hour)
    }

    pub fn average_productivity(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        self.points.iter().map(|p| p.productivity).sum::<f64>() / self.points.len() as f64
    }

    /// Render the curve as an ASCII chart for terminals.
    pub fn render_ascii_chart(&self) -> String {
        let mut output = format!(
            "\nProductivity Curve ({}, {:.1}h debt):\n",
            self.chronotype, self.debt_hours
        );
        output.push_str(&"─".repeat(52));
        output.push('\n');

        for point in &self.points {
            let bar_length = (point.productivity * 30.0).round() as usize;
            let bar = "█".repeat(bar_length.min(30));
            let empty = " ".repeat(30 - bar_length.min(30));
            output.push_str(&format!(
                "{:02}:00 {}{} {:>3.0}% {}\n",
                point.hour,
                bar,
                empty,
                point.productivity * 100.0,
                point.zone
            ));
        }

        output.push_str(&"─".repeat(52));
        output.push('\n');
        output
    }
}

/// Builds productivity curves from chronotype and debt.
#[derive(Debug, Clone)]
pub struct CurveGenerator {
    /// Days of logging needed for full confidence
    pub confidence_window_days: u32,
}

impl Default for CurveGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CurveGenerator {
    pub fn new() -> Self {
        Self {
            confidence_window_days: DEFAULT_CONFIDENCE_WINDOW_DAYS,
        }
    }

    pub fn with_window(confidence_window_days: u32) -> Self {
        Self {
            confidence_window_days,
        }
    }

    /// One point per hour: `clamp(circadian[h] * (1 - pressure), 0, 1)`.
    pub fn generate(&self, chronotype: Chronotype, debt_hours: f64) -> ProductivityCurve {
        let pressure = circadian::homeostatic_pressure(debt_hours);
        let homeostatic_factor = 1.0 - pressure;

        let points = circadian::template(chronotype)
            .iter()
            .enumerate()
            .map(|(hour, &circadian_factor)| {
                let productivity = (circadian_factor * homeostatic_factor).clamp(0.0, 1.0);
                CurvePoint {
                    hour: hour as u8,
                    productivity,
                    zone: ProductivityZone::classify(productivity),
                    circadian_factor,
                    homeostatic_factor,
                }
            })
            .collect();

        ProductivityCurve {
            chronotype,
            debt_hours: debt_hours.max(0.0),
            homeostatic_pressure: pressure,
            points,
        }
    }

    pub fn confidence(&self, recent_entry_count: usize) -> f64 {
        confidence(recent_entry_count, self.confidence_window_days)
    }
}

/// `min(1, recent_entry_count / window_days)`. A zero window means no
/// data is expected, so confidence is full.
pub fn confidence(recent_entry_count: usize, window_days: u32) -> f64 {
    if window_days == 0 {
        return 1.0;
    }
    (recent_entry_count as f64 / window_days as f64).min(1.0)
}

/// Today's curve as served to dashboard callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveReport {
    pub user_id: String,
    pub date: NaiveDate,
    pub curve: ProductivityCurve,
    pub confidence: f64,
    /// Set when fewer entries than the confidence window were available
    pub partial_data: bool,
    pub recommendations: Vec<Recommendation>,
}

impl CurveReport {
    pub fn new(
        user_id: impl Into<String>,
        date: NaiveDate,
        curve: ProductivityCurve,
        confidence: f64,
        recommendations: Vec<Recommendation>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            date,
            curve,
            confidence,
            partial_data: confidence < 1.0,
            recommendations,
        }
    }
}
