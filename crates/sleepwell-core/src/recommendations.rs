//! Time-block recommendations derived from a productivity curve.
//!
//! Only unambiguous peaks and troughs are flagged. Hours with
//! productivity strictly between the rest and deep-work thresholds get
//! no recommendation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::curve::{CurvePoint, ProductivityCurve};

pub const DEEP_WORK_THRESHOLD: f64 = 0.8;
pub const DEEP_WORK_MIN_HOURS: u8 = 2;
pub const DEEP_WORK_PRIORITY: i32 = 5;
pub const REST_THRESHOLD: f64 = 0.3;
pub const REST_PRIORITY: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    DeepWork,
    Rest,
}

impl RecommendationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationType::DeepWork => "deep_work",
            RecommendationType::Rest => "rest",
        }
    }
}

impl fmt::Display for RecommendationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open hour range `[start, end)`. `end` may be 24.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: u8,
    pub end: u8,
}

impl TimeSlot {
    pub fn hours(&self) -> u8 {
        self.end.saturating_sub(self.start)
    }

    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00-{:02}:00", self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub time_slot: TimeSlot,
    /// Higher is more important
    pub priority: i32,
    pub description: String,
}

/// Scans a curve for contiguous windows worth acting on.
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine;

impl RecommendationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Deep-work windows (>= 0.8 for at least two hours) and rest windows
    /// (<= 0.3, any length), sorted by priority with scan order kept on ties.
    pub fn recommend(&self, curve: &ProductivityCurve) -> Vec<Recommendation> {
        let mut recommendations: Vec<Recommendation> =
            contiguous_runs(&curve.points, |p| p.productivity >= DEEP_WORK_THRESHOLD)
                .into_iter()
                .filter(|slot| slot.hours() >= DEEP_WORK_MIN_HOURS)
                .map(|time_slot| Recommendation {
                    kind: RecommendationType::DeepWork,
                    time_slot,
                    priority: DEEP_WORK_PRIORITY,
                    description: "peak focus window".to_string(),
                })
                .collect();

        recommendations.extend(
            contiguous_runs(&curve.points, |p| p.productivity <= REST_THRESHOLD)
                .into_iter()
                .map(|time_slot| Recommendation {
                    kind: RecommendationType::Rest,
                    time_slot,
                    priority: REST_PRIORITY,
                    description: "low energy window, schedule rest or light tasks".to_string(),
                }),
        );

        // stable sort keeps scan order within a priority
        recommendations.sort_by(|a, b| b.priority.cmp(&a.priority));
        recommendations
    }
}

/// Maximal runs of consecutive points matching `pred`.
fn contiguous_runs(points: &[CurvePoint], pred: impl Fn(&CurvePoint) -> bool) -> Vec<TimeSlot> {
    let mut runs = Vec::new();
    let mut start: Option<u8> = None;

    for point in points {
        match (pred(point), start) {
            (true, None) => start = Some(point.hour),
            (false, Some(s)) => {
                runs.push(TimeSlot { start: s, end: point.hour });
                start = None;
            }
            _ => {}
        }
    }
    if let (Some(s), Some(last)) = (start, points.last()) {
        runs.push(TimeSlot { start: s, end: last.hour + 1 });
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{CurveGenerator, ProductivityZone};
    use crate::model::Chronotype;

    fn curve_from(values: &[f64]) -> ProductivityCurve {
        ProductivityCurve {
            chronotype: Chronotype::Intermediate,
            debt_hours: 0.0,
            homeostatic_pressure: 0.0,
            points: values
                .iter()
                .enumerate()
                .map(|(h, &v)| CurvePoint {
                    hour: h as u8,
                    productivity: v,
                    zone: ProductivityZone::classify(v),
                    circadian_factor: v,
                    homeostatic_factor: 1.0,
                })
                .collect(),
        }
    }

    #[test]
    fn single_peak_hour_is_not_deep_work() {
        let mut values = vec![0.5; 24];
        values[10] = 0.9;
        let recs = RecommendationEngine::new().recommend(&curve_from(&values));
        assert!(recs.is_empty());
    }

    #[test]
    fn two_hour_peak_is_deep_work() {
        let mut values = vec![0.5; 24];
        values[9] = 0.85;
        values[10] = 0.8;
        let recs = RecommendationEngine::new().recommend(&curve_from(&values));
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].kind, RecommendationType::DeepWork);
        assert_eq!(recs[0].time_slot, TimeSlot { start: 9, end: 11 });
        assert_eq!(recs[0].priority, 5);
        assert_eq!(recs[0].description, "peak focus window");
    }

    #[test]
    fn rest_windows_any_length_and_sorted_after_deep_work() {
        let mut values = vec![0.5; 24];
        values[0] = 0.1;
        values[1] = 0.3;
        values[5] = 0.2;
        values[14] = 0.9;
        values[15] = 0.9;
        values[16] = 0.9;
        let recs = RecommendationEngine::new().recommend(&curve_from(&values));

        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0].kind, RecommendationType::DeepWork);
        assert_eq!(recs[0].time_slot, TimeSlot { start: 14, end: 17 });
        assert_eq!(recs[1].time_slot, TimeSlot { start: 0, end: 2 });
        assert_eq!(recs[2].time_slot, TimeSlot { start: 5, end: 6 });
        assert!(recs[1..].iter().all(|r| r.priority == REST_PRIORITY));
    }

    #[test]
    fn run_reaching_midnight_ends_at_24() {
        let mut values = vec![0.5; 24];
        values[22] = 0.25;
        values[23] = 0.25;
        let recs = RecommendationEngine::new().recommend(&curve_from(&values));
        assert_eq!(recs[0].time_slot, TimeSlot { start: 22, end: 24 });
    }

    #[test]
    fn middle_band_gets_nothing() {
        let recs = RecommendationEngine::new().recommend(&curve_from(&[0.55; 24]));
        assert!(recs.is_empty());
    }

    #[test]
    fn generated_curves_yield_non_overlapping_windows() {
        let engine = RecommendationEngine::new();
        for chronotype in Chronotype::ALL {
            for debt in [0.0, 1.5, 4.0, 9.0] {
                let curve = CurveGenerator::new().generate(chronotype, debt);
                let recs = engine.recommend(&curve);
                for (i, a) in recs.iter().enumerate() {
                    for b in &recs[i + 1..] {
                        assert!(!a.time_slot.overlaps(&b.time_slot));
                    }
                }
            }
        }
    }

    #[test]
    fn slot_serializes_with_type_key() {
        let rec = Recommendation {
            kind: RecommendationType::DeepWork,
            time_slot: TimeSlot { start: 8, end: 10 },
            priority: 5,
            description: "peak focus window".into(),
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["type"], "deep_work");
        assert_eq!(json["time_slot"]["end"], 10);
    }
}
