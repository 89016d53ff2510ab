//! Two-process alertness model inputs.
//!
//! The circadian process is a fixed 24-hour baseline per chronotype. The
//! homeostatic process is a pressure term that grows with sleep debt.

use crate::model::Chronotype;

/// Upper bound on homeostatic pressure. Debt alone never takes
/// productivity below 20% of its circadian baseline.
pub const MAX_HOMEOSTATIC_PRESSURE: f64 = 0.8;

/// Hours of debt that produce one unit of pressure.
const PRESSURE_SCALE_HOURS: f64 = 10.0;

/// Peaks at 08:00-09:00 and fades through the evening.
static MORNING: [f64; 24] = [
    0.15, 0.10, 0.08, 0.08, 0.12, 0.30, 0.55, 0.75, // 00-07
    0.92, 0.95, 0.88, 0.80, 0.70, 0.60, 0.58, 0.62, // 08-15
    0.65, 0.60, 0.52, 0.45, 0.38, 0.30, 0.22, 0.18, // 16-23
];

/// Peaks at 13:00, dips, then peaks again 17:00-19:00.
static EVENING: [f64; 24] = [
    0.40, 0.30, 0.20, 0.12, 0.08, 0.08, 0.12, 0.22, // 00-07
    0.35, 0.48, 0.60, 0.72, 0.80, 0.88, 0.75, 0.70, // 08-15
    0.78, 0.86, 0.90, 0.87, 0.78, 0.68, 0.58, 0.48, // 16-23
];

/// Peaks at 10:00 with a broad afternoon plateau.
static INTERMEDIATE: [f64; 24] = [
    0.20, 0.12, 0.08, 0.07, 0.08, 0.15, 0.32, 0.52, // 00-07
    0.70, 0.82, 0.90, 0.85, 0.76, 0.68, 0.70, 0.72, // 08-15
    0.72, 0.70, 0.65, 0.56, 0.46, 0.38, 0.30, 0.25, // 16-23
];

/// Baseline alertness curve for a chronotype, indexed by hour.
pub fn template(chronotype: Chronotype) -> &'static [f64; 24] {
    match chronotype {
        Chronotype::Morning => &MORNING,
        Chronotype::Evening => &EVENING,
        Chronotype::Intermediate => &INTERMEDIATE,
    }
}

/// Baseline alertness at `hour` (0-23). Hours past 23 wrap.
pub fn baseline(chronotype: Chronotype, hour: u8) -> f64 {
    template(chronotype)[hour as usize % 24]
}

/// `min(0.8, debt / 10)`; negative or NaN debt reads as no pressure.
pub fn homeostatic_pressure(debt_hours: f64) -> f64 {
    (debt_hours.max(0.0) / PRESSURE_SCALE_HOURS).min(MAX_HOMEOSTATIC_PRESSURE)
}
