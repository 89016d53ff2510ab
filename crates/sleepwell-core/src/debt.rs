//! Sleep debt calculation.
//!
//! Debt is the shortfall between a target sleep duration and the sleep
//! actually obtained. It is never negative: surplus sleep does not pay
//! back debt from other nights.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::{ClockTime, SleepEntry};

/// Hours between `bedtime` and `wake_time`. A wake time at or before the
/// bedtime is read as the next morning.
///
/// # Errors
/// `InvalidEntry` when either time is absent or the result falls
/// outside (0, 24].
pub fn sleep_duration(
    bedtime: Option<ClockTime>,
    wake_time: Option<ClockTime>,
) -> Result<f64, ValidationError> {
    let missing = |field: &str| ValidationError::InvalidEntry {
        reason: format!("missing {field}"),
    };
    let bedtime = bedtime.ok_or_else(|| missing("bedtime"))?;
    let wake_time = wake_time.ok_or_else(|| missing("wake_time"))?;

    let hours = bedtime.hours_until(wake_time);
    if hours <= 0.0 || hours > 24.0 {
        return Err(ValidationError::InvalidEntry {
            reason: format!("duration {hours:.2}h must be in (0, 24]"),
        });
    }
    Ok(hours)
}

/// Debt for a single night: `max(0, target - slept)`.
pub fn entry_debt(entry: &SleepEntry, target_hours: f64) -> f64 {
    (target_hours - entry.sleep_duration()).max(0.0)
}

/// Debt accumulated over a set of entries.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowDebt {
    pub total_debt: f64,
    pub average_debt: f64,
    pub count: usize,
}

impl WindowDebt {
    fn from_debts(debts: impl Iterator<Item = f64>) -> Self {
        let (total_debt, count) = debts.fold((0.0, 0usize), |(sum, n), d| (sum + d, n + 1));
        if count == 0 {
            return Self::default();
        }
        Self {
            total_debt,
            average_debt: total_debt / count as f64,
            count,
        }
    }
}

/// Debt over `entries` measured against one `target_hours`.
pub fn window_debt(entries: &[SleepEntry], target_hours: f64) -> WindowDebt {
    WindowDebt::from_debts(entries.iter().map(|e| entry_debt(e, target_hours)))
}

/// Debt over `entries`, each measured against the target that applied
/// when it was logged.
pub fn window_debt_per_entry(entries: &[SleepEntry]) -> WindowDebt {
    WindowDebt::from_debts(entries.iter().map(SleepEntry::debt))
}

/// Debt figure handed to dashboard and notification callers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebtResult {
    pub total_debt: f64,
    pub average_debt: f64,
    pub entries_count: usize,
    pub target_hours: f64,
}

impl DebtResult {
    pub fn new(window: WindowDebt, target_hours: f64) -> Self {
        Self {
            total_debt: window.total_debt,
            average_debt: window.average_debt,
            entries_count: window.count,
            target_hours,
        }
    }
}
