//! Multi-day period summaries.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::insights::{self, Insight, InsightInputs, RecommendationBundle};
use super::stats::{self, Trend};
use crate::error::ValidationError;
use crate::model::{ClockTime, SleepEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Daily,
    Weekly,
    Monthly,
    Custom,
}

impl PeriodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodType::Daily => "daily",
            PeriodType::Weekly => "weekly",
            PeriodType::Monthly => "monthly",
            PeriodType::Custom => "custom",
        }
    }

    /// Canonical inclusive range containing `anchor`. Weeks run Monday to
    /// Sunday. `Custom` has no canonical range and yields the anchor day.
    pub fn bounds(&self, anchor: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            PeriodType::Daily | PeriodType::Custom => (anchor, anchor),
            PeriodType::Weekly => {
                let start =
                    anchor - Duration::days(anchor.weekday().num_days_from_monday() as i64);
                (start, start + Duration::days(6))
            }
            PeriodType::Monthly => {
                let start = anchor.with_day(1).unwrap_or(anchor);
                let next_month = if start.month() == 12 {
                    NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
                };
                let end = next_month
                    .and_then(|d| d.pred_opt())
                    .unwrap_or(anchor);
                (start, end)
            }
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(PeriodType::Daily),
            "weekly" => Ok(PeriodType::Weekly),
            "monthly" => Ok(PeriodType::Monthly),
            "custom" => Ok(PeriodType::Custom),
            other => Err(ValidationError::InvalidValue {
                field: "period_type".to_string(),
                message: format!("unknown period type '{other}'"),
            }),
        }
    }
}

/// Identity of a stored summary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodKey {
    pub user_id: String,
    pub period_type: PeriodType,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

impl PeriodKey {
    pub fn new(
        user_id: impl Into<String>,
        period_type: PeriodType,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<Self, ValidationError> {
        if period_end < period_start {
            return Err(ValidationError::InvalidPeriod {
                start: period_start,
                end: period_end,
            });
        }
        Ok(Self {
            user_id: user_id.into(),
            period_type,
            period_start,
            period_end,
        })
    }

    /// Key for the canonical period of `period_type` containing `anchor`.
    pub fn containing(user_id: impl Into<String>, period_type: PeriodType, anchor: NaiveDate) -> Self {
        let (period_start, period_end) = period_type.bounds(anchor);
        Self {
            user_id: user_id.into(),
            period_type,
            period_start,
            period_end,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.period_start && date <= self.period_end
    }
}

/// Derived statistics shown alongside the headline metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub average_bedtime: Option<ClockTime>,
    pub average_wake_time: Option<ClockTime>,
    /// Mode of durations in half-hour buckets
    pub most_common_sleep_duration: Option<f64>,
    pub shortest_sleep: f64,
    pub longest_sleep: f64,
    pub nights_with_debt: usize,
    pub caffeine_days: usize,
    pub exercise_days: usize,
    pub average_stress: f64,
    pub average_sleepiness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    #[serde(flatten)]
    pub key: PeriodKey,
    pub entries_count: usize,
    pub total_debt: f64,
    pub average_debt: f64,
    pub max_debt: f64,
    pub average_sleep: f64,
    pub average_quality: f64,
    /// Percentage of per-entry target sleep obtained
    pub sleep_efficiency: f64,
    pub debt_trend: Trend,
    pub quality_trend: Trend,
    pub consistency_score: f64,
    pub insights: Vec<Insight>,
    pub recommendations: Vec<RecommendationBundle>,
    pub statistics: SummaryStatistics,
    pub generated_at: DateTime<Utc>,
}

/// Result of aggregating a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SummaryOutcome {
    /// No entries fell inside the period; nothing is persisted
    NoData { key: PeriodKey },
    Ready(Box<PeriodSummary>),
}

impl SummaryOutcome {
    pub fn summary(&self) -> Option<&PeriodSummary> {
        match self {
            SummaryOutcome::Ready(summary) => Some(summary),
            SummaryOutcome::NoData { .. } => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, SummaryOutcome::NoData { .. })
    }
}

/// Aggregates entries for a period into a [`PeriodSummary`].
#[derive(Debug, Clone, Default)]
pub struct PeriodSummaryAggregator {
    /// Polarity for the quality trend. `false` reads a rise in quality as
    /// worsening, the same rule the debt trend uses.
    pub quality_higher_is_better: bool,
}

impl PeriodSummaryAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quality_polarity(quality_higher_is_better: bool) -> Self {
        Self {
            quality_higher_is_better,
        }
    }

    /// Summarize the entries of `key`'s user that fall inside the period.
    /// Entries outside the range or for another user are ignored.
    pub fn aggregate(&self, key: &PeriodKey, entries: &[SleepEntry]) -> SummaryOutcome {
        let mut entries: Vec<&SleepEntry> = entries
            .iter()
            .filter(|e| e.user_id == key.user_id && key.contains(e.date))
            .collect();
        if entries.is_empty() {
            return SummaryOutcome::NoData { key: key.clone() };
        }
        entries.sort_by_key(|e| e.date);

        let durations: Vec<f64> = entries.iter().map(|e| e.sleep_duration()).collect();
        let debts: Vec<f64> = entries.iter().map(|e| e.debt()).collect();
        let qualities: Vec<f64> = entries.iter().map(|e| e.sleep_quality as f64).collect();
        let n = entries.len() as f64;

        let total_debt: f64 = debts.iter().sum();
        let max_debt = debts.iter().copied().fold(0.0, f64::max);
        let average_sleep = stats::mean(&durations).unwrap_or(0.0);
        let average_quality = stats::mean(&qualities).unwrap_or(0.0);

        let total_target: f64 = entries.iter().map(|e| e.target_hours).sum();
        let sleep_efficiency = if total_target > 0.0 {
            durations.iter().sum::<f64>() / total_target * 100.0
        } else {
            0.0
        };
        let consistency_score = stats::consistency_score(&durations);

        let insights = insights::generate_insights(&InsightInputs {
            average_debt: total_debt / n,
            average_quality,
            consistency_score,
            sleep_efficiency,
        });
        let recommendations = insights::bundles_for(&insights);

        let statistics = SummaryStatistics {
            average_bedtime: stats::average_clock_time(
                &entries.iter().map(|e| e.bedtime).collect::<Vec<_>>(),
            ),
            average_wake_time: stats::average_clock_time(
                &entries.iter().map(|e| e.wake_time).collect::<Vec<_>>(),
            ),
            most_common_sleep_duration: stats::most_common_duration(&durations),
            shortest_sleep: durations.iter().copied().fold(f64::INFINITY, f64::min),
            longest_sleep: durations.iter().copied().fold(0.0, f64::max),
            nights_with_debt: debts.iter().filter(|d| **d > 0.0).count(),
            caffeine_days: entries.iter().filter(|e| e.caffeine.consumed).count(),
            exercise_days: entries.iter().filter(|e| e.exercise).count(),
            average_stress: entries.iter().map(|e| e.stress as f64).sum::<f64>() / n,
            average_sleepiness: entries.iter().map(|e| e.sleepiness_score as f64).sum::<f64>() / n,
        };

        tracing::debug!(
            user_id = %key.user_id,
            period = %key.period_type,
            entries = entries.len(),
            insights = insights.len(),
            "aggregated period summary"
        );

        SummaryOutcome::Ready(Box::new(PeriodSummary {
            key: key.clone(),
            entries_count: entries.len(),
            total_debt,
            average_debt: total_debt / n,
            max_debt,
            average_sleep,
            average_quality,
            sleep_efficiency,
            debt_trend: stats::trend(&debts, false),
            quality_trend: stats::trend(&qualities, self.quality_higher_is_better),
            consistency_score,
            insights,
            recommendations,
            statistics,
            generated_at: Utc::now(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewSleepEntry;
    use crate::summary::insights::InsightType;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, day).unwrap()
    }

    fn entry(day: u32, bed: &str, wake: &str, quality: u8, target: f64) -> SleepEntry {
        NewSleepEntry {
            date: Some(date(day)),
            bedtime: Some(bed.to_string()),
            wake_time: Some(wake.to_string()),
            sleep_quality: quality,
            sleepiness_score: 3,
            stress: 4,
            ..Default::default()
        }
        .validate("u1", target)
        .unwrap()
    }

    fn key(start: u32, end: u32) -> PeriodKey {
        PeriodKey::new("u1", PeriodType::Custom, date(start), date(end)).unwrap()
    }

    #[test]
    fn empty_period_is_no_data() {
        let outcome = PeriodSummaryAggregator::new().aggregate(&key(1, 7), &[]);
        assert!(outcome.is_no_data());
        assert!(outcome.summary().is_none());
    }

    #[test]
    fn entries_outside_period_are_ignored() {
        let entries = vec![entry(20, "23:00", "07:00", 7, 8.0)];
        let outcome = PeriodSummaryAggregator::new().aggregate(&key(1, 7), &entries);
        assert!(outcome.is_no_data());
    }

    #[test]
    fn debt_trend_worsens_when_debt_grows() {
        // debts 1, 1, 4
        let entries = vec![
            entry(1, "23:00", "06:00", 7, 8.0),
            entry(2, "23:00", "06:00", 7, 8.0),
            entry(3, "23:00", "03:00", 7, 8.0),
        ];
        let outcome = PeriodSummaryAggregator::new().aggregate(&key(1, 7), &entries);
        let summary = outcome.summary().unwrap();
        assert_eq!(summary.debt_trend, Trend::Worsening);
        assert!((summary.total_debt - 6.0).abs() < 1e-9);
        assert!((summary.average_debt - 2.0).abs() < 1e-9);
        assert!((summary.max_debt - 4.0).abs() < 1e-9);
        assert_eq!(summary.statistics.nights_with_debt, 3);
    }

    #[test]
    fn entries_are_ordered_by_date_before_trending() {
        let entries = vec![
            entry(3, "23:00", "03:00", 7, 8.0),
            entry(1, "23:00", "06:00", 7, 8.0),
            entry(2, "23:00", "06:00", 7, 8.0),
        ];
        let summary = PeriodSummaryAggregator::new().aggregate(&key(1, 7), &entries);
        assert_eq!(summary.summary().unwrap().debt_trend, Trend::Worsening);
    }

    #[test]
    fn efficiency_uses_per_entry_target() {
        let entries = vec![
            entry(1, "23:00", "07:00", 7, 8.0),  // 8 of 8
            entry(2, "23:00", "07:00", 7, 10.0), // 8 of 10
        ];
        let outcome = PeriodSummaryAggregator::new().aggregate(&key(1, 7), &entries);
        let summary = outcome.summary().unwrap();
        assert!((summary.sleep_efficiency - 16.0 / 18.0 * 100.0).abs() < 1e-9);
        assert!((summary.total_debt - 2.0).abs() < 1e-9);
    }

    #[test]
    fn quality_trend_polarity_is_configurable() {
        let entries = vec![
            entry(1, "23:00", "07:00", 4, 8.0),
            entry(2, "23:00", "07:00", 6, 8.0),
            entry(3, "23:00", "07:00", 8, 8.0),
        ];
        let default = PeriodSummaryAggregator::new().aggregate(&key(1, 7), &entries);
        assert_eq!(default.summary().unwrap().quality_trend, Trend::Worsening);

        let flipped =
            PeriodSummaryAggregator::with_quality_polarity(true).aggregate(&key(1, 7), &entries);
        assert_eq!(flipped.summary().unwrap().quality_trend, Trend::Improving);
    }

    #[test]
    fn healthy_period_has_full_consistency_and_no_insights() {
        let entries = vec![
            entry(1, "23:00", "07:00", 8, 8.0),
            entry(2, "23:30", "07:30", 8, 8.0),
        ];
        let outcome = PeriodSummaryAggregator::new().aggregate(&key(1, 7), &entries);
        let summary = outcome.summary().unwrap();
        assert_eq!(summary.consistency_score, 1.0);
        assert!(summary.insights.is_empty());
        assert!(summary.recommendations.is_empty());
        assert_eq!(summary.debt_trend, Trend::InsufficientData);
        assert_eq!(summary.statistics.most_common_sleep_duration, Some(8.0));
        assert_eq!(summary.statistics.average_wake_time.unwrap().to_string(), "07:15");
    }

    #[test]
    fn poor_period_collects_insights_and_bundles() {
        let entries = vec![
            entry(1, "02:00", "05:00", 3, 8.0),
            entry(2, "23:00", "07:00", 4, 8.0),
            entry(3, "03:00", "05:00", 3, 8.0),
        ];
        let outcome = PeriodSummaryAggregator::new().aggregate(&key(1, 7), &entries);
        let summary = outcome.summary().unwrap();
        let kinds: Vec<_> = summary.insights.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                InsightType::Debt,
                InsightType::Quality,
                InsightType::Consistency,
                InsightType::Efficiency
            ]
        );
        let priorities: Vec<_> = summary.recommendations.iter().map(|b| b.priority).collect();
        assert_eq!(priorities, vec![5, 4, 4]);
    }

    #[test]
    fn weekly_bounds_run_monday_to_sunday() {
        // 2024-04-10 is a Wednesday
        let (start, end) = PeriodType::Weekly.bounds(date(10));
        assert_eq!(start, date(8));
        assert_eq!(end, date(14));
    }

    #[test]
    fn monthly_bounds_cover_month() {
        let (start, end) = PeriodType::Monthly.bounds(date(17));
        assert_eq!(start, date(1));
        assert_eq!(end, date(30));

        let dec = NaiveDate::from_ymd_opt(2024, 12, 5).unwrap();
        let (_, end) = PeriodType::Monthly.bounds(dec);
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn reversed_period_is_rejected() {
        assert!(PeriodKey::new("u1", PeriodType::Custom, date(5), date(1)).is_err());
    }
}
