//! Period summaries.
//!
//! Aggregates a period's entries into debt and sleep metrics, a
//! consistency score, trend directions, rule-based insights and the
//! recommendation bundles attached to them.

mod aggregator;
pub mod insights;
pub mod stats;

pub use aggregator::{
    PeriodKey, PeriodSummary, PeriodSummaryAggregator, PeriodType, SummaryOutcome,
    SummaryStatistics,
};
pub use insights::{Impact, Insight, InsightType, RecommendationBundle, Severity};
pub use stats::Trend;
