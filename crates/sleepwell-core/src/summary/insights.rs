//! Insight rules and static recommendation bundles.

use serde::{Deserialize, Serialize};

pub const DEBT_WARNING_HOURS: f64 = 2.0;
pub const DEBT_CRITICAL_HOURS: f64 = 5.0;
pub const QUALITY_WARNING: f64 = 6.0;
pub const CONSISTENCY_WARNING: f64 = 0.7;
pub const EFFICIENCY_INFO_PCT: f64 = 85.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    Debt,
    Quality,
    Consistency,
    Efficiency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightType,
    pub severity: Severity,
    pub impact: Impact,
    pub title: String,
    pub message: String,
    /// The metric value that triggered the insight
    pub value: f64,
}

/// Metrics the insight rules look at.
#[derive(Debug, Clone, Copy)]
pub struct InsightInputs {
    pub average_debt: f64,
    pub average_quality: f64,
    pub consistency_score: f64,
    pub sleep_efficiency: f64,
}

/// Apply the rules in order: debt, quality, consistency, efficiency.
pub fn generate_insights(inputs: &InsightInputs) -> Vec<Insight> {
    let mut insights = Vec::new();

    if inputs.average_debt > DEBT_WARNING_HOURS {
        let severity = if inputs.average_debt > DEBT_CRITICAL_HOURS {
            Severity::Critical
        } else {
            Severity::Warning
        };
        insights.push(Insight {
            kind: InsightType::Debt,
            severity,
            impact: Impact::High,
            title: "Significant sleep debt".to_string(),
            message: format!(
                "You are averaging {:.1} hours of sleep debt per night.",
                inputs.average_debt
            ),
            value: inputs.average_debt,
        });
    }

    if inputs.average_quality < QUALITY_WARNING {
        insights.push(Insight {
            kind: InsightType::Quality,
            severity: Severity::Warning,
            impact: Impact::Medium,
            title: "Low sleep quality".to_string(),
            message: format!(
                "Average sleep quality is {:.1}/10 for this period.",
                inputs.average_quality
            ),
            value: inputs.average_quality,
        });
    }

    if inputs.consistency_score < CONSISTENCY_WARNING {
        insights.push(Insight {
            kind: InsightType::Consistency,
            severity: Severity::Warning,
            impact: Impact::High,
            title: "Irregular sleep duration".to_string(),
            message: format!(
                "Consistency score is {:.0}%; sleep length varies a lot night to night.",
                inputs.consistency_score * 100.0
            ),
            value: inputs.consistency_score,
        });
    }

    if inputs.sleep_efficiency < EFFICIENCY_INFO_PCT {
        insights.push(Insight {
            kind: InsightType::Efficiency,
            severity: Severity::Info,
            impact: Impact::Medium,
            title: "Below target sleep".to_string(),
            message: format!(
                "You reached {:.0}% of your target sleep this period.",
                inputs.sleep_efficiency
            ),
            value: inputs.sleep_efficiency,
        });
    }

    insights
}

/// A fixed multi-step plan attached to an insight type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationBundle {
    pub category: InsightType,
    /// Higher is more important
    pub priority: i32,
    pub title: String,
    pub actions: Vec<String>,
}

/// The bundle for an insight type. Efficiency has none.
pub fn bundle_for(kind: InsightType) -> Option<RecommendationBundle> {
    let (priority, title, actions): (i32, &str, &[&str]) = match kind {
        InsightType::Debt => (
            5,
            "Reduce your sleep debt",
            &[
                "Move bedtime 15-30 minutes earlier each night until you hit your target",
                "Keep wake time fixed, including weekends",
                "Take a short nap (20 minutes) before 15:00 if needed",
                "Avoid stacking late nights back to back",
            ],
        ),
        InsightType::Quality => (
            4,
            "Improve sleep quality",
            &[
                "Stop caffeine at least 8 hours before bed",
                "Keep the bedroom dark, quiet and cool",
                "Put screens away 1 hour before bedtime",
                "Limit alcohol and heavy meals in the evening",
            ],
        ),
        InsightType::Consistency => (
            4,
            "Build a consistent schedule",
            &[
                "Go to bed and wake up at the same time every day",
                "Set a wind-down alarm 30 minutes before bedtime",
                "Keep weekend schedule within an hour of weekdays",
            ],
        ),
        InsightType::Efficiency => return None,
    };

    Some(RecommendationBundle {
        category: kind,
        priority,
        title: title.to_string(),
        actions: actions.iter().map(|a| a.to_string()).collect(),
    })
}

/// One bundle per distinct insight type, in insight order.
pub fn bundles_for(insights: &[Insight]) -> Vec<RecommendationBundle> {
    let mut seen: Vec<InsightType> = Vec::new();
    insights
        .iter()
        .filter_map(|insight| {
            if seen.contains(&insight.kind) {
                return None;
            }
            seen.push(insight.kind);
            bundle_for(insight.kind)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy() -> InsightInputs {
        InsightInputs {
            average_debt: 0.5,
            average_quality: 7.5,
            consistency_score: 0.9,
            sleep_efficiency: 95.0,
        }
    }

    #[test]
    fn healthy_period_has_no_insights() {
        assert!(generate_insights(&healthy()).is_empty());
    }

    #[test]
    fn debt_severity_escalates() {
        let mut inputs = healthy();
        inputs.average_debt = 2.5;
        let insights = generate_insights(&inputs);
        assert_eq!(insights[0].severity, Severity::Warning);
        assert_eq!(insights[0].impact, Impact::High);

        inputs.average_debt = 5.5;
        assert_eq!(generate_insights(&inputs)[0].severity, Severity::Critical);

        // boundary is strict
        inputs.average_debt = 2.0;
        assert!(generate_insights(&inputs).is_empty());
    }

    #[test]
    fn insights_keep_rule_order() {
        let inputs = InsightInputs {
            average_debt: 3.0,
            average_quality: 4.0,
            consistency_score: 0.5,
            sleep_efficiency: 70.0,
        };
        let kinds: Vec<_> = generate_insights(&inputs).iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                InsightType::Debt,
                InsightType::Quality,
                InsightType::Consistency,
                InsightType::Efficiency
            ]
        );
    }

    #[test]
    fn efficiency_is_info_medium() {
        let mut inputs = healthy();
        inputs.sleep_efficiency = 80.0;
        let insights = generate_insights(&inputs);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].severity, Severity::Info);
        assert_eq!(insights[0].impact, Impact::Medium);
    }

    #[test]
    fn bundle_priorities() {
        assert_eq!(bundle_for(InsightType::Debt).unwrap().priority, 5);
        assert_eq!(bundle_for(InsightType::Quality).unwrap().priority, 4);
        assert_eq!(bundle_for(InsightType::Consistency).unwrap().priority, 4);
        assert!(bundle_for(InsightType::Efficiency).is_none());
        assert!(bundle_for(InsightType::Debt).unwrap().actions.len() > 1);
    }

    #[test]
    fn efficiency_only_period_gets_no_bundle() {
        let mut inputs = healthy();
        inputs.sleep_efficiency = 60.0;
        let insights = generate_insights(&inputs);
        assert!(bundles_for(&insights).is_empty());
    }
}
