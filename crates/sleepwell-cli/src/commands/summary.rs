use chrono::NaiveDate;
use clap::{Args, Subcommand};
use sleepwell_core::{PeriodKey, PeriodSummary, PeriodType, SummaryOutcome};

use super::{date_or_today, Context};

#[derive(Args)]
pub struct PeriodArgs {
    /// daily, weekly, monthly or custom
    #[arg(long, default_value = "weekly")]
    pub period: PeriodType,
    /// Any day inside the period (default today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// First day of a custom period
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Last day of a custom period
    #[arg(long)]
    pub to: Option<NaiveDate>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl PeriodArgs {
    fn key(&self, user: &str) -> Result<PeriodKey, Box<dyn std::error::Error>> {
        if self.period == PeriodType::Custom {
            let (Some(from), Some(to)) = (self.from, self.to) else {
                return Err("custom periods need --from and --to".into());
            };
            return Ok(PeriodKey::new(user, PeriodType::Custom, from, to)?);
        }
        Ok(PeriodKey::containing(user, self.period, date_or_today(self.date)))
    }
}

#[derive(Subcommand)]
pub enum SummaryAction {
    /// Compute and store the summary for a period
    Generate(PeriodArgs),
    /// Show a stored summary
    Show(PeriodArgs),
}

fn print_summary(summary: &PeriodSummary) {
    let key = &summary.key;
    println!(
        "{} summary {} to {} ({} nights)",
        key.period_type, key.period_start, key.period_end, summary.entries_count
    );
    println!(
        "  Debt:        {:.2}h total, {:.2}h avg, {:.2}h max ({})",
        summary.total_debt, summary.average_debt, summary.max_debt, summary.debt_trend
    );
    println!(
        "  Sleep:       {:.2}h avg, {:.0}% of target",
        summary.average_sleep, summary.sleep_efficiency
    );
    println!(
        "  Quality:     {:.1}/10 ({})",
        summary.average_quality, summary.quality_trend
    );
    println!("  Consistency: {:.2}", summary.consistency_score);

    let stats = &summary.statistics;
    if let (Some(bed), Some(wake)) = (stats.average_bedtime, stats.average_wake_time) {
        println!("  Typical:     {bed} - {wake}");
    }

    if !summary.insights.is_empty() {
        println!("\nInsights:");
        for insight in &summary.insights {
            println!(
                "  [{:?}] {}: {}",
                insight.severity, insight.title, insight.message
            );
        }
    }
    for bundle in &summary.recommendations {
        println!("\n{} (priority {}):", bundle.title, bundle.priority);
        for action in &bundle.actions {
            println!("  - {action}");
        }
    }
}

pub fn run(ctx: Context, action: SummaryAction) -> Result<(), Box<dyn std::error::Error>> {
    let service = ctx.service()?;

    match action {
        SummaryAction::Generate(args) => {
            let key = args.key(&ctx.user)?;
            let outcome = service.generate_summary(&key)?;
            if args.json {
                super::print_json(&outcome)?;
            } else {
                match &outcome {
                    SummaryOutcome::Ready(summary) => print_summary(summary),
                    SummaryOutcome::NoData { key } => println!(
                        "No entries between {} and {}, nothing stored",
                        key.period_start, key.period_end
                    ),
                }
            }
        }
        SummaryAction::Show(args) => {
            let key = args.key(&ctx.user)?;
            match service.summary(&key)? {
                Some(summary) if args.json => super::print_json(&summary)?,
                Some(summary) => print_summary(&summary),
                None => {
                    return Err(format!(
                        "no {} summary stored for {} to {}",
                        key.period_type, key.period_start, key.period_end
                    )
                    .into())
                }
            }
        }
    }
    Ok(())
}
