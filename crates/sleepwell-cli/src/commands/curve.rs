use chrono::NaiveDate;
use clap::Args;

use super::{date_or_today, Context};

#[derive(Args)]
pub struct CurveArgs {
    /// Day to forecast (YYYY-MM-DD, default today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(ctx: Context, args: CurveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let service = ctx.service()?;
    let report = service.curve_for(&ctx.user, date_or_today(args.date))?;

    if args.json {
        return super::print_json(&report);
    }

    print!("{}", report.curve.render_ascii_chart());
    if let Some(hour) = report.curve.peak_hour() {
        println!("Peak hour: {hour:02}:00");
    }
    println!("Confidence: {:.0}%", report.confidence * 100.0);
    if report.partial_data {
        println!("(based on partial data, keep logging to improve the forecast)");
    }

    if !report.recommendations.is_empty() {
        println!("\nRecommendations:");
        for rec in &report.recommendations {
            println!(
                "  [{}] {} {}: {}",
                rec.priority,
                rec.time_slot,
                rec.kind.as_str(),
                rec.description
            );
        }
    }
    Ok(())
}
