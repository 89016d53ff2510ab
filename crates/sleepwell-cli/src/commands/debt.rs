use chrono::NaiveDate;
use clap::Args;

use super::{date_or_today, Context};

#[derive(Args)]
pub struct DebtArgs {
    /// Last day of the window (YYYY-MM-DD, default today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(ctx: Context, args: DebtArgs) -> Result<(), Box<dyn std::error::Error>> {
    let service = ctx.service()?;
    let as_of = date_or_today(args.date);
    let result = service.debt(&ctx.user, as_of)?;

    if args.json {
        super::print_json(&result)?;
    } else {
        println!(
            "Sleep debt over the {} days to {as_of}:",
            service.settings().debt_window_days
        );
        println!("  Total:   {:.2}h", result.total_debt);
        println!("  Average: {:.2}h per night", result.average_debt);
        println!("  Entries: {}", result.entries_count);
        println!("  Target:  {:.1}h", result.target_hours);
    }
    Ok(())
}
