use chrono::{Duration, NaiveDate};
use clap::Subcommand;
use sleepwell_core::{Caffeine, ClockTime, Mood, NewSleepEntry, SleepEntry};

use super::{date_or_today, Context};

#[derive(Subcommand)]
pub enum EntryAction {
    /// Log a night of sleep
    Log {
        /// Date of the night (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Bedtime (HH:MM)
        #[arg(long)]
        bedtime: String,
        /// Wake time (HH:MM)
        #[arg(long)]
        wake: String,
        /// Sleep quality (1-10)
        #[arg(long)]
        quality: u8,
        /// Stanford sleepiness score (1-7)
        #[arg(long)]
        sleepiness: u8,
        /// Stress level (1-10)
        #[arg(long)]
        stress: u8,
        /// terrible, poor, neutral, good or excellent
        #[arg(long, default_value = "neutral")]
        mood: Mood,
        /// Caffeine consumed, in mg
        #[arg(long)]
        caffeine_mg: Option<f64>,
        /// Time of last caffeine intake (HH:MM)
        #[arg(long)]
        caffeine_last: Option<String>,
        /// Exercised that day
        #[arg(long)]
        exercise: bool,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List logged entries
    List {
        /// First date (default six days before --to)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last date (default today)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete the entry for a date
    Delete {
        /// Date of the entry (YYYY-MM-DD)
        date: NaiveDate,
    },
}

fn print_entry_line(entry: &SleepEntry) {
    println!(
        "{}  {} - {}  {:>5.2}h slept  {:>5.2}h debt  quality {:>2}  {}",
        entry.date,
        entry.bedtime,
        entry.wake_time,
        entry.sleep_duration(),
        entry.debt(),
        entry.sleep_quality,
        entry.mood.as_str()
    );
}

pub fn run(ctx: Context, action: EntryAction) -> Result<(), Box<dyn std::error::Error>> {
    let service = ctx.service()?;

    match action {
        EntryAction::Log {
            date,
            bedtime,
            wake,
            quality,
            sleepiness,
            stress,
            mood,
            caffeine_mg,
            caffeine_last,
            exercise,
            notes,
            json,
        } => {
            let last_intake = caffeine_last
                .as_deref()
                .map(|v| ClockTime::parse_field("caffeine_last", v))
                .transpose()?;
            let amount_mg = caffeine_mg.unwrap_or(0.0);
            let draft = NewSleepEntry {
                date: Some(date_or_today(date)),
                bedtime: Some(bedtime),
                wake_time: Some(wake),
                sleep_quality: quality,
                sleepiness_score: sleepiness,
                mood,
                caffeine: Caffeine {
                    consumed: amount_mg > 0.0 || last_intake.is_some(),
                    amount_mg,
                    last_intake,
                },
                exercise,
                stress,
                notes,
            };

            let entry = service.log_entry(&ctx.user, draft)?;
            if json {
                super::print_json(&entry)?;
            } else {
                let planned = service.profile(&ctx.user)?.scheduled_duration(entry.date);
                println!(
                    "Logged {}: {:.2}h slept (planned {:.2}h), {:.2}h debt",
                    entry.date,
                    entry.sleep_duration(),
                    planned,
                    entry.debt()
                );
            }
        }
        EntryAction::List { from, to, json } => {
            let to = date_or_today(to);
            let from = from.unwrap_or(to - Duration::days(6));
            let entries = service.entries(&ctx.user, from, to)?;
            if json {
                super::print_json(&entries)?;
            } else if entries.is_empty() {
                println!("No entries between {from} and {to}");
            } else {
                for entry in &entries {
                    print_entry_line(entry);
                }
            }
        }
        EntryAction::Delete { date } => {
            if service.delete_entry(&ctx.user, date)? {
                println!("Deleted entry for {date}");
            } else {
                return Err(format!("no entry for {date}").into());
            }
        }
    }
    Ok(())
}
