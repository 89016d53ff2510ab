use clap::Subcommand;
use sleepwell_core::{Chronotype, ClockTime, CoreError, SleepProfile};

use super::Context;

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Create or update the sleep profile
    Set {
        /// morning, evening or intermediate
        #[arg(long)]
        chronotype: Option<Chronotype>,
        /// Target sleep hours (4-12)
        #[arg(long)]
        target: Option<f64>,
        /// Weekday bedtime (HH:MM)
        #[arg(long)]
        weekday_bedtime: Option<String>,
        /// Weekday wake time (HH:MM)
        #[arg(long)]
        weekday_wake: Option<String>,
        /// Weekend bedtime (HH:MM)
        #[arg(long)]
        weekend_bedtime: Option<String>,
        /// Weekend wake time (HH:MM)
        #[arg(long)]
        weekend_wake: Option<String>,
        /// Expected percentage of target obtained (0-100)
        #[arg(long)]
        efficiency_target: Option<f64>,
    },
    /// Show the sleep profile
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn apply_time(slot: &mut ClockTime, field: &str, value: Option<String>) -> Result<(), CoreError> {
    if let Some(v) = value {
        *slot = ClockTime::parse_field(field, &v)?;
    }
    Ok(())
}

pub fn run(ctx: Context, action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    let service = ctx.service()?;

    match action {
        ProfileAction::Set {
            chronotype,
            target,
            weekday_bedtime,
            weekday_wake,
            weekend_bedtime,
            weekend_wake,
            efficiency_target,
        } => {
            let mut profile = match service.profile(&ctx.user) {
                Ok(existing) => existing,
                Err(CoreError::ProfileNotFound { .. }) => {
                    SleepProfile::new(&ctx.user, Chronotype::default(), 8.0)
                }
                Err(e) => return Err(e.into()),
            };

            if let Some(c) = chronotype {
                profile.chronotype = c;
            }
            if let Some(t) = target {
                profile.target_sleep_hours = t;
            }
            if let Some(e) = efficiency_target {
                profile.sleep_efficiency_target = e;
            }
            apply_time(&mut profile.weekday.bedtime, "weekday_bedtime", weekday_bedtime)?;
            apply_time(&mut profile.weekday.wake_time, "weekday_wake", weekday_wake)?;
            apply_time(&mut profile.weekend.bedtime, "weekend_bedtime", weekend_bedtime)?;
            apply_time(&mut profile.weekend.wake_time, "weekend_wake", weekend_wake)?;

            let saved = service.save_profile(profile)?;
            println!(
                "Profile saved: {} ({}, target {:.1}h)",
                saved.user_id, saved.chronotype, saved.target_sleep_hours
            );
        }
        ProfileAction::Show { json } => {
            let profile = service.profile(&ctx.user)?;
            if json {
                super::print_json(&profile)?;
            } else {
                println!("User:        {}", profile.user_id);
                println!("Chronotype:  {}", profile.chronotype);
                println!("Target:      {:.1}h", profile.target_sleep_hours);
                println!("Efficiency:  {:.0}%", profile.sleep_efficiency_target);
                println!(
                    "Weekdays:    {} - {}",
                    profile.weekday.bedtime, profile.weekday.wake_time
                );
                println!(
                    "Weekends:    {} - {}",
                    profile.weekend.bedtime, profile.weekend.wake_time
                );
            }
        }
    }
    Ok(())
}
