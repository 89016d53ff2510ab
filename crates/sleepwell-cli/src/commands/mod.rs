pub mod config;
pub mod curve;
pub mod debt;
pub mod entry;
pub mod profile;
pub mod summary;

use chrono::{Local, NaiveDate};
use sleepwell_core::{Config, Database, SleepService};

/// What every command needs: the loaded config and the acting user.
pub struct Context {
    pub config: Config,
    pub user: String,
}

impl Context {
    pub fn new(config: Config, user: Option<String>) -> Self {
        let user = user.unwrap_or_else(|| config.engine.default_user.clone());
        Self { config, user }
    }

    /// Service over the on-disk database.
    pub fn service(&self) -> Result<SleepService<Database>, Box<dyn std::error::Error>> {
        let db = Database::open()?;
        Ok(SleepService::from_config(db, &self.config))
    }
}

/// `date` or today in local time.
pub fn date_or_today(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

/// Pretty JSON to stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
