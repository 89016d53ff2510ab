//! Request-level facade over the store and the pure engine components.
//!
//! Each request fetches a fresh snapshot of the user's profile and entries
//! and runs the calculators over it. The only state kept between requests
//! is the per-user curve cache.

use chrono::{Local, NaiveDate, Utc};

use crate::cache::CurveCache;
use crate::curve::{CurveGenerator, CurveReport};
use crate::debt::{self, DebtResult};
use crate::error::{CoreError, Result};
use crate::model::{NewSleepEntry, SleepEntry, SleepProfile};
use crate::recommendations::RecommendationEngine;
use crate::storage::{window_start, Config, SleepStore};
use crate::summary::{PeriodKey, PeriodSummary, PeriodSummaryAggregator, SummaryOutcome};

/// Settings the service reads from [`Config`].
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub debt_window_days: u32,
    pub confidence_window_days: u32,
    pub quality_higher_is_better: bool,
    pub cache_enabled: bool,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ServiceSettings {
    fn from(config: &Config) -> Self {
        Self {
            debt_window_days: config.engine.debt_window_days.max(1),
            confidence_window_days: config.engine.confidence_window_days,
            quality_higher_is_better: config.trends.quality_higher_is_better,
            cache_enabled: config.cache.enabled,
        }
    }
}

pub struct SleepService<S: SleepStore> {
    store: S,
    settings: ServiceSettings,
    cache: CurveCache,
    generator: CurveGenerator,
    recommender: RecommendationEngine,
    aggregator: PeriodSummaryAggregator,
}

impl<S: SleepStore> SleepService<S> {
    pub fn new(store: S, settings: ServiceSettings) -> Self {
        Self {
            store,
            generator: CurveGenerator::with_window(settings.confidence_window_days),
            recommender: RecommendationEngine::new(),
            aggregator: PeriodSummaryAggregator::with_quality_polarity(
                settings.quality_higher_is_better,
            ),
            cache: CurveCache::new(),
            settings,
        }
    }

    pub fn from_config(store: S, config: &Config) -> Self {
        Self::new(store, ServiceSettings::from(config))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    pub fn cache(&self) -> &CurveCache {
        &self.cache
    }

    /// Validate and store a profile, replacing any existing one.
    pub fn save_profile(&self, mut profile: SleepProfile) -> Result<SleepProfile> {
        profile.validate()?;
        profile.updated_at = Utc::now();
        self.store.save_profile(&profile)?;
        self.cache.invalidate(&profile.user_id);
        tracing::info!(
            user_id = %profile.user_id,
            chronotype = %profile.chronotype,
            target = profile.target_sleep_hours,
            "saved sleep profile"
        );
        Ok(profile)
    }

    /// The user's profile.
    ///
    /// # Errors
    /// `ProfileNotFound` when the user has not completed onboarding.
    pub fn profile(&self, user_id: &str) -> Result<SleepProfile> {
        self.store
            .get_profile(user_id)?
            .ok_or_else(|| CoreError::ProfileNotFound {
                user_id: user_id.to_string(),
            })
    }

    /// Validate and persist a new entry against the user's current target.
    ///
    /// # Errors
    /// Validation errors for malformed input, `DuplicateEntry` when the
    /// date is already logged, `ProfileNotFound` without a profile.
    pub fn log_entry(&self, user_id: &str, draft: NewSleepEntry) -> Result<SleepEntry> {
        let profile = self.profile(user_id)?;
        let mut entry = draft
            .validate(user_id, profile.target_sleep_hours)
            .inspect_err(|e| tracing::warn!(user_id, error = %e, "rejected sleep entry"))?;

        entry.id = Some(self.store.insert_entry(&entry)?);
        self.cache.invalidate(user_id);
        tracing::info!(
            user_id,
            date = %entry.date,
            duration = entry.sleep_duration(),
            debt = entry.debt(),
            "logged sleep entry"
        );
        Ok(entry)
    }

    pub fn entries(&self, user_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<SleepEntry>> {
        self.store.entries_between(user_id, start, end)
    }

    pub fn delete_entry(&self, user_id: &str, date: NaiveDate) -> Result<bool> {
        let removed = self.store.delete_entry(user_id, date)?;
        if removed {
            self.cache.invalidate(user_id);
            tracing::info!(user_id, %date, "deleted sleep entry");
        }
        Ok(removed)
    }

    /// Current debt over the configured window ending on `as_of`. Each
    /// entry is measured against its own logged target.
    pub fn debt(&self, user_id: &str, as_of: NaiveDate) -> Result<DebtResult> {
        let profile = self.profile(user_id)?;
        let entries = self.store.recent_entries(user_id, as_of, self.settings.debt_window_days)?;
        let window = debt::window_debt_per_entry(&entries);
        tracing::debug!(user_id, total = window.total_debt, count = window.count, "computed debt");
        Ok(DebtResult::new(window, profile.target_sleep_hours))
    }

    /// Curve and recommendations for today in local time.
    pub fn todays_curve(&self, user_id: &str) -> Result<CurveReport> {
        self.curve_for(user_id, Local::now().date_naive())
    }

    /// Curve and recommendations for `date`, served from cache when valid.
    pub fn curve_for(&self, user_id: &str, date: NaiveDate) -> Result<CurveReport> {
        if self.settings.cache_enabled {
            if let Some(report) = self.cache.get(user_id, date) {
                tracing::debug!(user_id, %date, "curve cache hit");
                return Ok(report);
            }
        }

        // taken before the snapshot so a concurrent write voids this result
        let generation = self.cache.generation(user_id);
        let profile = self.profile(user_id)?;
        let span = self
            .settings
            .debt_window_days
            .max(self.settings.confidence_window_days);
        let entries = self.store.recent_entries(user_id, date, span)?;

        let in_window = |days: u32| -> Result<Vec<SleepEntry>> {
            let start = window_start(date, days)?;
            Ok(entries.iter().filter(|e| e.date >= start).cloned().collect())
        };
        let debt_entries = in_window(self.settings.debt_window_days)?;
        let recent_count = in_window(self.settings.confidence_window_days)?.len();

        let debt = debt::window_debt_per_entry(&debt_entries);
        let curve = self.generator.generate(profile.chronotype, debt.total_debt);
        let recommendations = self.recommender.recommend(&curve);
        let confidence = self.generator.confidence(recent_count);

        let report = CurveReport::new(user_id, date, curve, confidence, recommendations);
        if report.partial_data {
            tracing::debug!(user_id, confidence, "curve built from partial data");
        }
        if self.settings.cache_enabled {
            self.cache.insert(report.clone(), generation);
        }
        Ok(report)
    }

    /// Recompute and store the summary for `key`.
    ///
    /// An empty period yields [`SummaryOutcome::NoData`] and leaves any
    /// stored summary untouched.
    pub fn generate_summary(&self, key: &PeriodKey) -> Result<SummaryOutcome> {
        self.profile(&key.user_id)?;
        let entries = self
            .store
            .entries_between(&key.user_id, key.period_start, key.period_end)?;

        let outcome = self.aggregator.aggregate(key, &entries);
        match &outcome {
            SummaryOutcome::Ready(summary) => {
                self.store.upsert_summary(summary)?;
                tracing::info!(
                    user_id = %key.user_id,
                    period = %key.period_type,
                    start = %key.period_start,
                    end = %key.period_end,
                    entries = summary.entries_count,
                    "stored period summary"
                );
            }
            SummaryOutcome::NoData { .. } => {
                tracing::info!(
                    user_id = %key.user_id,
                    period = %key.period_type,
                    "no entries in period, summary not stored"
                );
            }
        }
        Ok(outcome)
    }

    pub fn summary(&self, key: &PeriodKey) -> Result<Option<PeriodSummary>> {
        self.store.get_summary(key)
    }
}
