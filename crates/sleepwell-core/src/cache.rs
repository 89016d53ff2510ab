//! Per-user, per-day cache of today's productivity curve.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::curve::CurveReport;

#[derive(Debug, Default)]
struct CacheState {
    curves: HashMap<String, CurveReport>,
    /// Bumped on every invalidation, cached or not
    generations: HashMap<String, u64>,
}

/// Keeps at most one curve per user: the one for the most recent day
/// requested. Callers invalidate a user whenever their entries or profile
/// change.
///
/// A curve computed from a snapshot is only stored if no invalidation
/// happened since the caller read [`generation`](Self::generation), so a
/// write racing a slow computation never leaves a stale curve behind.
#[derive(Debug, Default)]
pub struct CurveCache {
    state: Mutex<CacheState>,
}

impl CurveCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Cached curve for `user_id` on `date`, if still valid.
    pub fn get(&self, user_id: &str, date: NaiveDate) -> Option<CurveReport> {
        self.lock()
            .curves
            .get(user_id)
            .filter(|report| report.date == date)
            .cloned()
    }

    /// Current invalidation count for `user_id`. Read it before taking the
    /// snapshot a curve is built from.
    pub fn generation(&self, user_id: &str) -> u64 {
        self.lock().generations.get(user_id).copied().unwrap_or(0)
    }

    /// Store a report built at `generation`, replacing whatever the user
    /// had cached. Returns false and stores nothing if the user was
    /// invalidated in the meantime.
    pub fn insert(&self, report: CurveReport, generation: u64) -> bool {
        let mut state = self.lock();
        let current = state.generations.get(&report.user_id).copied().unwrap_or(0);
        if current != generation {
            tracing::debug!(user_id = %report.user_id, "discarded curve built from stale entries");
            return false;
        }
        state.curves.insert(report.user_id.clone(), report);
        true
    }

    /// Drop the user's cached curve and start a new generation. Returns
    /// whether a curve was present.
    pub fn invalidate(&self, user_id: &str) -> bool {
        let mut state = self.lock();
        *state.generations.entry(user_id.to_string()).or_insert(0) += 1;
        let removed = state.curves.remove(user_id).is_some();
        if removed {
            tracing::debug!(user_id, "invalidated cached curve");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.lock().curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
