//! Fixed-window rate limiting per client identity.

use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::config::RateLimitConfig;

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    /// Quota exhausted until `retry_at`.
    Limited { retry_at: DateTime<Utc> },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed)
    }
}

/// Storage backend for the fixed-window policy.
///
/// The in-process [`FixedWindowLimiter`] only bounds traffic per instance; a shared store with
/// expiring, atomically incremented keys can implement this trait for horizontally scaled
/// deployments.
pub trait RateLimitStore: Send + Sync {
    /// Count one request for `key` at `now` and decide whether it may proceed.
    fn check(&self, key: &str, now: DateTime<Utc>) -> RateDecision;
}

struct WindowRecord {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// Process-local fixed-window limiter.
///
/// Records are never swept; an expired record is overwritten on the key's next request.
pub struct FixedWindowLimiter {
    records: DashMap<String, WindowRecord>,
    window: Duration,
    max_requests: u32,
}

impl FixedWindowLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            records: DashMap::new(),
            window: Duration::seconds(config.window_secs as i64),
            max_requests: config.max_requests,
        }
    }

    /// Number of client keys currently held in the store.
    pub fn tracked_clients(&self) -> usize {
        self.records.len()
    }

    fn fresh(&self, now: DateTime<Utc>) -> WindowRecord {
        WindowRecord {
            count: 1,
            reset_at: now + self.window,
        }
    }
}

impl RateLimitStore for FixedWindowLimiter {
    fn check(&self, key: &str, now: DateTime<Utc>) -> RateDecision {
        match self.records.entry(key.to_owned()) {
            Entry::Vacant(slot) => {
                slot.insert(self.fresh(now));
                RateDecision::Allowed
            }
            Entry::Occupied(mut slot) => {
                let record = slot.get_mut();
                if now > record.reset_at {
                    *record = self.fresh(now);
                    RateDecision::Allowed
                } else if record.count >= self.max_requests {
                    RateDecision::Limited {
                        retry_at: record.reset_at,
                    }
                } else {
                    record.count += 1;
                    RateDecision::Allowed
                }
            }
        }
    }
}
