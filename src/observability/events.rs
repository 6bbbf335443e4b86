//! Bounded in-memory log of security and submission events.
//!
//! Fire-and-forget: recording never fails and the oldest entry is evicted once the log is
//! full. Operators read it through the admin API.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Default number of events returned by [`EventLog::recent`] callers.
pub const DEFAULT_RECENT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    HoneypotTriggered,
    RateLimitExceeded,
    RecaptchaFailed,
    FormSubmission,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct SecurityEvent {
    pub id: Uuid,
    pub kind: EventKind,
    pub client: String,
    pub user_agent: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub details: serde_json::Value,
}

impl SecurityEvent {
    pub fn new(kind: EventKind, client: impl Into<String>, details: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            client: client.into(),
            user_agent: None,
            timestamp: Utc::now(),
            details,
        }
    }

    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Capped ring buffer of [`SecurityEvent`]s.
pub struct EventLog {
    events: Mutex<VecDeque<SecurityEvent>>,
    capacity: usize,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Append an event, evicting the oldest when full.
    pub fn record(&self, event: SecurityEvent) {
        tracing::info!(
            kind = ?event.kind,
            client = %event.client,
            details = %event.details,
            "Security event"
        );
        let mut events = self.lock();
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }

    /// The newest `limit` events, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<SecurityEvent> {
        let events = self.lock();
        let skip = events.len().saturating_sub(limit);
        events.iter().skip(skip).cloned().collect()
    }

    /// Remove and return every buffered event.
    pub fn drain(&self) -> Vec<SecurityEvent> {
        let mut events = self.lock();
        events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// A panic while holding the lock leaves the buffer usable, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, VecDeque<SecurityEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
