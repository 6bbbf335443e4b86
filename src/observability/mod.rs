//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Pipeline stages produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → events.rs (bounded security event log)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//!     → Admin API (/admin/events)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON optional) for machine parsing
//! - Request ID flows through every log line of a request
//! - Event log is capped; it is an operator aid, not an audit trail

pub mod events;
pub mod logging;
pub mod metrics;

pub use events::{EventKind, EventLog, SecurityEvent};
