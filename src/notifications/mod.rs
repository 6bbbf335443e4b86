//! Outbound notification subsystem.
//!
//! # Data Flow
//! ```text
//! SanitizedSubmission
//!     → message.rs (business alert + requester acknowledgment)
//!     → dispatcher.rs (sequential sends, failure mapping)
//!     → transport.rs (provider HTTP API)
//! ```

pub mod dispatcher;
pub mod message;
pub mod transport;

pub use dispatcher::{DispatchError, Dispatcher};
pub use message::{NotificationKind, OutboundEmail};
pub use transport::{BrevoTransport, EmailTransport, TransportError};
