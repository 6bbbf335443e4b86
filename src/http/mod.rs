//! HTTP surface of the intake service.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout, security headers)
//!     → submit.rs (client identity, request context)
//!     → [quoting::pipeline runs every stage]
//!     → response.rs (JSON body, Allow / Retry-After headers)
//!     → Send to client
//! ```

pub mod response;
pub mod server;
pub mod submit;

pub use response::{SubmissionAccepted, SUCCESS_MESSAGE};
pub use server::{AppState, IntakeServer, SUBMIT_PATH};
