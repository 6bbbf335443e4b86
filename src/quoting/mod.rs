//! Quote request intake: payload types, sanitization, validation and the pipeline that
//! ties them to the security and notification subsystems.

pub mod catalog;
pub mod error;
pub mod pipeline;
pub mod sanitize;
pub mod types;
pub mod validation;

pub use error::{ErrorClass, IntakeError};
pub use pipeline::{Accepted, IntakePipeline, RequestContext, Stage};
pub use types::{SanitizedSubmission, SubmissionRequest};
