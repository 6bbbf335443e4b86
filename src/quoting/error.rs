//! Submission failure taxonomy and its mapping onto the response contract.

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::notifications::DispatchError;
use crate::quoting::pipeline::Stage;
use crate::quoting::validation::InvalidSubmission;

/// Broad class of a failure, deciding status family and how much the caller is told.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad input; the message is safe to show the requester.
    Client,
    /// Abuse controls; deliberately generic.
    AbusePolicy,
    /// Server is missing a secret. Details stay in the server log.
    Configuration,
    /// An external provider failed.
    Dependency,
}

/// Every way a submission can be rejected.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("rate limit exceeded until {retry_at}")]
    RateLimited { retry_at: DateTime<Utc> },

    #[error("request body too large or unreadable")]
    PayloadTooLarge,

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("CAPTCHA rejected the submission")]
    CaptchaRejected,

    #[error(transparent)]
    Invalid(#[from] InvalidSubmission),

    /// The stages before dispatch did not finish within the screening deadline.
    #[error("screening deadline exceeded before dispatch")]
    TimedOut,

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl IntakeError {
    pub fn status(&self) -> StatusCode {
        match self {
            IntakeError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            IntakeError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            IntakeError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            IntakeError::MalformedBody(_)
            | IntakeError::CaptchaRejected
            | IntakeError::Invalid(_) => StatusCode::BAD_REQUEST,
            IntakeError::TimedOut | IntakeError::Dispatch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            IntakeError::MethodNotAllowed
            | IntakeError::PayloadTooLarge
            | IntakeError::MalformedBody(_)
            | IntakeError::Invalid(_) => ErrorClass::Client,
            IntakeError::RateLimited { .. } | IntakeError::CaptchaRejected => ErrorClass::AbusePolicy,
            IntakeError::Dispatch(DispatchError::MissingCredential) => ErrorClass::Configuration,
            IntakeError::TimedOut | IntakeError::Dispatch(DispatchError::Provider { .. }) => {
                ErrorClass::Dependency
            }
        }
    }

    /// The message returned to the caller. Never carries provider or secret details.
    pub fn public_message(&self) -> String {
        match self {
            IntakeError::MethodNotAllowed => "Method not allowed".to_string(),
            IntakeError::RateLimited { retry_at } => format!(
                "Too many requests. Please try again after {}",
                retry_at.format("%H:%M:%S UTC")
            ),
            IntakeError::PayloadTooLarge => "Request body too large".to_string(),
            IntakeError::MalformedBody(_) => "Invalid request body".to_string(),
            IntakeError::CaptchaRejected => "Security validation failed. Please try again.".to_string(),
            IntakeError::Invalid(e) => e.to_string(),
            IntakeError::Dispatch(DispatchError::MissingCredential) => {
                "Server configuration error".to_string()
            }
            IntakeError::TimedOut | IntakeError::Dispatch(DispatchError::Provider { .. }) => {
                "Failed to submit quote request. Please try again.".to_string()
            }
        }
    }

    /// The pipeline stage that produced the rejection.
    pub fn stage(&self) -> Stage {
        match self {
            IntakeError::MethodNotAllowed => Stage::Received,
            IntakeError::RateLimited { .. } => Stage::RateChecked,
            IntakeError::PayloadTooLarge | IntakeError::MalformedBody(_) | IntakeError::CaptchaRejected => {
                Stage::SpamChecked
            }
            IntakeError::Invalid(_) | IntakeError::TimedOut => Stage::Validated,
            IntakeError::Dispatch(_) => Stage::Dispatched,
        }
    }

    /// Metrics label.
    pub fn outcome(&self) -> &'static str {
        match self {
            IntakeError::MethodNotAllowed => "method_not_allowed",
            IntakeError::RateLimited { .. } => "rate_limited",
            IntakeError::PayloadTooLarge => "payload_too_large",
            IntakeError::MalformedBody(_) => "malformed",
            IntakeError::CaptchaRejected => "captcha_rejected",
            IntakeError::Invalid(_) => "invalid",
            IntakeError::TimedOut => "timed_out",
            IntakeError::Dispatch(DispatchError::MissingCredential) => "misconfigured",
            IntakeError::Dispatch(DispatchError::Provider { .. }) => "dispatch_failed",
        }
    }
}
