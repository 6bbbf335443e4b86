//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and formats. All problems are
//! collected so an operator can fix a config file in one pass.

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::IntakeConfig;
use crate::quoting::validation::is_valid_email;

/// A single semantic problem with a loaded configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("{field} is not a valid socket address: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} is not a valid URL: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field} is not a valid email address: {value}")]
    InvalidEmail { field: &'static str, value: String },

    #[error("captcha.min_score must be within [0, 1], got {0}")]
    ScoreOutOfRange(f64),

    /// The screening deadline must leave room for one CAPTCHA call.
    #[error("timeouts.request_secs ({request}) must exceed timeouts.provider_secs ({provider})")]
    DeadlineTooShort { request: u64, provider: u64 },
}

/// Validate a configuration, returning every problem found.
pub fn validate_config(config: &IntakeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if config.rate_limit.window_secs == 0 {
        errors.push(ValidationError::NotPositive { field: "rate_limit.window_secs" });
    }
    if config.rate_limit.max_requests == 0 {
        errors.push(ValidationError::NotPositive { field: "rate_limit.max_requests" });
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::NotPositive { field: "timeouts.request_secs" });
    }
    if config.timeouts.provider_secs == 0 {
        errors.push(ValidationError::NotPositive { field: "timeouts.provider_secs" });
    }
    let (request, provider) = (config.timeouts.request_secs, config.timeouts.provider_secs);
    if request > 0 && provider > 0 && request <= provider {
        errors.push(ValidationError::DeadlineTooShort { request, provider });
    }
    if config.observability.event_buffer_size == 0 {
        errors.push(ValidationError::NotPositive { field: "observability.event_buffer_size" });
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::NotPositive { field: "security.max_body_size" });
    }

    let score = config.captcha.min_score;
    if !(0.0..=1.0).contains(&score) {
        errors.push(ValidationError::ScoreOutOfRange(score));
    }

    check_url(&mut errors, "captcha.verify_url", &config.captcha.verify_url);
    check_url(&mut errors, "email.api_url", &config.email.api_url);

    check_email(&mut errors, "email.sender_email", &config.email.sender_email);
    check_email(&mut errors, "email.business_recipient", &config.email.business_recipient);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress { field, value: value.to_string() });
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        _ => errors.push(ValidationError::InvalidUrl { field, value: value.to_string() }),
    }
}

fn check_email(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if !is_valid_email(value) {
        errors.push(ValidationError::InvalidEmail { field, value: value.to_string() });
    }
}
