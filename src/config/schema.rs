//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the intake service.
//! All types derive Serde traits for deserialization from config files. Secrets are
//! deliberately absent here; see [`Credentials`](crate::config::Credentials).

use serde::{Deserialize, Serialize};

/// Root configuration for the intake service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct IntakeConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Fixed-window rate limiting.
    pub rate_limit: RateLimitConfig,

    /// CAPTCHA verification settings.
    pub captcha: CaptchaConfig,

    /// Transactional email provider and message identities.
    pub email: EmailConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Length of the fixed window in seconds.
    pub window_secs: u64,

    /// Requests accepted per client within one window.
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: 15 * 60,
            max_requests: 5,
        }
    }
}

/// CAPTCHA verification configuration.
///
/// Verification only runs when `RECAPTCHA_SECRET_KEY` is present in the environment.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CaptchaConfig {
    /// Server-to-server verification endpoint.
    pub verify_url: String,

    /// Minimum score in [0, 1] a token must reach.
    pub min_score: f64,
}

impl Default for CaptchaConfig {
    fn default() -> Self {
        Self {
            verify_url: "https://www.google.com/recaptcha/api/siteverify".to_string(),
            min_score: 0.5,
        }
    }
}

/// Email provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EmailConfig {
    /// Transactional email endpoint.
    pub api_url: String,

    /// Sender address for both notifications.
    pub sender_email: String,

    /// Sender display name on the business notification.
    pub sender_name: String,

    /// Business name, used as the acknowledgment sender and in signatures.
    pub business_name: String,

    /// Operator inbox receiving new quote requests.
    pub business_recipient: String,

    /// Phone number printed in the acknowledgment signature.
    pub business_phone: String,

    /// Provider template for the acknowledgment. Falls back to built-in HTML when unset.
    pub template_id: Option<u64>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.brevo.com/v3/smtp/email".to_string(),
            sender_email: "noreply@esmeraldaconstruction.com".to_string(),
            sender_name: "Esmeralda Construction Website".to_string(),
            business_name: "Esmeralda Construction".to_string(),
            business_recipient: "quotes@esmeraldaconstruction.com".to_string(),
            business_phone: "(555) 123-4567".to_string(),
            template_id: None,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline in seconds for the stages before dispatch (rate check through validation).
    pub request_secs: u64,

    /// Per-call timeout for outbound provider requests in seconds.
    pub provider_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            provider_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,

    /// Emit logs as JSON lines instead of the human-readable format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,

    /// Capacity of the in-memory security event log.
    pub event_buffer_size: usize,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
            event_buffer_size: 100,
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security response headers.
    pub enable_headers: bool,
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 64 * 1024, // 64KB
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: IntakeConfig = toml::from_str(
            r#"
            [rate_limit]
            max_requests = 10

            [email]
            template_id = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.rate_limit.max_requests, 10);
        assert_eq!(config.rate_limit.window_secs, 900);
        assert_eq!(config.email.template_id, Some(7));
        assert_eq!(config.email.sender_email, "noreply@esmeraldaconstruction.com");
        assert_eq!(config.captcha.min_score, 0.5);
    }
}
