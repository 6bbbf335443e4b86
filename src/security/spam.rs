//! Bot and spam detection: honeypot field plus optional CAPTCHA verification.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use crate::observability::metrics;

/// Provider response from the verification endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CaptchaVerdict {
    pub success: bool,
    /// Score in [0, 1]. Absent for challenge-style (non-scoring) tokens.
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default, rename = "error-codes")]
    pub error_codes: Vec<String>,
}

/// The verification call itself failed. Never fatal for the submission.
#[derive(Debug, Error)]
pub enum CaptchaError {
    #[error("verification request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("verification endpoint returned status {0}")]
    Status(u16),
}

/// Server-to-server CAPTCHA token verification.
#[async_trait]
pub trait CaptchaVerifier: Send + Sync {
    async fn verify(&self, token: &str, remote_ip: &str) -> Result<CaptchaVerdict, CaptchaError>;
}

/// reCAPTCHA `siteverify` client.
pub struct RecaptchaClient {
    client: reqwest::Client,
    verify_url: String,
    secret: SecretString,
}

impl RecaptchaClient {
    pub fn new(verify_url: impl Into<String>, secret: SecretString, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            verify_url: verify_url.into(),
            secret,
        })
    }
}

#[async_trait]
impl CaptchaVerifier for RecaptchaClient {
    async fn verify(&self, token: &str, remote_ip: &str) -> Result<CaptchaVerdict, CaptchaError> {
        let response = self
            .client
            .post(&self.verify_url)
            .form(&[
                ("secret", self.secret.expose_secret()),
                ("response", token),
                ("remoteip", remote_ip),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CaptchaError::Status(status.as_u16()));
        }

        Ok(response.json::<CaptchaVerdict>().await?)
    }
}

/// Result of running the spam gate over one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SpamCheck {
    /// Passed. `captcha_score` is set when a verification actually happened.
    Clean { captcha_score: Option<f64> },
    /// Hidden field was filled in. The caller must fake success and skip dispatch.
    Honeypot,
    /// Provider judged the token as automated.
    CaptchaRejected {
        score: Option<f64>,
        error_codes: Vec<String>,
    },
}

/// Combines the honeypot and CAPTCHA checks.
pub struct SpamGate {
    verifier: Option<Arc<dyn CaptchaVerifier>>,
    min_score: f64,
}

impl SpamGate {
    /// `verifier` is `None` when no CAPTCHA secret is configured; verification is then skipped.
    pub fn new(verifier: Option<Arc<dyn CaptchaVerifier>>, min_score: f64) -> Self {
        Self { verifier, min_score }
    }

    pub fn captcha_enabled(&self) -> bool {
        self.verifier.is_some()
    }

    /// Run both checks in order. Verification only runs when a verifier and a token are both present.
    pub async fn check(&self, honeypot: Option<&str>, token: Option<&str>, client: &str) -> SpamCheck {
        if honeypot_triggered(honeypot) {
            return SpamCheck::Honeypot;
        }

        let (Some(verifier), Some(token)) = (&self.verifier, token.filter(|t| !t.is_empty())) else {
            return SpamCheck::Clean { captcha_score: None };
        };

        match verifier.verify(token, client).await {
            Ok(verdict) => {
                let below_threshold = verdict.score.is_some_and(|s| s < self.min_score);
                if !verdict.success || below_threshold {
                    metrics::record_captcha("rejected");
                    SpamCheck::CaptchaRejected {
                        score: verdict.score,
                        error_codes: verdict.error_codes,
                    }
                } else {
                    metrics::record_captcha("passed");
                    tracing::debug!(client = %client, score = ?verdict.score, "CAPTCHA passed");
                    SpamCheck::Clean {
                        captcha_score: verdict.score,
                    }
                }
            }
            Err(e) => {
                metrics::record_captcha("unavailable");
                tracing::warn!(client = %client, error = %e, "CAPTCHA verification unavailable, continuing");
                SpamCheck::Clean { captcha_score: None }
            }
        }
    }
}

/// A hidden field that is non-empty after trimming marks the submission as automated.
pub fn honeypot_triggered(honeypot: Option<&str>) -> bool {
    honeypot.is_some_and(|v| !v.trim().is_empty())
}
