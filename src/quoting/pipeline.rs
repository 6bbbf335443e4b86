//! Submission intake pipeline.
//!
//! # Data Flow
//! ```text
//! Received ──▶ RateChecked ──▶ SpamChecked ──▶ Validated ──▶ Dispatched ──▶ Responded
//!    │              │               │               │             │
//!    └── 405        └── 429         ├── 200 (honeypot, no dispatch)
//!                                   └── 400 / 413   └── 400       └── 500
//!                   └───────── screening deadline (500) ─────────┘
//! ```
//!
//! Every request ends in exactly one response. Nothing is retried and nothing is stored.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::Method;
use chrono::Utc;
use serde_json::json;

use crate::config::{Credentials, IntakeConfig, TimeoutConfig};
use crate::notifications::{BrevoTransport, DispatchError, Dispatcher, EmailTransport};
use crate::observability::events::{EventKind, EventLog, SecurityEvent};
use crate::observability::metrics;
use crate::quoting::error::IntakeError;
use crate::quoting::types::{SanitizedSubmission, SubmissionRequest};
use crate::quoting::validation::{validate, InvalidSubmission};
use crate::security::rate_limit::{FixedWindowLimiter, RateDecision, RateLimitStore};
use crate::security::spam::{CaptchaVerifier, RecaptchaClient, SpamCheck, SpamGate};

const HONEYPOT_LOG_CHARS: usize = 50;

/// Pipeline states, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    RateChecked,
    SpamChecked,
    Validated,
    Dispatched,
    Responded,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::RateChecked => "rate_checked",
            Stage::SpamChecked => "spam_checked",
            Stage::Validated => "validated",
            Stage::Dispatched => "dispatched",
            Stage::Responded => "responded",
        };
        f.write_str(name)
    }
}

/// Per-request facts gathered by the HTTP layer.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub client: String,
    pub user_agent: Option<String>,
    pub request_id: String,
}

/// A submission the caller should see as successful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accepted {
    /// Both notifications were sent.
    Delivered,
    /// Honeypot tripped: reported as success, nothing sent.
    Suppressed,
}

impl Accepted {
    pub fn outcome(&self) -> &'static str {
        match self {
            Accepted::Delivered => "delivered",
            Accepted::Suppressed => "suppressed",
        }
    }
}

/// Sequences rate limiting, spam checks, validation and dispatch for one request.
pub struct IntakePipeline {
    limiter: Arc<dyn RateLimitStore>,
    spam_gate: SpamGate,
    dispatcher: Dispatcher,
    events: Arc<EventLog>,
    max_body_size: usize,
    screening_deadline: Duration,
}

/// Result of the stages before dispatch.
enum Screened {
    /// Honeypot tripped.
    Suppressed,
    Ready {
        submission: SanitizedSubmission,
        captcha_score: Option<f64>,
    },
}

impl IntakePipeline {
    pub fn new(
        limiter: Arc<dyn RateLimitStore>,
        spam_gate: SpamGate,
        dispatcher: Dispatcher,
        events: Arc<EventLog>,
        max_body_size: usize,
    ) -> Self {
        Self {
            limiter,
            spam_gate,
            dispatcher,
            events,
            max_body_size,
            screening_deadline: Duration::from_secs(TimeoutConfig::default().request_secs),
        }
    }

    /// Bound the stages before dispatch.
    pub fn with_screening_deadline(mut self, deadline: Duration) -> Self {
        self.screening_deadline = deadline;
        self
    }

    /// Wire the production components from configuration and environment secrets.
    pub fn from_config(
        config: &IntakeConfig,
        credentials: Credentials,
        events: Arc<EventLog>,
    ) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(config.timeouts.provider_secs);

        let verifier = match credentials.captcha_secret {
            Some(secret) => {
                let client = RecaptchaClient::new(config.captcha.verify_url.clone(), secret, timeout)?;
                Some(Arc::new(client) as Arc<dyn CaptchaVerifier>)
            }
            None => None,
        };

        let transport = match credentials.email_api_key {
            Some(key) => {
                let transport = BrevoTransport::new(config.email.api_url.clone(), key, timeout)?;
                Some(Arc::new(transport) as Arc<dyn EmailTransport>)
            }
            None => None,
        };

        Ok(Self::new(
            Arc::new(FixedWindowLimiter::new(&config.rate_limit)),
            SpamGate::new(verifier, config.captcha.min_score),
            Dispatcher::new(transport, config.email.clone()),
            events,
            config.security.max_body_size,
        )
        .with_screening_deadline(Duration::from_secs(config.timeouts.request_secs)))
    }

    pub fn captcha_enabled(&self) -> bool {
        self.spam_gate.captcha_enabled()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Run one request through every stage.
    ///
    /// The screening deadline covers every stage up to validation. Dispatch is bounded only by
    /// the per-call provider timeouts and is never cut short once started.
    pub async fn process(&self, ctx: &RequestContext, body: Body) -> Result<Accepted, IntakeError> {
        let started = Instant::now();

        if ctx.method != Method::POST {
            return Err(IntakeError::MethodNotAllowed);
        }

        let screened = match tokio::time::timeout(self.screening_deadline, self.screen(ctx, body)).await {
            Ok(screened) => screened?,
            Err(_) => {
                self.record(
                    ctx,
                    EventKind::Error,
                    json!({ "reason": "timeout", "deadline_ms": self.screening_deadline.as_millis() as u64 }),
                );
                return Err(IntakeError::TimedOut);
            }
        };

        let (submission, captcha_score) = match screened {
            Screened::Suppressed => return Ok(Accepted::Suppressed),
            Screened::Ready {
                submission,
                captcha_score,
            } => (submission, captcha_score),
        };

        if let Err(e) = self.dispatcher.dispatch(&submission).await {
            let reason = match &e {
                DispatchError::MissingCredential => "configuration",
                DispatchError::Provider { .. } => "dispatch",
            };
            self.record(
                ctx,
                EventKind::Error,
                json!({ "reason": reason, "detail": e.to_string() }),
            );
            return Err(e.into());
        }

        self.record(
            ctx,
            EventKind::FormSubmission,
            json!({
                "success": true,
                "services": submission.services.len(),
                "recaptcha_score": captcha_score,
                "processing_ms": started.elapsed().as_millis() as u64,
            }),
        );
        Ok(Accepted::Delivered)
    }

    /// Rate check, body decoding, spam gate and validation.
    async fn screen(&self, ctx: &RequestContext, body: Body) -> Result<Screened, IntakeError> {
        if let RateDecision::Limited { retry_at } = self.limiter.check(&ctx.client, Utc::now()) {
            metrics::record_rate_limited();
            self.record(ctx, EventKind::RateLimitExceeded, json!({ "retry_at": retry_at }));
            return Err(IntakeError::RateLimited { retry_at });
        }
        tracing::debug!(request_id = %ctx.request_id, stage = %Stage::RateChecked, "Rate limit passed");

        let bytes = axum::body::to_bytes(body, self.max_body_size)
            .await
            .map_err(|_| IntakeError::PayloadTooLarge)?;
        let request: SubmissionRequest =
            serde_json::from_slice(&bytes).map_err(|e| IntakeError::MalformedBody(e.to_string()))?;

        let captcha_score = match self
            .spam_gate
            .check(
                request.honeypot.as_deref(),
                request.recaptcha_token.as_deref(),
                &ctx.client,
            )
            .await
        {
            SpamCheck::Clean { captcha_score } => captcha_score,
            SpamCheck::Honeypot => {
                metrics::record_spam_blocked("honeypot");
                let honeypot: String = request
                    .honeypot
                    .as_deref()
                    .unwrap_or_default()
                    .chars()
                    .take(HONEYPOT_LOG_CHARS)
                    .collect();
                self.record(ctx, EventKind::HoneypotTriggered, json!({ "honeypot": honeypot }));
                return Ok(Screened::Suppressed);
            }
            SpamCheck::CaptchaRejected { score, error_codes } => {
                metrics::record_spam_blocked("captcha");
                self.record(
                    ctx,
                    EventKind::RecaptchaFailed,
                    json!({ "score": score, "errors": error_codes }),
                );
                return Err(IntakeError::CaptchaRejected);
            }
        };
        tracing::debug!(request_id = %ctx.request_id, stage = %Stage::SpamChecked, "Spam checks passed");

        let submission = validate(&request).inspect_err(|e| {
            if let InvalidSubmission::MissingFields(fields) = e {
                tracing::debug!(request_id = %ctx.request_id, missing = ?fields, "Required fields missing");
            }
        })?;
        tracing::debug!(
            request_id = %ctx.request_id,
            stage = %Stage::Validated,
            services = submission.services.len(),
            "Submission validated"
        );

        Ok(Screened::Ready {
            submission,
            captcha_score,
        })
    }

    fn record(&self, ctx: &RequestContext, kind: EventKind, details: serde_json::Value) {
        self.events.record(
            SecurityEvent::new(kind, ctx.client.clone(), details).with_user_agent(ctx.user_agent.clone()),
        );
    }
}
