//! Metrics collection and exposition.
//!
//! # Metrics
//! - `intake_requests_total` (counter): submissions by outcome
//! - `intake_request_duration_seconds` (histogram): end-to-end pipeline latency
//! - `intake_rate_limited_total` (counter): requests rejected by the limiter
//! - `intake_spam_blocked_total` (counter): honeypot and CAPTCHA rejections by reason
//! - `intake_captcha_checks_total` (counter): verification calls by result
//! - `intake_emails_sent_total` (counter): provider sends by kind and result
//!
//! Without an installed recorder every call here is a no-op, which keeps tests quiet.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(outcome: &'static str, started: Instant) {
    counter!("intake_requests_total", "outcome" => outcome).increment(1);
    histogram!("intake_request_duration_seconds").record(started.elapsed().as_secs_f64());
}

pub fn record_rate_limited() {
    counter!("intake_rate_limited_total").increment(1);
}

pub fn record_spam_blocked(reason: &'static str) {
    counter!("intake_spam_blocked_total", "reason" => reason).increment(1);
}

pub fn record_captcha(result: &'static str) {
    counter!("intake_captcha_checks_total", "result" => result).increment(1);
}

pub fn record_email(kind: &'static str, success: bool) {
    let result = if success { "sent" } else { "failed" };
    counter!("intake_emails_sent_total", "kind" => kind, "result" => result).increment(1);
}
