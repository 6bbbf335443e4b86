use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;
use crate::observability::events::{SecurityEvent, DEFAULT_RECENT};

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub uptime_secs: i64,
    pub captcha_enabled: bool,
    pub email_configured: bool,
    pub email_template: bool,
    pub buffered_events: usize,
}

#[derive(Deserialize)]
pub struct EventsQuery {
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct DrainSummary {
    pub drained: usize,
    pub events: Vec<SecurityEvent>,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        uptime_secs: (Utc::now() - state.started_at).num_seconds(),
        captcha_enabled: state.pipeline.captcha_enabled(),
        email_configured: state.pipeline.dispatcher().is_configured(),
        email_template: state.pipeline.dispatcher().uses_template(),
        buffered_events: state.events.len(),
    })
}

pub async fn get_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Json<Vec<SecurityEvent>> {
    Json(state.events.recent(query.limit.unwrap_or(DEFAULT_RECENT)))
}

pub async fn drain_events(State(state): State<AppState>) -> Json<DrainSummary> {
    let events = state.events.drain();
    tracing::info!(drained = events.len(), "Security event log drained");
    Json(DrainSummary {
        drained: events.len(),
        events,
    })
}
