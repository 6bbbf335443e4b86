//! Quote submission handler.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    response::{IntoResponse, Response},
};

use crate::http::response::SubmissionAccepted;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::quoting::{ErrorClass, RequestContext, Stage};
use crate::security::client;

/// Header set by `SetRequestIdLayer` before the handler runs.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Handles every method on the submission route; the pipeline rejects anything but POST.
pub async fn submit(State(state): State<AppState>, request: Request<Body>) -> Response {
    let started = Instant::now();
    let (parts, body) = request.into_parts();

    let peer = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let ctx = RequestContext {
        method: parts.method.clone(),
        client: client::client_key(&parts.headers, peer),
        user_agent: client::user_agent(&parts.headers),
        request_id: parts
            .headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string(),
    };

    match state.pipeline.process(&ctx, body).await {
        Ok(accepted) => {
            metrics::record_request(accepted.outcome(), started);
            tracing::info!(
                request_id = %ctx.request_id,
                client = %ctx.client,
                stage = %Stage::Responded,
                outcome = accepted.outcome(),
                "Submission accepted"
            );
            SubmissionAccepted::default().into_response()
        }
        Err(e) => {
            metrics::record_request(e.outcome(), started);
            let status = e.status().as_u16();
            match e.class() {
                ErrorClass::Configuration | ErrorClass::Dependency => tracing::error!(
                    request_id = %ctx.request_id,
                    client = %ctx.client,
                    stage = %e.stage(),
                    status,
                    error = %e,
                    "Submission failed"
                ),
                ErrorClass::AbusePolicy => tracing::warn!(
                    request_id = %ctx.request_id,
                    client = %ctx.client,
                    stage = %e.stage(),
                    status,
                    error = %e,
                    "Submission blocked"
                ),
                ErrorClass::Client => tracing::info!(
                    request_id = %ctx.request_id,
                    client = %ctx.client,
                    stage = %e.stage(),
                    status,
                    error = %e,
                    "Submission rejected"
                ),
            }
            e.into_response()
        }
    }
}
