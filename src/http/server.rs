//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the Axum router (submission, health, optional admin routes)
//! - Wire up middleware (request ID, tracing, security headers)
//! - Serve with peer addresses and graceful shutdown

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{header, HeaderName, HeaderValue},
    routing::{any, get},
    Json, Router,
};
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::admin;
use crate::config::{Credentials, IntakeConfig};
use crate::http::submit::{submit, X_REQUEST_ID};
use crate::observability::EventLog;
use crate::quoting::IntakePipeline;

pub const SUBMIT_PATH: &str = "/api/contact";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<IntakePipeline>,
    pub events: Arc<EventLog>,
    pub admin_token: Option<Arc<SecretString>>,
    pub started_at: DateTime<Utc>,
}

/// HTTP server for the intake service.
pub struct IntakeServer {
    router: Router,
    state: AppState,
}

impl IntakeServer {
    /// Build the pipeline and router. Fails only if an outbound HTTP client cannot be created.
    pub fn new(config: IntakeConfig, mut credentials: Credentials) -> Result<Self, reqwest::Error> {
        let events = Arc::new(EventLog::new(config.observability.event_buffer_size));
        let admin_token = credentials.admin_token.take().map(Arc::new);
        let pipeline = IntakePipeline::from_config(&config, credentials, events.clone())?;

        let state = AppState {
            pipeline: Arc::new(pipeline),
            events,
            admin_token,
            started_at: Utc::now(),
        };

        let router = Self::build_router(&config, state.clone());
        Ok(Self { router, state })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// No response-level timeout layer; the pipeline owns its deadline.
    fn build_router(config: &IntakeConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route(SUBMIT_PATH, any(submit))
            .route("/health", get(health));

        if state.admin_token.is_some() {
            router = router.merge(admin::router(state.clone()));
        }

        let x_request_id = HeaderName::from_static(X_REQUEST_ID);
        let mut router = router.with_state(state).layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        );

        if config.security.enable_headers {
            router = router
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("no-store"),
                ));
        }

        router
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            captcha = self.state.pipeline.captcha_enabled(),
            email = self.state.pipeline.dispatcher().is_configured(),
            admin = self.state.admin_token.is_some(),
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
