//! Operator API: service status and the security event log.
//!
//! Mounted only when an admin token is configured; every route requires it as a Bearer token.

pub mod auth;
pub mod handlers;

use axum::{middleware, routing::get, Router};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::server::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/events", get(get_events).delete(drain_events))
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}
