//! Client identity for rate limiting and abuse logging.
//!
//! The service is expected to run behind a proxy or platform edge that sets
//! `X-Forwarded-For`; the left-most entry is the original client.

use axum::http::HeaderMap;
use std::net::SocketAddr;

pub const UNKNOWN_CLIENT: &str = "unknown";

/// Derive the client key from forwarding headers, then the peer address.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    header("x-forwarded-for")
        .or_else(|| header("x-real-ip"))
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// The caller's user agent, for abuse events.
pub fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
