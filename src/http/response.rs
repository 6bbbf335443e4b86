//! JSON response bodies.
//!
//! Every outcome is a JSON object: `{success: true, message}` for accepted submissions and
//! `{error}` for rejections. Rejections never echo provider responses or internal details.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;

use crate::quoting::IntakeError;

pub const SUCCESS_MESSAGE: &str = "Quote request submitted successfully";

#[derive(Debug, Serialize)]
pub struct SubmissionAccepted {
    pub success: bool,
    pub message: &'static str,
}

impl Default for SubmissionAccepted {
    fn default() -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE,
        }
    }
}

impl IntoResponse for SubmissionAccepted {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for IntakeError {
    fn into_response(self) -> Response {
        let mut response = (
            self.status(),
            Json(ErrorBody {
                error: self.public_message(),
            }),
        )
            .into_response();

        match &self {
            IntakeError::MethodNotAllowed => {
                response
                    .headers_mut()
                    .insert(header::ALLOW, HeaderValue::from_static("POST"));
            }
            IntakeError::RateLimited { retry_at } => {
                let secs = (*retry_at - Utc::now()).num_seconds().max(1);
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(secs));
            }
            _ => {}
        }

        response
    }
}
