//! Response construction.
//!
//! # Responsibilities
//! - Map subsystem errors to HTTP status codes and bodies
//! - Shape plain-text error bodies consistently
//! - Shape successful send and health replies
//!
//! # Design Decisions
//! - Error bodies are plain text terminated by a newline
//! - The underlying cause never reaches the client; it is logged instead

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::health::ProbeError;
use crate::security::AdmissionError;
use crate::translator::TranslateError;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const APPLICATION_JSON: &str = "application/json";

/// Plain-text error response.
pub fn plain_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN)),
            (
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ),
        ],
        format!("{message}\n"),
    )
        .into_response()
}

/// Successful send: the device's raw JSON reply.
pub fn json_payload(payload: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON))],
        payload,
    )
        .into_response()
}

/// Successful health check.
pub fn healthy() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON))],
        r#"{"status":"healthy"}"#,
    )
        .into_response()
}

impl IntoResponse for TranslateError {
    fn into_response(self) -> Response {
        plain_error(self.status_code(), &self.to_string())
    }
}

impl IntoResponse for AdmissionError {
    fn into_response(self) -> Response {
        plain_error(StatusCode::TOO_MANY_REQUESTS, "Too Many Requests")
    }
}

impl IntoResponse for ProbeError {
    fn into_response(self) -> Response {
        match self {
            ProbeError::InvalidUrl { .. } => plain_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Health check failed: invalid backend URL",
            ),
            ProbeError::MissingHostPort(_) => plain_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Health check failed: invalid backend host/port",
            ),
            ProbeError::Connect { .. } | ProbeError::Timeout { .. } => {
                plain_error(StatusCode::SERVICE_UNAVAILABLE, "Backend unreachable")
            }
        }
    }
}
