//! Failure taxonomy of the send pipeline.

use axum::http::StatusCode;
use thiserror::Error;

use crate::wrp::CodecError;

/// Errors raised while translating one send request.
///
/// The `Display` text is what the caller sees in the response body; the
/// underlying cause is kept as the error source for logging only.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("Invalid device ID: must be a 12-character hexadecimal MAC address")]
    InvalidDeviceId,

    #[error("Failed to read request body")]
    BodyRead(#[source] axum::Error),

    #[error("Failed to parse JSON")]
    Parse(#[source] serde_json::Error),

    #[error("Failed to marshal JSON")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to encode WRP Msgpack")]
    Encode(#[source] CodecError),

    #[error("Failed to post to backend")]
    Transport(#[source] reqwest::Error),

    #[error("Backend returned invalid status: {}", status_line(.0))]
    BackendStatus(StatusCode),

    #[error("Failed to read backend response")]
    ReplyRead(#[source] reqwest::Error),

    #[error("Failed to decode backend response")]
    Decode(#[source] CodecError),

    #[error("Empty response from backend")]
    EmptyPayload,
}

impl TranslateError {
    /// Status code returned to the caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            TranslateError::InvalidDeviceId
            | TranslateError::BodyRead(_)
            | TranslateError::Parse(_) => StatusCode::BAD_REQUEST,
            TranslateError::Serialize(_) | TranslateError::Encode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            TranslateError::Transport(_) => StatusCode::SERVICE_UNAVAILABLE,
            TranslateError::BackendStatus(status) => *status,
            // A reply we cannot read is reported as a bad request, not a gateway fault.
            TranslateError::ReplyRead(_) | TranslateError::Decode(_) => StatusCode::BAD_REQUEST,
            TranslateError::EmptyPayload => StatusCode::BAD_GATEWAY,
        }
    }
}

fn status_line(status: &StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}
