//! Mapping of backend replies to client outcomes.

use axum::http::StatusCode;

use crate::translator::error::TranslateError;
use crate::wrp::{self, Message};

/// Statuses outside `[200, 400)` are passed through to the caller.
pub fn check_status(status: StatusCode) -> Result<(), TranslateError> {
    if (200..400).contains(&status.as_u16()) {
        Ok(())
    } else {
        Err(TranslateError::BackendStatus(status))
    }
}

/// Decode a reply body and extract a non-empty payload.
pub fn extract_payload(body: &[u8]) -> Result<(Message, Vec<u8>), TranslateError> {
    let mut message = wrp::decode(body).map_err(TranslateError::Decode)?;
    if message.payload.is_empty() {
        return Err(TranslateError::EmptyPayload);
    }
    let payload = std::mem::take(&mut message.payload);
    Ok((message, payload))
}
