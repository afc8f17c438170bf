//! Request body handling.
//!
//! # Responsibilities
//! - Read the send body up to a fixed cap
//! - Surface transport errors from the client connection
//!
//! # Design Decisions
//! - Oversized bodies are truncated, not rejected; whatever was read is
//!   handed to the JSON parser, which then reports the malformed input
//! - The remainder of an oversized body is never polled

use axum::body::Body;
use futures_util::StreamExt;

/// Largest request body read from a client (1 MiB).
pub const MAX_BODY_SIZE: usize = 1 << 20;

/// Read at most `limit` bytes of `body`, silently discarding the rest.
pub async fn read_body_truncated(body: Body, limit: usize) -> Result<Vec<u8>, axum::Error> {
    let mut stream = body.into_data_stream();
    let mut buf = Vec::new();

    while buf.len() < limit {
        let Some(chunk) = stream.next().await else {
            break;
        };
        let chunk = chunk?;
        let take = chunk.len().min(limit - buf.len());
        buf.extend_from_slice(&chunk[..take]);
    }

    Ok(buf)
}
