//! JSON to WRP request translation.
//!
//! # Data Flow
//! ```text
//! POST /api/v1/{deviceID}/send/{service}
//!     → device.rs (validate device id, build destination)
//!     → http::request (read body, 1 MiB truncating reader)
//!     → command.rs (parse JSON object, JSON-RPC id injection)
//!     → envelope.rs (correlator, WRP message)
//!     → wrp::codec (MessagePack encode)
//!     → backend.rs (pooled POST, Basic auth)
//!     → reply.rs (status mapping, decode, payload extraction)
//!     → raw JSON payload to the caller
//! ```
//!
//! Every failure is logged where it happens and returned as a
//! [`TranslateError`], which knows its client status.

pub mod backend;
pub mod command;
pub mod device;
pub mod envelope;
pub mod error;
pub mod reply;

use axum::body::Body;

pub use backend::{BackendClient, BackendError};
pub use command::{Correlator, InboundCommand};
pub use device::{DeviceAddress, DeviceId};
pub use envelope::{Envelope, EnvelopeBuilder};
pub use error::TranslateError;

use crate::http::request::{read_body_truncated, MAX_BODY_SIZE};
use crate::wrp;

/// Translates one send request into a backend call and back.
#[derive(Debug, Clone)]
pub struct EnvelopeTranslator {
    backend: BackendClient,
    builder: EnvelopeBuilder,
}

impl EnvelopeTranslator {
    pub fn new(backend: BackendClient) -> Self {
        Self {
            backend,
            builder: EnvelopeBuilder::default(),
        }
    }

    /// Run the whole pipeline and return the reply payload bytes.
    pub async fn send(
        &self,
        device_id: &str,
        service: &str,
        body: Body,
    ) -> Result<Vec<u8>, TranslateError> {
        let device = DeviceId::parse(device_id).inspect_err(|_| {
            tracing::error!(device_id = %device_id, "Invalid device ID format");
        })?;

        let raw = read_body_truncated(body, MAX_BODY_SIZE)
            .await
            .map_err(|e| {
                tracing::error!(device_id = %device, error = %e, "Failed to read request body");
                TranslateError::BodyRead(e)
            })?;

        let command = InboundCommand::from_slice(&raw).map_err(|e| {
            tracing::error!(device_id = %device, error = %e, "Failed to unmarshal JSON");
            TranslateError::Parse(e)
        })?;

        let envelope = self.builder.build(&device, service, command).inspect_err(|e| {
            tracing::error!(device_id = %device, error = ?e, "Failed to marshal JSON");
        })?;
        let request_id = envelope.correlator;

        let encoded = wrp::encode(&envelope.message).map_err(|e| {
            tracing::error!(
                device_id = %device,
                request_id = %request_id,
                error = %e,
                "Failed to encode WRP Msgpack"
            );
            TranslateError::Encode(e)
        })?;

        tracing::debug!(
            device_id = %device,
            request_id = %request_id,
            destination = %envelope.message.destination,
            url = %self.backend.url(),
            "Sending WRP request"
        );

        let response = self.backend.post(encoded).await.map_err(|e| {
            tracing::error!(
                device_id = %device,
                request_id = %request_id,
                error = %e,
                timeout = e.is_timeout(),
                "Failed to post to backend"
            );
            TranslateError::Transport(e)
        })?;

        let status = response.status();
        reply::check_status(status).inspect_err(|_| {
            tracing::error!(
                device_id = %device,
                request_id = %request_id,
                status_code = status.as_u16(),
                "Backend returned invalid status"
            );
        })?;

        let body = response.bytes().await.map_err(|e| {
            tracing::error!(
                device_id = %device,
                request_id = %request_id,
                error = %e,
                "Failed to read backend response"
            );
            TranslateError::ReplyRead(e)
        })?;

        match reply::extract_payload(&body) {
            Ok((message, payload)) => {
                tracing::debug!(
                    device_id = %device,
                    request_id = %request_id,
                    transaction_uuid = %message.transaction_uuid,
                    wrp_status = ?message.status,
                    payload_len = payload.len(),
                    "Received WRP response"
                );
                Ok(payload)
            }
            Err(TranslateError::EmptyPayload) => {
                tracing::warn!(
                    device_id = %device,
                    request_id = %request_id,
                    "Empty payload in backend response"
                );
                Err(TranslateError::EmptyPayload)
            }
            Err(e) => {
                tracing::error!(
                    device_id = %device,
                    request_id = %request_id,
                    error = ?e,
                    "Failed to decode Msgpack response"
                );
                Err(e)
            }
        }
    }
}
