//! Construction of outbound WRP envelopes.

use crate::translator::command::{Correlator, InboundCommand};
use crate::translator::device::{DeviceAddress, DeviceId};
use crate::translator::error::TranslateError;
use crate::wrp::{Message, MessageType};

/// WRP `source` identifying this gateway.
pub const SOURCE: &str = "scytale-bridge";

/// Content type of every envelope payload.
pub const PAYLOAD_CONTENT_TYPE: &str = "application/json";

/// An envelope ready for encoding, with the correlator it carries.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub correlator: Correlator,
    pub message: Message,
}

/// Builds one envelope per request.
#[derive(Debug, Clone)]
pub struct EnvelopeBuilder {
    source: String,
}

impl EnvelopeBuilder {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Generate a correlator and wrap the command for `device`/`service`.
    pub fn build(
        &self,
        device: &DeviceId,
        service: &str,
        command: InboundCommand,
    ) -> Result<Envelope, TranslateError> {
        self.build_with(Correlator::new(), device, service, command)
    }

    /// Wrap the command using a caller-supplied correlator.
    pub fn build_with(
        &self,
        correlator: Correlator,
        device: &DeviceId,
        service: &str,
        mut command: InboundCommand,
    ) -> Result<Envelope, TranslateError> {
        command.inject_id(&correlator);
        let payload = command.to_vec().map_err(TranslateError::Serialize)?;

        let message = Message {
            msg_type: MessageType::SimpleRequestResponse,
            source: self.source.clone(),
            destination: DeviceAddress::new(device, service).into_string(),
            content_type: PAYLOAD_CONTENT_TYPE.to_owned(),
            transaction_uuid: correlator.to_string(),
            payload,
            ..Default::default()
        };

        Ok(Envelope {
            correlator,
            message,
        })
    }
}

impl Default for EnvelopeBuilder {
    fn default() -> Self {
        Self::new(SOURCE)
    }
}
