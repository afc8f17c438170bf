//! MessagePack encoding of WRP messages.

use thiserror::Error;

use crate::wrp::message::Message;

/// Content type used for WRP MessagePack bodies.
pub const MSGPACK_CONTENT_TYPE: &str = "application/msgpack";

/// Errors from the WRP codec.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("msgpack encode failed: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("msgpack decode failed: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

/// Encode a message as a MessagePack map keyed by field name.
pub fn encode(message: &Message) -> Result<Vec<u8>, CodecError> {
    Ok(rmp_serde::to_vec_named(message)?)
}

/// Decode a MessagePack buffer into a message.
pub fn decode(bytes: &[u8]) -> Result<Message, CodecError> {
    Ok(rmp_serde::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wrp::message::MessageType;
    use serde::Serialize;

    fn request() -> Message {
        Message {
            msg_type: MessageType::SimpleRequestResponse,
            source: "scytale-bridge".into(),
            destination: "mac:112233445566/config".into(),
            transaction_uuid: "c2a7b8f0-0000-4000-8000-000000000000".into(),
            content_type: "application/json".into(),
            payload: br#"{"command":"GET"}"#.to_vec(),
            ..Default::default()
        }
    }

    #[test]
    fn encodes_as_string_keyed_map() {
        let bytes = encode(&request()).unwrap();
        let value: rmpv::Value = rmp_serde::from_slice(&bytes).unwrap();
        let map = value.as_map().expect("struct-map encoding");

        let keys: Vec<&str> = map.iter().filter_map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            ["msg_type", "source", "dest", "transaction_uuid", "content_type", "payload"]
        );

        let payload = map
            .iter()
            .find(|(k, _)| k.as_str() == Some("payload"))
            .map(|(_, v)| v)
            .unwrap();
        assert!(payload.is_bin(), "payload must be a msgpack bin");
    }

    #[test]
    fn decode_ignores_unknown_fields() {
        #[derive(Serialize)]
        struct Reply<'a> {
            msg_type: u8,
            transaction_uuid: &'a str,
            #[serde(with = "serde_bytes")]
            payload: &'a [u8],
            trace_token: &'a str,
        }

        let bytes = rmp_serde::to_vec_named(&Reply {
            msg_type: 3,
            transaction_uuid: "abc",
            payload: b"{}",
            trace_token: "ignored",
        })
        .unwrap();

        let message = decode(&bytes).unwrap();
        assert_eq!(message.msg_type, MessageType::SimpleRequestResponse);
        assert_eq!(message.transaction_uuid, "abc");
        assert_eq!(message.payload, b"{}");
    }

    #[test]
    fn decode_tolerates_missing_payload() {
        let reply = Message {
            msg_type: MessageType::SimpleRequestResponse,
            status: Some(200),
            ..Default::default()
        };
        let message = decode(&encode(&reply).unwrap()).unwrap();
        assert!(message.payload.is_empty());
        assert_eq!(message.status, Some(200));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(decode(b""), Err(CodecError::Decode(_))));
        assert!(matches!(decode(b"not msgpack"), Err(CodecError::Decode(_))));
    }
}
