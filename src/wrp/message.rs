//! WRP message schema.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// WRP message type, carried on the wire as a small integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "u8", from = "u8")]
pub enum MessageType {
    Authorization,
    SimpleRequestResponse,
    SimpleEvent,
    Create,
    Retrieve,
    Update,
    Delete,
    ServiceRegistration,
    ServiceAlive,
    #[default]
    Unknown,
}

impl From<MessageType> for u8 {
    fn from(kind: MessageType) -> Self {
        match kind {
            MessageType::Authorization => 2,
            MessageType::SimpleRequestResponse => 3,
            MessageType::SimpleEvent => 4,
            MessageType::Create => 5,
            MessageType::Retrieve => 6,
            MessageType::Update => 7,
            MessageType::Delete => 8,
            MessageType::ServiceRegistration => 9,
            MessageType::ServiceAlive => 10,
            MessageType::Unknown => 11,
        }
    }
}

impl From<u8> for MessageType {
    fn from(code: u8) -> Self {
        match code {
            2 => MessageType::Authorization,
            3 => MessageType::SimpleRequestResponse,
            4 => MessageType::SimpleEvent,
            5 => MessageType::Create,
            6 => MessageType::Retrieve,
            7 => MessageType::Update,
            8 => MessageType::Delete,
            9 => MessageType::ServiceRegistration,
            10 => MessageType::ServiceAlive,
            _ => MessageType::Unknown,
        }
    }
}

/// A single WRP message.
///
/// Only the routing, correlation and payload fields are produced by the
/// bridge; the remaining fields exist so replies from the fabric decode
/// cleanly and can be logged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    pub msg_type: MessageType,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub source: String,

    #[serde(rename = "dest", skip_serializing_if = "String::is_empty")]
    pub destination: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub transaction_uuid: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub content_type: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub accept: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,

    /// Request delivery response code.
    #[serde(rename = "rdr", skip_serializing_if = "Option::is_none")]
    pub request_delivery_response: Option<i64>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,

    #[serde(with = "serde_bytes", skip_serializing_if = "Vec::is_empty")]
    pub payload: Vec<u8>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub service_name: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub partner_ids: Vec<String>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub session_id: String,

    #[serde(rename = "qos", skip_serializing_if = "Option::is_none")]
    pub quality_of_service: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_type_codes_match_wrp() {
        assert_eq!(u8::from(MessageType::SimpleRequestResponse), 3);
        assert_eq!(MessageType::from(3), MessageType::SimpleRequestResponse);
        assert_eq!(MessageType::from(0), MessageType::Unknown);
        assert_eq!(MessageType::from(200), MessageType::Unknown);
    }
}
