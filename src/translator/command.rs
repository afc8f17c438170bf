//! Inbound JSON commands and per-request correlators.

use std::fmt;

use serde_json::{Map, Value};
use uuid::Uuid;

/// Per-request correlation token.
///
/// Generated once per send request. It is the WRP `transaction_uuid` and,
/// for JSON-RPC bodies lacking a usable `id`, the injected `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Correlator(Uuid);

impl Correlator {
    /// Generate a fresh random (v4) correlator.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for Correlator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Correlator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

/// A JSON object received as the body of a send request.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundCommand(Map<String, Value>);

impl InboundCommand {
    /// Parse a request body. Only JSON objects are accepted.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice::<Map<String, Value>>(bytes).map(Self)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The value under `key`, if present and a JSON string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// True when the body declares a JSON-RPC version string.
    pub fn is_json_rpc(&self) -> bool {
        self.get_str("jsonrpc").is_some()
    }

    /// True when `id` is absent, not a string, or the empty string.
    pub fn lacks_string_id(&self) -> bool {
        matches!(self.get_str("id"), None | Some(""))
    }

    /// Insert the correlator as `id` for JSON-RPC bodies lacking a usable
    /// string id. Returns whether the body was changed.
    pub fn inject_id(&mut self, correlator: &Correlator) -> bool {
        if self.is_json_rpc() && self.lacks_string_id() {
            self.0
                .insert("id".to_owned(), Value::String(correlator.to_string()));
            true
        } else {
            false
        }
    }

    /// Serialize the (possibly mutated) object back to JSON bytes.
    pub fn to_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.0)
    }
}
