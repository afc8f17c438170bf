//! WRP (Web Routing Protocol) envelope support.
//!
//! # Data Flow
//! ```text
//! outbound: Message → codec::encode → MessagePack bytes → backend
//! inbound:  backend bytes → codec::decode → Message → payload extracted
//! ```
//!
//! # Design Decisions
//! - Struct-map encoding (string keys) so field order is irrelevant on decode
//! - Empty optional fields are omitted on the wire
//! - Unknown keys in replies are ignored

pub mod codec;
pub mod message;

pub use codec::{decode, encode, CodecError, MSGPACK_CONTENT_TYPE};
pub use message::{Message, MessageType};
