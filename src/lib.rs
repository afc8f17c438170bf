//! HTTP/JSON to WRP device-command gateway.
//!
//! Accepts JSON commands over HTTP, wraps them in WRP (MessagePack) envelopes
//! for a Scytale-compatible backend, and returns the device's reply payload.

// Core subsystems
pub mod config;
pub mod http;
pub mod translator;
pub mod wrp;

// Cross-cutting concerns
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::schema::BridgeConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
