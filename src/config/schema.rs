//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the bridge.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the bridge.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct BridgeConfig {
    /// Listener configuration (bind address, server timeouts).
    pub listener: ListenerConfig,

    /// WRP backend (Scytale) endpoint and transport settings.
    pub backend: BackendConfig,

    /// Admission control for the send route.
    pub rate_limit: RateLimitConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:4900").
    pub bind_address: String,

    /// Server read/write timeout in seconds; also the longest a request may
    /// wait for admission.
    pub timeout_secs: u64,

    /// Time allowed for in-flight requests to drain on shutdown.
    pub shutdown_timeout_secs: u64,
}

impl ListenerConfig {
    /// Address handed to the socket layer. A host-less `:port` binds every
    /// IPv4 interface; hostnames are resolved at bind time.
    pub fn bind_target(&self) -> String {
        match self.bind_address.strip_prefix(':') {
            Some(port) => format!("0.0.0.0:{port}"),
            None => self.bind_address.clone(),
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:4900".to_string(),
            timeout_secs: 15,
            shutdown_timeout_secs: 5,
        }
    }
}

/// Backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    /// Endpoint receiving WRP envelopes.
    pub url: String,

    /// Basic auth credential, already base64 encoded (`user:pass`).
    pub auth: String,

    /// Total time allowed for one backend call.
    pub request_timeout_secs: u64,

    /// Connection establishment timeout, TLS handshake included.
    pub connect_timeout_secs: u64,

    /// Idle pooled connections kept per host.
    pub pool_max_idle_per_host: usize,

    /// How long an idle pooled connection is kept.
    pub pool_idle_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://scytale:6300/api/v2/device".to_string(),
            auth: "dXNlcjpwYXNz".to_string(),
            request_timeout_secs: 10,
            connect_timeout_secs: 10,
            pool_max_idle_per_host: 100,
            pool_idle_timeout_secs: 90,
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Sustained requests per second.
    pub requests_per_second: f64,

    /// Burst capacity.
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 100.0,
            burst_size: 200,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Human-readable multi-field lines.
    Pretty,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Fraction of send requests recorded in metrics.
    pub metrics_sample_rate: f64,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
            metrics_sample_rate: 0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hostless_bind_address_binds_all_interfaces() {
        let listener = ListenerConfig {
            bind_address: ":4900".into(),
            ..Default::default()
        };
        assert_eq!(listener.bind_target(), "0.0.0.0:4900");

        let listener = ListenerConfig {
            bind_address: "localhost:4900".into(),
            ..Default::default()
        };
        assert_eq!(listener.bind_target(), "localhost:4900");
    }
}
