//! Backend reachability probe.
//!
//! # Responsibilities
//! - Resolve the configured backend URL to a host and explicit port
//! - Open (and immediately drop) a TCP connection within a short timeout
//!
//! No HTTP exchange takes place; a listening socket counts as healthy.

use std::time::Duration;

use axum::http::Uri;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::time;

/// Default connect timeout for a probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Probe failures.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("invalid backend URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("backend URL '{0}' has no explicit host and port")]
    MissingHostPort(String),

    #[error("failed to connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("connection to {host}:{port} timed out after {timeout:?}")]
    Timeout {
        host: String,
        port: u16,
        timeout: Duration,
    },
}

impl ProbeError {
    /// True for configuration problems, false for reachability failures.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ProbeError::InvalidUrl { .. } | ProbeError::MissingHostPort(_)
        )
    }
}

/// TCP reachability probe for the backend.
#[derive(Debug, Clone)]
pub struct HealthProbe {
    backend_url: String,
    timeout: Duration,
}

impl HealthProbe {
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// Host and explicit port of the backend URL.
    pub fn target(&self) -> Result<(String, u16), ProbeError> {
        let uri: Uri = self
            .backend_url
            .parse()
            .map_err(|e: axum::http::uri::InvalidUri| ProbeError::InvalidUrl {
                url: self.backend_url.clone(),
                reason: e.to_string(),
            })?;

        if uri.scheme().is_none() {
            return Err(ProbeError::MissingHostPort(self.backend_url.clone()));
        }

        let authority = uri
            .authority()
            .ok_or_else(|| ProbeError::MissingHostPort(self.backend_url.clone()))?;
        let port = authority
            .port_u16()
            .ok_or_else(|| ProbeError::MissingHostPort(self.backend_url.clone()))?;
        let host = authority.host().trim_start_matches('[').trim_end_matches(']');
        if host.is_empty() {
            return Err(ProbeError::MissingHostPort(self.backend_url.clone()));
        }

        Ok((host.to_owned(), port))
    }

    /// Attempt one TCP connection to the backend.
    pub async fn check(&self) -> Result<(), ProbeError> {
        let (host, port) = self.target()?;

        match time::timeout(self.timeout, TcpStream::connect((host.as_str(), port))).await {
            Ok(Ok(_stream)) => Ok(()),
            Ok(Err(source)) => Err(ProbeError::Connect { host, port, source }),
            Err(_) => Err(ProbeError::Timeout {
                host,
                port,
                timeout: self.timeout,
            }),
        }
    }
}
