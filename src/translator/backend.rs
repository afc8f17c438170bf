//! Pooled HTTP transport to the WRP backend.
//!
//! # Design Decisions
//! - One client per process; the connection pool is shared by all requests
//! - Single attempt per request; failures surface immediately
//! - Credentials are validated when the client is built, not per request

use std::time::Duration;

use axum::http::{header, HeaderValue};
use thiserror::Error;
use url::Url;

use crate::config::BackendConfig;
use crate::wrp::MSGPACK_CONTENT_TYPE;

/// Errors building the backend client.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("invalid backend URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("backend credential is not a valid header value")]
    InvalidCredential,

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// HTTP client for posting WRP envelopes to the backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    url: Url,
    authorization: HeaderValue,
}

impl BackendClient {
    /// Build the pooled client from configuration.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let url = Url::parse(&config.url).map_err(|source| BackendError::InvalidUrl {
            url: config.url.clone(),
            source,
        })?;

        let mut authorization = HeaderValue::from_str(&format!("Basic {}", config.auth))
            .map_err(|_| BackendError::InvalidCredential)?;
        authorization.set_sensitive(true);

        // connect_timeout covers the TCP connect and the TLS handshake.
        // rustls offers h2 and http/1.1 over ALPN for https backends.
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url,
            authorization,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// POST an encoded envelope. Any status is returned as `Ok`; only
    /// transport failures are errors.
    pub async fn post(&self, envelope: Vec<u8>) -> Result<reqwest::Response, reqwest::Error> {
        self.client
            .post(self.url.clone())
            .header(header::CONTENT_TYPE, MSGPACK_CONTENT_TYPE)
            .header(header::ACCEPT, MSGPACK_CONTENT_TYPE)
            .header(header::AUTHORIZATION, self.authorization.clone())
            .body(envelope)
            .send()
            .await
    }
}
