//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, rates finite, sample rate in [0, 1])
//! - Check the backend URL and credential can actually be used
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BridgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::ToSocketAddrs;

use axum::http::HeaderValue;
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;
use url::Url;

use crate::config::schema::BridgeConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a resolvable host:port")]
    BindAddress(String),

    #[error("backend.url '{url}' is invalid: {reason}")]
    BackendUrl { url: String, reason: String },

    #[error("backend.auth is not usable as a header value")]
    BackendCredential,

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("rate_limit.requests_per_second must be a finite non-negative number, got {0}")]
    Rate(f64),

    #[error("observability.metrics_sample_rate must be within [0, 1], got {0}")]
    SampleRate(f64),

    #[error("observability.log_level '{0}' is not a recognised level")]
    LogLevel(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let resolvable = config
        .listener
        .bind_target()
        .to_socket_addrs()
        .is_ok_and(|mut addrs| addrs.next().is_some());
    if !resolvable {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    match Url::parse(&config.backend.url) {
        Ok(url) if !matches!(url.scheme(), "http" | "https") => {
            errors.push(ValidationError::BackendUrl {
                url: config.backend.url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::BackendUrl {
            url: config.backend.url.clone(),
            reason: e.to_string(),
        }),
    }

    if HeaderValue::from_str(&format!("Basic {}", config.backend.auth)).is_err() {
        errors.push(ValidationError::BackendCredential);
    }

    for (name, secs) in [
        ("listener.timeout_secs", config.listener.timeout_secs),
        ("listener.shutdown_timeout_secs", config.listener.shutdown_timeout_secs),
        ("backend.request_timeout_secs", config.backend.request_timeout_secs),
        ("backend.connect_timeout_secs", config.backend.connect_timeout_secs),
    ] {
        if secs == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    let rate = config.rate_limit.requests_per_second;
    if !rate.is_finite() || rate < 0.0 {
        errors.push(ValidationError::Rate(rate));
    }

    let sample = config.observability.metrics_sample_rate;
    if !(0.0..=1.0).contains(&sample) {
        errors.push(ValidationError::SampleRate(sample));
    }

    if config.observability.log_level.parse::<LevelFilter>().is_err() {
        errors.push(ValidationError::LogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
