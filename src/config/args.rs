//! Command-line flags and environment overrides.
//!
//! Every setting is optional here: a flag wins over its `SCYTALE_BRIDGE_*`
//! environment variable (clap resolves that order), and either wins over the
//! config file and built-in defaults.

use std::path::PathBuf;

use clap::Parser;

use crate::config::schema::{BridgeConfig, LogFormat};

#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(name = "scytale-bridge", version)]
#[command(about = "HTTP/JSON to WRP gateway for Scytale device messaging", long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, env = "SCYTALE_BRIDGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Validate the resolved configuration and exit.
    #[arg(long)]
    pub check_config: bool,

    /// Scytale (WRP backend) URL.
    #[arg(long, alias = "scytale-url", env = "SCYTALE_BRIDGE_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Address to bind the server.
    #[arg(long, env = "SCYTALE_BRIDGE_ADDRESS")]
    pub address: Option<String>,

    /// Server read and write timeout in seconds.
    #[arg(long, env = "SCYTALE_BRIDGE_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Backend basic auth (base64 encoded user:pass).
    #[arg(
        long,
        alias = "scytale-auth",
        env = "SCYTALE_BRIDGE_BACKEND_AUTH",
        hide_env_values = true
    )]
    pub backend_auth: Option<String>,

    /// Backend request timeout in seconds.
    #[arg(long, env = "SCYTALE_BRIDGE_BACKEND_TIMEOUT")]
    pub backend_timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "SCYTALE_BRIDGE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log output format.
    #[arg(long, value_enum, env = "SCYTALE_BRIDGE_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Requests per second for rate limiting.
    #[arg(long, env = "SCYTALE_BRIDGE_RATE_LIMIT")]
    pub rate_limit: Option<f64>,

    /// Burst size for rate limiting.
    #[arg(long, env = "SCYTALE_BRIDGE_RATE_LIMIT_BURST")]
    pub rate_limit_burst: Option<u32>,

    /// Graceful shutdown timeout in seconds.
    #[arg(long, env = "SCYTALE_BRIDGE_SHUTDOWN_TIMEOUT")]
    pub shutdown_timeout: Option<u64>,

    /// Fraction of send requests recorded in metrics.
    #[arg(long, env = "SCYTALE_BRIDGE_METRICS_SAMPLE_RATE")]
    pub metrics_sample_rate: Option<f64>,
}

impl Cli {
    /// Overlay every provided flag onto `config`.
    pub fn apply(&self, config: &mut BridgeConfig) {
        if let Some(url) = &self.backend_url {
            config.backend.url = url.clone();
        }
        if let Some(address) = &self.address {
            config.listener.bind_address = address.clone();
        }
        if let Some(timeout) = self.timeout {
            config.listener.timeout_secs = timeout;
        }
        if let Some(auth) = &self.backend_auth {
            config.backend.auth = auth.clone();
        }
        if let Some(timeout) = self.backend_timeout {
            config.backend.request_timeout_secs = timeout;
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format;
        }
        if let Some(rate) = self.rate_limit {
            config.rate_limit.requests_per_second = rate;
        }
        if let Some(burst) = self.rate_limit_burst {
            config.rate_limit.burst_size = burst;
        }
        if let Some(timeout) = self.shutdown_timeout {
            config.listener.shutdown_timeout_secs = timeout;
        }
        if let Some(rate) = self.metrics_sample_rate {
            config.observability.metrics_sample_rate = rate;
        }
    }
}
