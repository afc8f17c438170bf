//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults (schema.rs)
//!     → config file, TOML (loader.rs)
//!     → environment + flags (args.rs, via clap)
//!     → validation.rs (semantic checks)
//!     → BridgeConfig (validated, immutable)
//!     → handed to the server and its subsystems at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod args;
pub mod loader;
pub mod schema;
pub mod validation;

pub use args::Cli;
pub use loader::{load_config, resolve_config, ConfigError};
pub use schema::{
    BackendConfig, BridgeConfig, ListenerConfig, LogFormat, ObservabilityConfig, RateLimitConfig,
};
pub use validation::{validate_config, ValidationError};
