//! Configuration loading from disk and the command line.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::args::Cli;
use crate::config::schema::BridgeConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Locations searched when no config file is named explicitly.
pub const DEFAULT_CONFIG_PATHS: [&str; 2] = ["config.toml", "/etc/scytale-bridge/config.toml"];

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Parse error in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML file into a configuration, without validating it.
pub fn load_config(path: &Path) -> Result<BridgeConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the first default config file that exists, or fall back to defaults.
fn discover_config(candidates: &[&str]) -> Result<(BridgeConfig, Option<PathBuf>), ConfigError> {
    for candidate in candidates {
        let path = Path::new(candidate);
        if path.is_file() {
            return Ok((load_config(path)?, Some(path.to_path_buf())));
        }
    }
    Ok((BridgeConfig::default(), None))
}

/// Resolve the effective configuration: flags > environment > file > defaults.
///
/// An explicitly named file must exist; the default locations are optional.
pub fn resolve_config(cli: &Cli) -> Result<(BridgeConfig, Option<PathBuf>), ConfigError> {
    let (mut config, source) = match &cli.config {
        Some(path) => (load_config(path)?, Some(path.clone())),
        None => discover_config(&DEFAULT_CONFIG_PATHS)?,
    };

    cli.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok((config, source))
}
