//! Core configuration types and loading.

use ircgate_proto::ParserConfig;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::limits::LimitsConfig;
use super::listen::ListenConfig;
use super::validation::{ValidationError, validate};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(
        "invalid config: {}",
        .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
    )]
    Invalid(Vec<ValidationError>),
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server information.
    pub server: ServerConfig,
    /// Listener blocks; every entry gets its own accept loop.
    #[serde(default)]
    pub listen: Vec<ListenConfig>,
    /// Command parser policy.
    #[serde(default)]
    pub parser: ParserConfig,
    /// Per-connection limits.
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }
}

impl std::str::FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(s)?;
        validate(&config).map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server name (e.g., "irc.example.net"), used in log output.
    pub name: String,
}
