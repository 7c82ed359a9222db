//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Top-level config struct and loading (Config, ServerConfig)
//! - [`listen`]: Network listener configuration (ListenConfig)
//! - [`limits`]: Per-connection resource limits (LimitsConfig)
//! - [`validation`]: Startup checks on a parsed Config

mod limits;
mod listen;
mod types;
mod validation;

pub use ircgate_proto::ParserConfig;
pub use limits::LimitsConfig;
pub use listen::ListenConfig;
pub use types::{Config, ConfigError, ServerConfig};
pub use validation::{ValidationError, validate};
