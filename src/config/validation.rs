//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Smallest useful line limit: one verb byte plus CRLF.
const MIN_LINE_LEN: usize = 3;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("at least one [[listen]] block is required")]
    NoListeners,
    #[error("limits.max_line_len must be at least 3, got {0}")]
    LineLimitTooSmall(usize),
    #[error("limits.outbound_queue must be at least 1")]
    EmptyOutboundQueue,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.name.is_empty() {
        errors.push(ValidationError::MissingServerName);
    }
    if config.listen.is_empty() {
        errors.push(ValidationError::NoListeners);
    }
    if config.limits.max_line_len < MIN_LINE_LEN {
        errors.push(ValidationError::LineLimitTooSmall(config.limits.max_line_len));
    }
    if config.limits.outbound_queue == 0 {
        errors.push(ValidationError::EmptyOutboundQueue);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
