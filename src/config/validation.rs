//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0)
//! - Check the host is a usable http(s) base URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LangfuseConfig → Result<(), Vec<ValidationError>>
//! - An empty host is valid; it is resolved from the environment later

use thiserror::Error;
use url::Url;

use crate::config::schema::LangfuseConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("api.host '{host}' is not a valid URL: {reason}")]
    InvalidHost { host: String, reason: String },

    #[error("api.host '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("api.timeout_secs must be greater than 0")]
    ZeroTimeout,

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &LangfuseConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !config.api.host.is_empty() {
        match Url::parse(&config.api.host) {
            Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
                errors.push(ValidationError::UnsupportedScheme(config.api.host.clone()));
            }
            Ok(_) => {}
            Err(e) => errors.push(ValidationError::InvalidHost {
                host: config.api.host.clone(),
                reason: e.to_string(),
            }),
        }
    }

    if config.api.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(config.observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
