//! Top-level error type for the `Langfuse` client.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::observer::DispatcherError;

/// Errors returned synchronously to SDK callers.
///
/// Delivery failures are not here: they happen after the call returned and
/// only reach the error sink.
#[derive(Debug, Error)]
pub enum LangfuseError {
    /// A required identifier was empty; nothing was queued.
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dispatcher(#[from] DispatcherError),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, LangfuseError>;
