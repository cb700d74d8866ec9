//! API error definitions.

use thiserror::Error;

use crate::observer::DeliveryError;

/// Errors that can occur talking to the Langfuse API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, timeout or body transfer failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not the expected JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Prompt response carried a `type` other than text or chat.
    #[error("Unknown prompt type: '{0}'")]
    UnknownPromptType(String),

    /// Configured host cannot be used as a base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<ApiError> for DeliveryError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Http(e) => DeliveryError::Transport(e.to_string()),
            ApiError::Status { status, body } => DeliveryError::Rejected {
                status,
                message: body,
            },
            other => DeliveryError::Other(other.to_string()),
        }
    }
}
