//! Error types shared by the API client, storage, and page controllers.

use thiserror::Error;

use crate::storage::StorageError;

/// Everything that can go wrong between a user action and its result.
///
/// Cancellation is its own variant so callers can drop it silently instead of
/// reporting it as a failure.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{field}: {message}")]
    Validation { field: String, message: String },
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("request cancelled")]
    Cancelled,
    #[error("not found")]
    NotFound,
    #[error("server responded with status {status} for {path}")]
    Status { status: u16, path: String },
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ClientError {
    /// Create a validation error for a named form field.
    #[must_use]
    pub fn validation(field: &str, message: &str) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}
