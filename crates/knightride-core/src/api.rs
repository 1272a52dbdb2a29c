//! Response envelope shared by every remote operation.
//!
//! A remote call resolves to either its declared payload or a human-readable
//! message. Transport, status and decoding failures are all flattened into the
//! same [`ApiError`]; callers can only display the message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error side of an API call.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct ApiError {
    message: String,
}

impl ApiError {
    /// Creates an error carrying the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message to show to the user.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Consumes the error and returns its message.
    pub fn into_message(self) -> String {
        self.message
    }
}

impl From<String> for ApiError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for ApiError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Outcome of an API call: a payload or an error message, never both.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
