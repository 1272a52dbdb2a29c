//! Failure kinds of a single API request.

use knightride_core::ApiError;
use serde_json::Value;
use thiserror::Error;

/// Why a request did not produce its payload.
///
/// The kinds only exist inside the client. At the client boundary every
/// variant is flattened into an [`ApiError`] carrying its `Display` text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// No response was received.
    #[error("{0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// A success response whose body is not the expected JSON.
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// The request body could not be serialized.
    #[error("Failed to encode request body: {0}")]
    Encode(String),
}

impl RequestError {
    /// Builds an HTTP error from the raw response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        Self::Http {
            status,
            message: http_error_message(status, body),
        }
    }
}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        ApiError::new(err.to_string())
    }
}

/// Message for a non-success response.
///
/// Uses the server's `detail` field when the body is JSON and carries one,
/// otherwise a generic message with the status code. Structured details
/// (such as validation error lists) are rendered as compact JSON.
pub fn http_error_message(status: u16, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("detail").cloned());

    match detail {
        Some(Value::String(message)) if !message.is_empty() => message,
        Some(Value::Null) | Some(Value::String(_)) | None => {
            format!("HTTP error! status: {}", status)
        }
        Some(other) => other.to_string(),
    }
}
