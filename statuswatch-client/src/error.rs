//! Error types for status sources.

use thiserror::Error;

/// Errors that can occur when fetching the remote status.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The endpoint answered with a non-success status code.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// The body was not JSON or lacked a required field.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The configured endpoint could not be used.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl FetchError {
    /// Whether this is a network-level failure (as opposed to a bad payload).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            FetchError::Http(_) | FetchError::Connection(_) | FetchError::Timeout
        )
    }

    /// Whether the endpoint answered but the payload could not be used.
    pub fn is_malformed(&self) -> bool {
        matches!(self, FetchError::Malformed(_))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Connection(err.to_string())
        } else if err.is_decode() {
            FetchError::Malformed(err.to_string())
        } else if err.is_builder() {
            FetchError::InvalidEndpoint(err.to_string())
        } else {
            FetchError::Http(err.to_string())
        }
    }
}
