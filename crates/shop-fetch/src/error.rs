//! HTTP client error types.

use std::time::Duration;

use thiserror::Error;

use crate::Payload;

/// Errors that can occur when making HTTP requests.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The call ran past its deadline.
    #[error("Request timed out after {}ms: {url}", .timeout.as_millis())]
    Timeout { url: String, timeout: Duration },

    /// The caller's cancellation signal fired.
    #[error("Request aborted: {url}")]
    Aborted { url: String },

    /// Non-success HTTP status.
    #[error("HTTP {status}: {message} ({url})")]
    Failed {
        status: u16,
        message: String,
        body: Payload,
        url: String,
    },

    /// The decoded payload does not fit the requested type.
    #[error("Unexpected response shape from {url}: {reason}")]
    ShapeInvalid { url: String, reason: String },

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Connection, protocol or body read failure.
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Request body could not be serialized.
    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

impl FetchError {
    /// HTTP status for `Failed` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Failed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The resolved URL the error relates to, when known.
    pub fn url(&self) -> Option<&str> {
        match self {
            FetchError::Timeout { url, .. }
            | FetchError::Aborted { url }
            | FetchError::Failed { url, .. }
            | FetchError::ShapeInvalid { url, .. }
            | FetchError::Transport { url, .. } => Some(url),
            FetchError::InvalidUrl(_) | FetchError::Encode(_) => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout { .. })
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, FetchError::Aborted { .. })
    }

    /// Check if the server answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
