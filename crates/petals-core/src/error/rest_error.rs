//! REST collaborator failures

use thiserror::Error;

/// Structured failure returned by a `RestClient`
#[derive(Debug, Error)]
pub enum RestError {
    /// Non-success HTTP status with the API's error body, if any
    #[error("HTTP {status}: {message}")]
    Status {
        status: u16,
        code: Option<u64>,
        message: String,
    },

    #[error("Rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl RestError {
    /// HTTP status, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            Self::Request(_) | Self::Decode(_) => None,
        }
    }

    /// Check if the same request may succeed later
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Request(_) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Decode(_) => false,
        }
    }
}
