//! Client error types
//!
//! One error type for every client operation, so callers can tell
//! "will never succeed" from "might succeed after retry".

use petals_common::ConfigError;
use petals_core::{DomainError, RestError};
use petals_gateway::TransportError;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Precondition or lookup failure raised before any request
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The REST collaborator failed
    #[error(transparent)]
    Rest(#[from] RestError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Client already started")]
    AlreadyStarted,
}

impl ClientError {
    /// Get a stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Domain(e) => e.code(),
            Self::Rest(RestError::RateLimited { .. }) => "RATE_LIMITED",
            Self::Rest(_) => "REST_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::AlreadyStarted => "ALREADY_STARTED",
        }
    }

    /// Failed a local check; retrying the same call cannot succeed
    pub fn is_precondition(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_precondition(),
            Self::AlreadyStarted => true,
            _ => false,
        }
    }

    /// The same call may succeed later
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Rest(e) => e.is_retryable(),
            Self::Transport(TransportError::Connect(_) | TransportError::WebSocket(_)) => true,
            _ => false,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
