//! Transport error types

use thiserror::Error;

/// Transport error type
#[derive(Debug, Error)]
pub enum TransportError {
    /// Could not open the socket
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Socket-level failure after connecting
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Peer broke the handshake or frame contract
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No shard registered under this id
    #[error("Unknown shard: {0}")]
    UnknownShard(u32),
}

/// Transport result type
pub type TransportResult<T> = Result<T, TransportError>;
