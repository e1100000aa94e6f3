//! Transport collaborator
//!
//! A transport owns one socket for one shard: it performs the handshake,
//! keeps the heartbeat going, measures latency, and forwards frames in order.
//! Shards only ever construct, close, and query it.

mod error;
mod ws;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::events::GatewayEvent;

pub use error::{TransportError, TransportResult};
pub use ws::{WsTransport, WsTransportFactory};

/// Transport connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Socket opening or handshake in progress
    Connecting,
    /// Identified and heartbeating
    Connected,
    Disconnected,
}

/// What a transport is bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportParams {
    pub url: String,
    pub shard_id: u32,
    pub shard_count: u32,
}

/// One live gateway connection
pub trait Transport: Send + Sync {
    /// Close the connection with `code`; further calls are no-ops
    fn close(&self, code: u16);

    /// Round trip of the most recent acknowledged heartbeat
    fn latency(&self) -> Option<Duration>;

    fn state(&self) -> ConnectionState;
}

/// Builds transports for shards
pub trait TransportFactory: Send + Sync {
    /// Start a transport; the handshake continues in the background and
    /// frames are delivered on `events`.
    fn connect(
        &self,
        params: TransportParams,
        events: mpsc::Sender<GatewayEvent>,
    ) -> TransportResult<Arc<dyn Transport>>;
}
