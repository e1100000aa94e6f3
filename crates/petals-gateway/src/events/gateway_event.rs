//! Events delivered from shards to the owning client

use serde_json::Value;

use super::EventType;

/// One dispatch frame, in shard order
#[derive(Debug, Clone)]
pub struct DispatchEvent {
    pub event_type: EventType,
    pub sequence: Option<u64>,
    pub data: Value,
}

/// Everything a shard or its transport reports to the client
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    /// Handshake finished; the transport is connected
    ShardConnected { shard_id: u32 },

    /// The shard closed its transport on purpose (restart or shutdown)
    ShardClose { shard_id: u32 },

    /// The connection dropped without the shard asking for it
    ShardDisconnected {
        shard_id: u32,
        /// Close code from the peer, if a close frame arrived
        code: Option<u16>,
        /// Whether a fresh connection may succeed
        reconnect: bool,
    },

    Dispatch { shard_id: u32, event: DispatchEvent },
}

impl GatewayEvent {
    #[must_use]
    pub fn shard_id(&self) -> u32 {
        match self {
            Self::ShardConnected { shard_id }
            | Self::ShardClose { shard_id }
            | Self::ShardDisconnected { shard_id, .. }
            | Self::Dispatch { shard_id, .. } => *shard_id,
        }
    }
}
