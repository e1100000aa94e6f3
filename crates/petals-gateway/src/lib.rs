//! # petals-gateway
//!
//! Gateway client: wire protocol, WebSocket transport, and shard lifecycle.

pub mod events;
pub mod protocol;
pub mod shard;
pub mod transport;

pub use events::{DispatchEvent, EventType, GatewayEvent};
pub use shard::{Shard, ShardManager, ShardSettings, ShardState};
pub use transport::{
    ConnectionState, Transport, TransportError, TransportFactory, TransportParams, TransportResult,
    WsTransport, WsTransportFactory,
};
