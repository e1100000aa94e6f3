//! Gateway events
//!
//! Dispatch event names, their non-entity payloads, and the lifecycle
//! notifications shards emit to the client.

mod event_types;
mod gateway_event;
mod payloads;

pub use event_types::EventType;
pub use gateway_event::{DispatchEvent, GatewayEvent};
pub use payloads::{GuildDeleteEvent, MessageDeleteEvent, ReadyEvent, UnavailableGuild};
