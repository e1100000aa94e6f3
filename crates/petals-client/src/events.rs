//! Events delivered to the application

use std::sync::Arc;

use petals_core::{Channel, Guild, Snowflake, User};
use petals_gateway::DispatchEvent;

use crate::message::Message;

/// Everything the client reports to the application
#[derive(Debug, Clone)]
pub enum ClientEvent {
    // === Shard lifecycle ===
    /// A shard finished its handshake
    ShardReady { shard_id: u32 },

    /// A shard closed its transport on purpose
    ShardClose { shard_id: u32 },

    /// A shard lost its connection
    ShardDisconnected {
        shard_id: u32,
        code: Option<u16>,
        reconnect: bool,
    },

    // === Session ===
    Ready {
        shard_id: u32,
        user: Arc<User>,
        session_id: String,
    },

    // === Guilds ===
    GuildCreate(Arc<Guild>),
    GuildUpdate(Arc<Guild>),
    /// `unavailable` marks an outage rather than a removal
    GuildDelete { guild_id: Snowflake, unavailable: bool },

    // === Channels ===
    ChannelCreate(Arc<Channel>),
    ChannelUpdate(Arc<Channel>),
    ChannelDelete(Channel),

    // === Messages ===
    MessageCreate(Box<Message>),
    MessageUpdate(Box<Message>),
    MessageDelete {
        id: Snowflake,
        channel_id: Snowflake,
        guild_id: Option<Snowflake>,
    },

    /// Dispatch events without a typed mapping
    Unhandled { shard_id: u32, event: DispatchEvent },
}

impl ClientEvent {
    /// Event name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::ShardReady { .. } => "SHARD_READY",
            Self::ShardClose { .. } => "SHARD_CLOSE",
            Self::ShardDisconnected { .. } => "SHARD_DISCONNECTED",
            Self::Ready { .. } => "READY",
            Self::GuildCreate(_) => "GUILD_CREATE",
            Self::GuildUpdate(_) => "GUILD_UPDATE",
            Self::GuildDelete { .. } => "GUILD_DELETE",
            Self::ChannelCreate(_) => "CHANNEL_CREATE",
            Self::ChannelUpdate(_) => "CHANNEL_UPDATE",
            Self::ChannelDelete(_) => "CHANNEL_DELETE",
            Self::MessageCreate(_) => "MESSAGE_CREATE",
            Self::MessageUpdate(_) => "MESSAGE_UPDATE",
            Self::MessageDelete { .. } => "MESSAGE_DELETE",
            Self::Unhandled { .. } => "UNHANDLED",
        }
    }
}
