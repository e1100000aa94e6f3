//! Dispatch payloads that are not plain entity objects
//!
//! `GUILD_CREATE`, `CHANNEL_*`, and `MESSAGE_CREATE/UPDATE` carry the entity
//! payloads from `petals_core::payloads` directly.

use petals_core::{Snowflake, UserPayload};
use serde::{Deserialize, Serialize};

/// READY event data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyEvent {
    /// Gateway protocol version
    pub v: u8,
    /// The current identity
    pub user: UserPayload,
    pub session_id: String,
    #[serde(default)]
    pub guilds: Vec<UnavailableGuild>,
    /// `[shard_id, shard_count]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shard: Option<[u32; 2]>,
}

/// Guild stub sent in READY; full data follows in GUILD_CREATE
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnavailableGuild {
    pub id: Snowflake,
    #[serde(default)]
    pub unavailable: bool,
}

/// GUILD_DELETE event data; `unavailable` means an outage, not a removal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildDeleteEvent {
    pub id: Snowflake,
    #[serde(default)]
    pub unavailable: bool,
}

/// MESSAGE_DELETE event data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDeleteEvent {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
}
