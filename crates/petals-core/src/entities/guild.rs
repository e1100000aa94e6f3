//! Guild entity - a community container of channels, members, and roles
//!
//! Channels and roles of a guild live in the cache, keyed by guild id.

use super::{Emoji, EmojiRef};
use crate::payloads::GuildPayload;
use crate::value_objects::Snowflake;

/// Guild entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    pub id: Snowflake,
    pub name: String,
    pub icon: Option<String>,
    pub owner_id: Option<Snowflake>,
    pub member_count: Option<u64>,
    pub unavailable: bool,
    /// Custom emoji of the guild
    pub emojis: Vec<Emoji>,
}

impl Guild {
    #[must_use]
    pub fn from_payload(payload: &GuildPayload) -> Self {
        Self {
            id: payload.id,
            name: payload.name.clone(),
            icon: payload.icon.clone(),
            owner_id: payload.owner_id,
            member_count: payload.member_count,
            unavailable: payload.unavailable,
            emojis: payload.emojis.iter().map(Emoji::from).collect(),
        }
    }

    /// Check if a user is the owner
    #[inline]
    #[must_use]
    pub fn is_owner(&self, user_id: Snowflake) -> bool {
        self.owner_id == Some(user_id)
    }

    /// Custom emoji by name, as a reaction reference
    #[must_use]
    pub fn emoji(&self, name: &str) -> Option<EmojiRef> {
        self.emojis
            .iter()
            .find(|emoji| emoji.name.as_deref() == Some(name))
            .and_then(Emoji::to_ref)
    }
}
