//! REST collaborator port
//!
//! The client defines what it needs from the HTTP layer; `petals-client`
//! provides the reqwest-backed implementation and tests provide recording mocks.
//! Implementations own authentication, retries, and rate-limit bucketing.

use async_trait::async_trait;
use serde::Serialize;

use crate::entities::EmojiRef;
use crate::error::RestError;
use crate::payloads::{ChannelPayload, EmbedPayload, MessagePayload, UserPayload};
use crate::value_objects::Snowflake;

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

// ============================================================================
// Request bodies
// ============================================================================

/// Which mentions in the content are allowed to ping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AllowedMentions {
    /// Any of `roles`, `users`, `everyone`
    pub parse: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<Snowflake>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<Snowflake>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replied_user: Option<bool>,
}

impl AllowedMentions {
    /// Suppress every ping
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }
}

/// Reference that turns a new message into a reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageReference {
    pub message_id: Snowflake,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
}

/// Body of `POST /channels/{id}/messages`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub tts: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<EmbedPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_mentions: Option<AllowedMentions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_reference: Option<MessageReference>,
    /// Echoed back on the created message to confirm delivery
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

impl From<&str> for CreateMessage {
    fn from(content: &str) -> Self {
        Self {
            content: Some(content.to_string()),
            ..Self::default()
        }
    }
}

impl From<String> for CreateMessage {
    fn from(content: String) -> Self {
        Self {
            content: Some(content),
            ..Self::default()
        }
    }
}

/// Body of `PATCH /channels/{id}/messages/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EditMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<EmbedPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_mentions: Option<AllowedMentions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

impl From<&str> for EditMessage {
    fn from(content: &str) -> Self {
        Self {
            content: Some(content.to_string()),
            ..Self::default()
        }
    }
}

impl From<String> for EditMessage {
    fn from(content: String) -> Self {
        Self {
            content: Some(content),
            ..Self::default()
        }
    }
}

/// Pagination for `GET .../reactions/{emoji}`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReactionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Snowflake>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Snowflake>,
    /// 1-100, server default 25
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u8>,
}

// ============================================================================
// RestClient
// ============================================================================

#[async_trait]
pub trait RestClient: Send + Sync {
    /// Fetch a channel by id
    async fn fetch_channel(&self, channel_id: Snowflake) -> RestResult<ChannelPayload>;

    /// Post a new message
    async fn send_message(
        &self,
        channel_id: Snowflake,
        body: &CreateMessage,
    ) -> RestResult<MessagePayload>;

    /// Edit a message sent by the current identity
    async fn edit_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        body: &EditMessage,
    ) -> RestResult<MessagePayload>;

    async fn delete_message(&self, channel_id: Snowflake, message_id: Snowflake) -> RestResult<()>;

    /// Publish a message in an announcement channel to its followers
    async fn crosspost_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> RestResult<MessagePayload>;

    /// React as the current identity
    async fn add_reaction(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &EmojiRef,
    ) -> RestResult<()>;

    /// Remove one user's reaction; `None` means the current identity
    async fn remove_user_reaction(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &EmojiRef,
        user_id: Option<Snowflake>,
    ) -> RestResult<()>;

    /// Remove all reactions, or all reactions for one emoji
    async fn delete_reactions(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: Option<&EmojiRef>,
    ) -> RestResult<()>;

    /// Users that reacted with `emoji`
    async fn get_reactions(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &EmojiRef,
        query: &ReactionQuery,
    ) -> RestResult<Vec<UserPayload>>;

    async fn add_pinned_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> RestResult<()>;

    async fn delete_pinned_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> RestResult<()>;
}
