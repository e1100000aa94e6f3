//! Channel entity - guild channels, direct messages, and unresolved placeholders

use super::User;
use crate::payloads::ChannelPayload;
use crate::value_objects::Snowflake;

/// Channel kind, keyed by the wire type code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    GuildText,
    Dm,
    GuildVoice,
    GroupDm,
    GuildCategory,
    /// Announcement ("news") channel; messages can be crossposted
    GuildAnnouncement,
    GuildStore,
    /// Stand-in installed while the real channel is being fetched
    Unresolved,
    /// Any code this client does not model
    Other(u8),
}

impl ChannelKind {
    /// Map a wire type code
    #[must_use]
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::GuildText,
            1 => Self::Dm,
            2 => Self::GuildVoice,
            3 => Self::GroupDm,
            4 => Self::GuildCategory,
            5 => Self::GuildAnnouncement,
            6 => Self::GuildStore,
            other => Self::Other(other),
        }
    }

    /// Wire type code, if this kind has one
    #[must_use]
    pub fn code(self) -> Option<u8> {
        match self {
            Self::GuildText => Some(0),
            Self::Dm => Some(1),
            Self::GuildVoice => Some(2),
            Self::GroupDm => Some(3),
            Self::GuildCategory => Some(4),
            Self::GuildAnnouncement => Some(5),
            Self::GuildStore => Some(6),
            Self::Unresolved => None,
            Self::Other(code) => Some(code),
        }
    }
}

/// Channel entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: Snowflake,
    pub kind: ChannelKind,
    pub guild_id: Option<Snowflake>,
    pub name: Option<String>,
    pub topic: Option<String>,
    pub position: i32,
    pub parent_id: Option<Snowflake>,
    pub nsfw: bool,
    pub last_message_id: Option<Snowflake>,
    /// Direct-message participants, excluding the current user
    pub recipients: Vec<User>,
}

impl Channel {
    /// Transcribe a wire channel
    #[must_use]
    pub fn from_payload(payload: &ChannelPayload) -> Self {
        Self {
            id: payload.id,
            kind: ChannelKind::from_code(payload.kind),
            guild_id: payload.guild_id,
            name: payload.name.clone(),
            topic: payload.topic.clone(),
            position: payload.position.unwrap_or(0),
            parent_id: payload.parent_id,
            nsfw: payload.nsfw,
            last_message_id: payload.last_message_id,
            recipients: payload.recipients.iter().map(User::from_payload).collect(),
        }
    }

    /// Synthesize a direct-message channel with `recipient` as its sole participant
    #[must_use]
    pub fn dm(id: Snowflake, recipient: User) -> Self {
        Self {
            id,
            kind: ChannelKind::Dm,
            guild_id: None,
            name: None,
            topic: None,
            position: 0,
            parent_id: None,
            nsfw: false,
            last_message_id: None,
            recipients: vec![recipient],
        }
    }

    /// Provisional record for a guild channel that has not been fetched yet
    #[must_use]
    pub fn placeholder(id: Snowflake, guild_id: Option<Snowflake>) -> Self {
        Self {
            id,
            kind: ChannelKind::Unresolved,
            guild_id,
            name: None,
            topic: None,
            position: 0,
            parent_id: None,
            nsfw: false,
            last_message_id: None,
            recipients: Vec::new(),
        }
    }

    /// Check if messages in this channel can be crossposted
    #[inline]
    #[must_use]
    pub fn is_announcement(&self) -> bool {
        self.kind == ChannelKind::GuildAnnouncement
    }

    #[inline]
    #[must_use]
    pub fn is_dm(&self) -> bool {
        self.kind == ChannelKind::Dm
    }

    #[inline]
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.kind == ChannelKind::Unresolved
    }

    /// Check if this channel carries text messages
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(
            self.kind,
            ChannelKind::GuildText | ChannelKind::Dm | ChannelKind::GroupDm | ChannelKind::GuildAnnouncement
        )
    }

    /// The direct-message participant, if this is a DM
    #[must_use]
    pub fn recipient(&self) -> Option<&User> {
        if self.is_dm() {
            self.recipients.first()
        } else {
            None
        }
    }

    /// Mention string for message content
    #[must_use]
    pub fn mention(&self) -> String {
        format!("<#{}>", self.id)
    }
}
