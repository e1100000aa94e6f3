//! Guild member entity - a user viewed through one guild

use chrono::{DateTime, Utc};

use super::User;
use crate::payloads::{MemberPayload, UserPayload};
use crate::value_objects::Snowflake;

/// Guild member entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildMember {
    pub user: User,
    pub guild_id: Snowflake,
    pub nick: Option<String>,
    pub roles: Vec<Snowflake>,
    pub joined_at: Option<DateTime<Utc>>,
    pub deaf: bool,
    pub mute: bool,
}

impl GuildMember {
    /// Merge the member fields of an event with its user fields and guild id.
    ///
    /// Message payloads omit `member.user`, so the user always comes from the
    /// event's `author`.
    #[must_use]
    pub fn from_parts(member: &MemberPayload, user: &UserPayload, guild_id: Snowflake) -> Self {
        Self {
            user: User::from_payload(user),
            guild_id,
            nick: member.nick.clone(),
            roles: member.roles.clone(),
            joined_at: member
                .joined_at
                .as_deref()
                .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
                .map(|ts| ts.with_timezone(&Utc)),
            deaf: member.deaf,
            mute: member.mute,
        }
    }

    /// Get the user ID
    #[inline]
    #[must_use]
    pub fn user_id(&self) -> Snowflake {
        self.user.id
    }

    /// Nickname if set, otherwise the username
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.nick.as_deref().unwrap_or(&self.user.username)
    }

    /// Check if member has a specific role
    #[must_use]
    pub fn has_role(&self, role_id: Snowflake) -> bool {
        self.roles.contains(&role_id)
    }
}
