//! Message author - a guild member inside a guild, a plain user elsewhere

use super::{GuildMember, User};
use crate::value_objects::Snowflake;

/// Author of a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Author {
    Member(GuildMember),
    User(User),
}

impl Author {
    /// Id of the underlying user
    #[must_use]
    pub fn id(&self) -> Snowflake {
        self.user().id
    }

    /// The underlying user, whichever variant this is
    #[must_use]
    pub fn user(&self) -> &User {
        match self {
            Self::Member(member) => &member.user,
            Self::User(user) => user,
        }
    }

    #[must_use]
    pub fn as_member(&self) -> Option<&GuildMember> {
        match self {
            Self::Member(member) => Some(member),
            Self::User(_) => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_member(&self) -> bool {
        matches!(self, Self::Member(_))
    }
}
