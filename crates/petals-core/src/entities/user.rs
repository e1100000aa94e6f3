//! User entity - an account as seen outside any guild

use crate::payloads::UserPayload;
use crate::value_objects::Snowflake;

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    pub discriminator: String,
    pub avatar: Option<String>,
    pub bot: bool,
    pub system: bool,
}

impl User {
    /// Transcribe a wire user
    #[must_use]
    pub fn from_payload(payload: &UserPayload) -> Self {
        Self {
            id: payload.id,
            username: payload.username.clone(),
            discriminator: payload.discriminator.clone(),
            avatar: payload.avatar.clone(),
            bot: payload.bot,
            system: payload.system,
        }
    }

    /// `username#discriminator`
    #[must_use]
    pub fn tag(&self) -> String {
        format!("{}#{}", self.username, self.discriminator)
    }

    /// Mention string for message content
    #[must_use]
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}
