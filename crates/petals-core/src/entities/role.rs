//! Role entity - a named permission set within a guild

use crate::payloads::RolePayload;
use crate::value_objects::{Permissions, Snowflake};

/// Role entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    pub name: String,
    pub color: u32,
    pub hoist: bool,
    pub position: i32,
    pub permissions: Permissions,
    pub managed: bool,
    pub mentionable: bool,
}

impl Role {
    #[must_use]
    pub fn from_payload(payload: &RolePayload, guild_id: Snowflake) -> Self {
        Self {
            id: payload.id,
            guild_id,
            name: payload.name.clone(),
            color: payload.color,
            hoist: payload.hoist,
            position: payload.position,
            permissions: payload.permissions,
            managed: payload.managed,
            mentionable: payload.mentionable,
        }
    }

    /// The @everyone role shares its id with the guild
    #[inline]
    #[must_use]
    pub fn is_everyone(&self) -> bool {
        self.id == self.guild_id
    }

    #[must_use]
    pub fn mention(&self) -> String {
        if self.is_everyone() {
            "@everyone".to_string()
        } else {
            format!("<@&{}>", self.id)
        }
    }
}
