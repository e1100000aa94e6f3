//! Test fixtures and payload builders
//!
//! Payloads are built as JSON first so they go through the same
//! deserialization path as gateway and REST data.

use std::sync::atomic::{AtomicI64, Ordering};

use anyhow::Result;
use petals_core::{ChannelPayload, GuildPayload, MessagePayload, RolePayload, Snowflake, UserPayload};
use serde_json::{json, Value};

/// Counter for unique ids
static COUNTER: AtomicI64 = AtomicI64::new(1_000);

/// Get a unique snowflake for test data
pub fn unique_id() -> Snowflake {
    Snowflake::new(COUNTER.fetch_add(1, Ordering::SeqCst))
}

// === Channel type codes ===

pub const GUILD_TEXT: u8 = 0;
pub const GUILD_ANNOUNCEMENT: u8 = 5;

// ============================================================================
// Entity payloads
// ============================================================================

pub fn user_json(id: Snowflake, username: &str) -> Value {
    json!({
        "id": id.to_string(),
        "username": username,
        "discriminator": "0001",
        "avatar": null,
        "bot": false
    })
}

pub fn user_payload(id: Snowflake, username: &str) -> Result<UserPayload> {
    Ok(serde_json::from_value(user_json(id, username))?)
}

pub fn channel_json(id: Snowflake, guild_id: Option<Snowflake>, kind: u8, name: &str) -> Value {
    let mut value = json!({
        "id": id.to_string(),
        "type": kind,
        "name": name,
        "position": 0
    });
    if let Some(guild_id) = guild_id {
        value["guild_id"] = json!(guild_id.to_string());
    }
    value
}

pub fn channel_payload(
    id: Snowflake,
    guild_id: Option<Snowflake>,
    kind: u8,
    name: &str,
) -> Result<ChannelPayload> {
    Ok(serde_json::from_value(channel_json(id, guild_id, kind, name))?)
}

pub fn role_json(id: Snowflake, name: &str) -> Value {
    json!({
        "id": id.to_string(),
        "name": name,
        "color": 0,
        "hoist": false,
        "position": 1,
        "permissions": "0",
        "managed": false,
        "mentionable": true
    })
}

pub fn role_payload(id: Snowflake, name: &str) -> Result<RolePayload> {
    Ok(serde_json::from_value(role_json(id, name))?)
}

/// GUILD_CREATE data; channels in a guild payload carry no guild id
pub fn guild_json(id: Snowflake, channels: &[Value], roles: &[Value]) -> Value {
    json!({
        "id": id.to_string(),
        "name": format!("guild-{id}"),
        "owner_id": "1",
        "channels": channels,
        "roles": roles,
        "member_count": 2
    })
}

pub fn guild_payload(id: Snowflake, channels: &[Value], roles: &[Value]) -> Result<GuildPayload> {
    Ok(serde_json::from_value(guild_json(id, channels, roles))?)
}

/// READY data for the given identity
pub fn ready_json(user_id: Snowflake, shard: [u32; 2]) -> Value {
    json!({
        "v": 8,
        "user": {
            "id": user_id.to_string(),
            "username": "petals-bot",
            "discriminator": "0000",
            "bot": true
        },
        "session_id": format!("session-{user_id}"),
        "guilds": [],
        "shard": shard
    })
}

// ============================================================================
// Messages
// ============================================================================

/// Message payload builder
#[derive(Debug, Clone)]
pub struct MessageFixture {
    value: Value,
}

impl MessageFixture {
    pub fn new(id: Snowflake, channel_id: Snowflake, author_id: Snowflake) -> Self {
        Self {
            value: json!({
                "id": id.to_string(),
                "type": 0,
                "content": "hello",
                "channel_id": channel_id.to_string(),
                "author": user_json(author_id, "author"),
                "attachments": [],
                "embeds": [],
                "flags": 0,
                "timestamp": "2021-03-01T10:00:00.000000+00:00",
                "edited_timestamp": null,
                "pinned": false,
                "tts": false,
                "mentions": [],
                "mention_roles": []
            }),
        }
    }

    /// Place the message in a guild, with member data for the author
    pub fn in_guild(mut self, guild_id: Snowflake) -> Self {
        self.value["guild_id"] = json!(guild_id.to_string());
        self.value["member"] = json!({
            "nick": "petal",
            "roles": [],
            "joined_at": "2020-12-01T00:00:00+00:00",
            "deaf": false,
            "mute": false
        });
        self
    }

    pub fn kind(mut self, code: u8) -> Self {
        self.value["type"] = json!(code);
        self
    }

    pub fn content(mut self, content: &str) -> Self {
        self.value["content"] = json!(content);
        self
    }

    pub fn flags(mut self, flags: u64) -> Self {
        self.value["flags"] = json!(flags);
        self
    }

    pub fn edited_at(mut self, timestamp: &str) -> Self {
        self.value["edited_timestamp"] = json!(timestamp);
        self
    }

    pub fn webhook(mut self, webhook_id: Snowflake) -> Self {
        self.value["webhook_id"] = json!(webhook_id.to_string());
        self
    }

    pub fn attachment(mut self, id: Snowflake, filename: &str) -> Self {
        push(
            &mut self.value["attachments"],
            json!({
                "id": id.to_string(),
                "filename": filename,
                "url": format!("https://cdn.test/{filename}"),
                "proxy_url": format!("https://media.test/{filename}"),
                "size": 1024
            }),
        );
        self
    }

    pub fn embed(mut self, title: &str) -> Self {
        push(&mut self.value["embeds"], json!({"type": "rich", "title": title}));
        self
    }

    pub fn mention(mut self, user_id: Snowflake) -> Self {
        push(&mut self.value["mentions"], user_json(user_id, "mentioned"));
        self
    }

    pub fn mention_role(mut self, role_id: Snowflake) -> Self {
        push(&mut self.value["mention_roles"], json!(role_id.to_string()));
        self
    }

    pub fn referencing(mut self, reference: MessageFixture) -> Self {
        self.value["referenced_message"] = reference.value;
        self
    }

    pub fn json(&self) -> Value {
        self.value.clone()
    }

    pub fn build(&self) -> Result<MessagePayload> {
        Ok(serde_json::from_value(self.value.clone())?)
    }
}

fn push(target: &mut Value, item: Value) {
    if let Value::Array(items) = target {
        items.push(item);
    }
}
