//! Message materializer
//!
//! Single pass from a `MessagePayload` to a `Message`. Nothing here fails:
//! missing references become placeholders, unknown type codes become `None`,
//! malformed timestamps are dropped.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use petals_core::{
    Attachment, Embed, FlagHandler, MessagePayload, MessageType, Snowflake, MESSAGE_FLAGS,
};
use tracing::debug;

use super::model::Message;
use super::resolver::EntityResolver;
use crate::context::ClientContext;

/// Builds `Message`s from wire payloads
pub struct MessageMaterializer {
    ctx: Arc<ClientContext>,
}

impl MessageMaterializer {
    pub fn new(ctx: Arc<ClientContext>) -> Self {
        Self { ctx }
    }

    /// Materialize a message and its referenced messages up to the depth cap
    pub fn materialize(&self, payload: &MessagePayload) -> Message {
        self.materialize_at(payload, 0)
    }

    fn materialize_at(&self, payload: &MessagePayload, depth: usize) -> Message {
        let resolver = EntityResolver::new(&self.ctx);

        let guild = resolver.guild(payload.guild_id);
        let author = resolver.author(payload, guild.as_deref());
        let channel = resolver.channel(payload.channel_id, payload.guild_id, guild.as_deref(), &author);

        let role_mentions = guild
            .as_ref()
            .map(|guild| {
                payload
                    .mention_roles
                    .iter()
                    .filter_map(|role_id| self.ctx.cache().role(guild.id, *role_id))
                    .collect()
            })
            .unwrap_or_default();

        let referenced_message = payload.referenced_message.as_deref().and_then(|reference| {
            if depth >= self.ctx.max_reference_depth() {
                debug!(
                    message_id = %payload.id,
                    reference_id = %reference.id,
                    depth,
                    "Reference depth cap reached, dropping referenced message"
                );
                return None;
            }
            Some(Box::new(self.materialize_at(reference, depth + 1)))
        });

        Message {
            ctx: Arc::clone(&self.ctx),
            id: payload.id,
            kind: MessageType::from_code(payload.kind),
            content: payload.content.clone(),
            author,
            channel_id: payload.channel_id,
            channel,
            guild,
            attachments: payload.attachments.iter().map(Attachment::from).collect(),
            embeds: payload.embeds.iter().map(Embed::from).collect(),
            flags: FlagHandler::new(payload.flags, MESSAGE_FLAGS),
            webhook_id: payload.webhook_id,
            timestamp: parse_timestamp(payload.timestamp.as_deref()),
            edited_timestamp: parse_timestamp(payload.edited_timestamp.as_deref()),
            pinned: payload.pinned,
            tts: payload.tts,
            mentions: unique_ids(payload.mentions.iter().map(|user| user.id)),
            role_mentions,
            referenced_message,
        }
    }
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(e) => {
            debug!(timestamp = raw, error = %e, "Ignoring malformed timestamp");
            None
        }
    }
}

/// Ids in first-seen order, duplicates dropped
fn unique_ids(ids: impl Iterator<Item = Snowflake>) -> Vec<Snowflake> {
    let mut unique = Vec::new();
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}
