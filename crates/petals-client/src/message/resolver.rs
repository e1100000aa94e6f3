//! Entity resolver
//!
//! Turns the ids in a message payload into typed references without ever
//! failing. A guild channel missing from the cache yields a placeholder that
//! a background fetch patches later. A DM channel missing from the cache is
//! synthesized from the author.

use std::sync::Arc;

use petals_core::{Author, Channel, Guild, GuildMember, MessagePayload, Snowflake, User};
use tracing::{debug, warn};

use super::model::ChannelCell;
use crate::context::ClientContext;

/// Resolves message references against the client caches
pub struct EntityResolver<'a> {
    ctx: &'a ClientContext,
}

impl<'a> EntityResolver<'a> {
    pub fn new(ctx: &'a ClientContext) -> Self {
        Self { ctx }
    }

    /// Cached guild; `None` means the message is treated as guild-less
    pub fn guild(&self, guild_id: Option<Snowflake>) -> Option<Arc<Guild>> {
        let guild_id = guild_id?;
        let guild = self.ctx.cache().guild(guild_id);
        if guild.is_none() {
            debug!(guild_id = %guild_id, "Guild not cached");
        }
        guild
    }

    /// Member view of the author inside a guild, else the plain user
    pub fn author(&self, payload: &MessagePayload, guild: Option<&Guild>) -> Author {
        match guild {
            Some(guild) => {
                let member = payload.member.clone().unwrap_or_default();
                Author::Member(GuildMember::from_parts(&member, &payload.author, guild.id))
            }
            None => Author::User(User::from_payload(&payload.author)),
        }
    }

    /// Channel cell for a message
    ///
    /// - guild present: the guild's cached channel, or a placeholder plus a fetch
    /// - guild id sent but guild not cached: a placeholder plus a fetch
    /// - no guild id: the author's DM channel, synthesized when missing or stale
    pub fn channel(
        &self,
        channel_id: Snowflake,
        guild_id: Option<Snowflake>,
        guild: Option<&Guild>,
        author: &Author,
    ) -> Arc<ChannelCell> {
        let cache = self.ctx.cache();

        if let Some(guild) = guild {
            if let Some(channel) = cache.guild_channel(guild.id, channel_id) {
                return ChannelCell::resolved(channel);
            }
            return self.pending(channel_id, Some(guild.id));
        }

        if guild_id.is_some() {
            // Never file a guild channel under the author's DM slot
            return self.pending(channel_id, guild_id);
        }

        let user = author.user().clone();
        let channel = cache.dm_channel_or_insert_with(user.id, channel_id, || {
            debug!(channel_id = %channel_id, user_id = %user.id, "Synthesizing DM channel");
            Channel::dm(channel_id, user)
        });
        ChannelCell::resolved(channel)
    }

    /// Placeholder cell and a background fetch that patches it
    fn pending(&self, channel_id: Snowflake, guild_id: Option<Snowflake>) -> Arc<ChannelCell> {
        let cell = ChannelCell::pending(Arc::new(Channel::placeholder(channel_id, guild_id)));

        let Some(runtime) = self.ctx.runtime() else {
            warn!(channel_id = %channel_id, "No runtime for channel fetch, keeping placeholder");
            cell.settle();
            return cell;
        };

        let http = self.ctx.http_shared();
        let cache = Arc::clone(self.ctx.cache());
        let target = Arc::clone(&cell);

        runtime.spawn(async move {
            match http.fetch_channel(channel_id).await {
                Ok(payload) => {
                    let channel = Channel::from_payload(&payload);
                    let shared = cache
                        .upsert_channel(channel.clone())
                        .unwrap_or_else(|| Arc::new(channel));
                    if target.patch(shared) {
                        debug!(channel_id = %channel_id, "Patched placeholder channel");
                    }
                }
                Err(e) => {
                    warn!(channel_id = %channel_id, error = %e, "Channel fetch failed, keeping placeholder");
                    target.settle();
                }
            }
        });

        cell
    }
}
