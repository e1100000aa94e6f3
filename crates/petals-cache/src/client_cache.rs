//! Process-wide entity cache shared by every shard
//!
//! - guilds by guild id
//! - guild channels by guild id, then channel id
//! - roles by guild id, then role id
//! - direct-message channels by the *recipient's* user id
//! - users by user id

use dashmap::DashMap;
use petals_core::{Channel, Guild, Role, Snowflake, User};
use std::sync::Arc;

use crate::store::MemoryStore;

/// Entity cache shared across shards
#[derive(Debug, Default)]
pub struct ClientCache {
    guilds: MemoryStore<Guild>,
    guild_channels: DashMap<Snowflake, MemoryStore<Channel>>,
    guild_roles: DashMap<Snowflake, MemoryStore<Role>>,
    dm_channels: MemoryStore<Channel>,
    users: MemoryStore<User>,
}

impl ClientCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    // =========================================================================
    // Guilds
    // =========================================================================

    pub fn guild(&self, guild_id: Snowflake) -> Option<Arc<Guild>> {
        self.guilds.get(guild_id)
    }

    /// Cache a guild together with its channels and roles
    pub fn insert_guild(&self, guild: Guild, channels: Vec<Channel>, roles: Vec<Role>) -> Arc<Guild> {
        let guild_id = guild.id;
        let guild = self.guilds.set(guild_id, guild);

        let channel_store = self.guild_channels.entry(guild_id).or_default();
        for channel in channels {
            channel_store.set(channel.id, channel);
        }
        drop(channel_store);

        let role_store = self.guild_roles.entry(guild_id).or_default();
        for role in roles {
            role_store.set(role.id, role);
        }
        drop(role_store);

        tracing::debug!(guild_id = %guild_id, "Guild cached");
        guild
    }

    /// Drop a guild and everything cached under it
    pub fn remove_guild(&self, guild_id: Snowflake) -> Option<Arc<Guild>> {
        self.guild_channels.remove(&guild_id);
        self.guild_roles.remove(&guild_id);
        let removed = self.guilds.remove(guild_id);
        if removed.is_some() {
            tracing::debug!(guild_id = %guild_id, "Guild evicted");
        }
        removed
    }

    pub fn guild_count(&self) -> usize {
        self.guilds.len()
    }

    // =========================================================================
    // Channels
    // =========================================================================

    /// Look up a channel inside a guild's channel set
    pub fn guild_channel(&self, guild_id: Snowflake, channel_id: Snowflake) -> Option<Arc<Channel>> {
        self.guild_channels
            .get(&guild_id)
            .and_then(|channels| channels.get(channel_id))
    }

    /// All cached channels of a guild
    pub fn guild_channels(&self, guild_id: Snowflake) -> Vec<Arc<Channel>> {
        self.guild_channels
            .get(&guild_id)
            .map(|channels| channels.values())
            .unwrap_or_default()
    }

    /// Direct-message channel with `user_id` as its recipient
    pub fn dm_channel(&self, user_id: Snowflake) -> Option<Arc<Channel>> {
        self.dm_channels.get(user_id)
    }

    /// Cached DM channel for `user_id` when it is `channel_id`, otherwise
    /// the one built by `make`, which replaces the entry.
    /// Every caller for the same user and channel gets the same instance.
    pub fn dm_channel_or_insert_with<F>(
        &self,
        user_id: Snowflake,
        channel_id: Snowflake,
        make: F,
    ) -> Arc<Channel>
    where
        F: FnOnce() -> Channel,
    {
        self.dm_channels
            .get_matching_or_insert_with(user_id, |cached| cached.id == channel_id, make)
    }

    /// Insert or replace a channel, routed by its kind.
    ///
    /// Guild channels land in their guild's set; DMs are keyed by recipient.
    /// Returns `None` when the channel has neither a guild nor a recipient.
    pub fn upsert_channel(&self, channel: Channel) -> Option<Arc<Channel>> {
        let channel = Arc::new(channel);
        if let Some(guild_id) = channel.guild_id {
            self.guild_channels
                .entry(guild_id)
                .or_default()
                .set_shared(channel.id, Arc::clone(&channel));
            return Some(channel);
        }

        let recipient = channel.recipient().map(|user| user.id)?;
        self.dm_channels.set_shared(recipient, Arc::clone(&channel));
        Some(channel)
    }

    /// Remove a channel from wherever it is cached
    pub fn remove_channel(&self, channel: &Channel) -> Option<Arc<Channel>> {
        match channel.guild_id {
            Some(guild_id) => self
                .guild_channels
                .get(&guild_id)
                .and_then(|channels| channels.remove(channel.id)),
            None => channel
                .recipient()
                .and_then(|user| self.dm_channels.remove(user.id)),
        }
    }

    // =========================================================================
    // Roles
    // =========================================================================

    pub fn role(&self, guild_id: Snowflake, role_id: Snowflake) -> Option<Arc<Role>> {
        self.guild_roles
            .get(&guild_id)
            .and_then(|roles| roles.get(role_id))
    }

    // =========================================================================
    // Users
    // =========================================================================

    pub fn user(&self, user_id: Snowflake) -> Option<Arc<User>> {
        self.users.get(user_id)
    }

    pub fn upsert_user(&self, user: User) -> Arc<User> {
        self.users.set(user.id, user)
    }
}
