//! Materialized message

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use petals_core::{Attachment, Author, Channel, Embed, FlagHandler, Guild, MessageType, Role, Snowflake};
use tokio::sync::watch;

use crate::context::ClientContext;

// ============================================================================
// ChannelCell
// ============================================================================

#[derive(Debug, Clone)]
struct CellState {
    channel: Arc<Channel>,
    /// No further patch will be accepted
    settled: bool,
}

/// The one mutable slot of a `Message`
///
/// Starts either resolved or holding a placeholder. A placeholder is replaced
/// at most once; after that the cell is settled for good. A failed fetch
/// settles the cell without replacing the placeholder.
pub struct ChannelCell {
    state: watch::Sender<CellState>,
}

impl ChannelCell {
    /// A cell whose channel is already known
    #[must_use]
    pub fn resolved(channel: Arc<Channel>) -> Arc<Self> {
        Arc::new(Self {
            state: watch::Sender::new(CellState { channel, settled: true }),
        })
    }

    /// A cell holding a placeholder until [`ChannelCell::patch`]
    #[must_use]
    pub fn pending(placeholder: Arc<Channel>) -> Arc<Self> {
        Arc::new(Self {
            state: watch::Sender::new(CellState {
                channel: placeholder,
                settled: false,
            }),
        })
    }

    /// Current channel; may be a placeholder
    pub fn get(&self) -> Arc<Channel> {
        Arc::clone(&self.state.borrow().channel)
    }

    /// Whether a patch may still arrive
    pub fn is_pending(&self) -> bool {
        !self.state.borrow().settled
    }

    /// Overwrite the placeholder. Returns `false` if the cell was already settled.
    pub fn patch(&self, channel: Arc<Channel>) -> bool {
        self.state.send_if_modified(|state| {
            if state.settled {
                return false;
            }
            state.channel = channel;
            state.settled = true;
            true
        })
    }

    /// Give up on the pending patch, keeping the placeholder
    pub fn settle(&self) {
        self.state.send_if_modified(|state| {
            if state.settled {
                return false;
            }
            state.settled = true;
            true
        });
    }

    /// Wait until the cell is settled, then return its channel
    pub async fn settled(&self) -> Arc<Channel> {
        let mut rx = self.state.subscribe();
        // The sender lives in `self`, so the wait cannot fail
        let _ = rx.wait_for(|state| state.settled).await;
        self.get()
    }
}

impl fmt::Debug for ChannelCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ChannelCell")
            .field("channel_id", &state.channel.id)
            .field("kind", &state.channel.kind)
            .field("settled", &state.settled)
            .finish()
    }
}

// ============================================================================
// Message
// ============================================================================

/// A message with its references resolved against the caches
///
/// Immutable except for the channel, which may be patched once after
/// construction when it was not cached (see [`Message::channel_cell`]).
#[derive(Clone)]
pub struct Message {
    pub(crate) ctx: Arc<ClientContext>,

    pub id: Snowflake,
    /// `None` for type codes outside the known set
    pub kind: Option<MessageType>,
    pub content: Option<String>,
    pub author: Author,
    pub channel_id: Snowflake,
    pub(crate) channel: Arc<ChannelCell>,
    pub guild: Option<Arc<Guild>>,
    pub attachments: Vec<Attachment>,
    pub embeds: Vec<Embed>,
    pub flags: FlagHandler,
    pub webhook_id: Option<Snowflake>,
    pub timestamp: Option<DateTime<Utc>>,
    pub edited_timestamp: Option<DateTime<Utc>>,
    pub pinned: bool,
    pub tts: bool,
    /// Mentioned user ids, in first-seen order without duplicates
    pub mentions: Vec<Snowflake>,
    /// Mentioned roles found in the guild's cache
    pub role_mentions: Vec<Arc<Role>>,
    pub referenced_message: Option<Box<Message>>,
}

impl Message {
    /// Channel as currently known; a placeholder until a pending fetch lands
    pub fn channel(&self) -> Arc<Channel> {
        self.channel.get()
    }

    pub fn channel_cell(&self) -> &Arc<ChannelCell> {
        &self.channel
    }

    #[inline]
    pub fn guild_id(&self) -> Option<Snowflake> {
        self.guild.as_ref().map(|guild| guild.id)
    }

    #[inline]
    pub fn is_dm(&self) -> bool {
        self.guild.is_none()
    }

    pub fn is_webhook(&self) -> bool {
        self.webhook_id.is_some()
    }

    /// Check whether the current identity sent this message
    pub fn is_own(&self) -> bool {
        self.ctx.current_user_id() == Some(self.author.id())
    }

    pub fn mentions_user(&self, user_id: Snowflake) -> bool {
        self.mentions.contains(&user_id)
    }

    /// Jump link in the web client
    pub fn url(&self) -> String {
        let scope = self
            .guild_id()
            .map_or_else(|| "@me".to_string(), |id| id.to_string());
        format!("https://discord.com/channels/{scope}/{}/{}", self.channel_id, self.id)
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("author", &self.author.id())
            .field("channel", &self.channel)
            .field("guild", &self.guild_id())
            .field("flags", &self.flags)
            .field("referenced_message", &self.referenced_message.as_ref().map(|m| m.id))
            .finish_non_exhaustive()
    }
}
