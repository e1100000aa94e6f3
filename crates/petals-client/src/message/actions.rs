//! Message actions
//!
//! Each action builds its request and makes one call to the REST
//! collaborator. `edit` and `announce` check their preconditions first and
//! fail without a request when they do not hold.

use petals_core::{
    CreateMessage, DomainError, EditMessage, EmojiRef, MessageReference, ReactionQuery, Snowflake,
    User,
};
use tracing::{info, instrument};

use super::materializer::MessageMaterializer;
use super::model::Message;
use crate::error::ClientResult;

impl Message {
    /// React as the current identity
    #[instrument(skip(self, emoji), fields(message_id = %self.id))]
    pub async fn react(&self, emoji: impl Into<EmojiRef>) -> ClientResult<()> {
        let emoji = emoji.into();
        self.ctx
            .http()
            .add_reaction(self.channel_id, self.id, &emoji)
            .await?;
        Ok(())
    }

    /// Remove a reaction; `user_id` of `None` removes the current identity's
    #[instrument(skip(self, emoji), fields(message_id = %self.id))]
    pub async fn remove_reaction(
        &self,
        emoji: impl Into<EmojiRef>,
        user_id: Option<Snowflake>,
    ) -> ClientResult<()> {
        let emoji = emoji.into();
        self.ctx
            .http()
            .remove_user_reaction(self.channel_id, self.id, &emoji, user_id)
            .await?;
        Ok(())
    }

    /// Remove every reaction on the message
    #[instrument(skip(self), fields(message_id = %self.id))]
    pub async fn remove_all_reactions(&self) -> ClientResult<()> {
        self.ctx
            .http()
            .delete_reactions(self.channel_id, self.id, None)
            .await?;
        Ok(())
    }

    /// Remove every reaction made with one emoji
    #[instrument(skip(self, emoji), fields(message_id = %self.id))]
    pub async fn remove_emoji_reactions(&self, emoji: impl Into<EmojiRef>) -> ClientResult<()> {
        let emoji = emoji.into();
        self.ctx
            .http()
            .delete_reactions(self.channel_id, self.id, Some(&emoji))
            .await?;
        Ok(())
    }

    /// Users that reacted with `emoji`
    #[instrument(skip(self, emoji), fields(message_id = %self.id))]
    pub async fn find_reactions(
        &self,
        emoji: impl Into<EmojiRef>,
        query: ReactionQuery,
    ) -> ClientResult<Vec<User>> {
        let emoji = emoji.into();
        let users = self
            .ctx
            .http()
            .get_reactions(self.channel_id, self.id, &emoji, &query)
            .await?;
        Ok(users.iter().map(User::from_payload).collect())
    }

    /// Send a message in the same channel referencing this one
    #[instrument(skip(self, options), fields(message_id = %self.id))]
    pub async fn reply(&self, options: impl Into<CreateMessage>) -> ClientResult<Message> {
        let mut body: CreateMessage = options.into();
        body.message_reference = Some(MessageReference {
            message_id: self.id,
            guild_id: self.guild_id(),
        });

        let payload = self.ctx.http().send_message(self.channel_id, &body).await?;
        Ok(self.materialize(&payload))
    }

    #[instrument(skip(self), fields(message_id = %self.id))]
    pub async fn pin(&self) -> ClientResult<()> {
        self.ctx
            .http()
            .add_pinned_message(self.channel_id, self.id)
            .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(message_id = %self.id))]
    pub async fn unpin(&self) -> ClientResult<()> {
        self.ctx
            .http()
            .delete_pinned_message(self.channel_id, self.id)
            .await?;
        Ok(())
    }

    /// Crosspost to the followers of an announcement channel
    #[instrument(skip(self), fields(message_id = %self.id))]
    pub async fn announce(&self) -> ClientResult<Message> {
        if !self.channel().is_announcement() {
            return Err(DomainError::NotAnnouncementChannel.into());
        }

        let payload = self
            .ctx
            .http()
            .crosspost_message(self.channel_id, self.id)
            .await?;
        info!(channel_id = %self.channel_id, "Message announced");
        Ok(self.materialize(&payload))
    }

    #[instrument(skip(self), fields(message_id = %self.id))]
    pub async fn delete(&self) -> ClientResult<()> {
        self.ctx
            .http()
            .delete_message(self.channel_id, self.id)
            .await?;
        Ok(())
    }

    /// Edit a message sent by the current identity
    #[instrument(skip(self, options), fields(message_id = %self.id))]
    pub async fn edit(&self, options: impl Into<EditMessage>) -> ClientResult<Message> {
        let me = self
            .ctx
            .current_user_id()
            .ok_or(DomainError::IdentityUnknown)?;
        if me != self.author.id() {
            return Err(DomainError::NotMessageAuthor.into());
        }

        let body = options.into();
        let payload = self
            .ctx
            .http()
            .edit_message(self.channel_id, self.id, &body)
            .await?;
        Ok(self.materialize(&payload))
    }

    fn materialize(&self, payload: &petals_core::MessagePayload) -> Message {
        MessageMaterializer::new(self.ctx.clone()).materialize(payload)
    }
}
