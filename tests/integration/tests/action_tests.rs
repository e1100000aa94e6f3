//! Message action tests
//!
//! Run with: cargo test -p integration-tests --test action_tests

use std::sync::Arc;

use integration_tests::*;
use petals_client::{ClientContext, ClientError, Message, MessageMaterializer};
use petals_core::{
    Channel, CreateMessage, DomainError, EditMessage, EmojiRef, Guild, MessageReference,
    MessageType, ReactionQuery, Snowflake, User,
};

struct Setup {
    rest: Arc<MockRestClient>,
    ctx: Arc<ClientContext>,
    self_id: Snowflake,
}

impl Setup {
    /// Context whose identity is known
    fn signed_in() -> Self {
        let self_id = unique_id();
        let rest = MockRestClient::new(self_id);
        let ctx = test_context(rest.clone());
        ctx.set_current_user(User::from_payload(&user_payload(self_id, "petals-bot").unwrap()));
        Self { rest, ctx, self_id }
    }

    /// Context before READY
    fn anonymous() -> Self {
        let self_id = unique_id();
        let rest = MockRestClient::new(self_id);
        let ctx = test_context(rest.clone());
        Self { rest, ctx, self_id }
    }

    /// Cache a guild with one channel of the given kind
    fn guild_with_channel(&self, kind: u8) -> (Snowflake, Snowflake) {
        let (guild_id, channel_id) = (unique_id(), unique_id());
        let guild = guild_payload(guild_id, &[], &[]).unwrap();
        let channel = channel_payload(channel_id, Some(guild_id), kind, "room").unwrap();
        self.ctx.cache().insert_guild(
            Guild::from_payload(&guild),
            vec![Channel::from_payload(&channel)],
            Vec::new(),
        );
        (guild_id, channel_id)
    }

    fn materialize(&self, fixture: MessageFixture) -> Message {
        MessageMaterializer::new(self.ctx.clone()).materialize(&fixture.build().unwrap())
    }
}

fn assert_precondition(err: &ClientError, expected: &DomainError) {
    assert!(err.is_precondition(), "expected a precondition failure, got {err:?}");
    assert!(matches!(err, ClientError::Domain(_)), "got {err:?}");
    assert_eq!(err.code(), expected.code());
}

// ============================================================================
// edit
// ============================================================================

#[tokio::test]
async fn test_edit_by_non_author_fails_without_request() {
    let setup = Setup::signed_in();
    let message = setup.materialize(MessageFixture::new(unique_id(), unique_id(), unique_id()));

    let err = message.edit("changed").await.unwrap_err();

    assert_precondition(&err, &DomainError::NotMessageAuthor);
    assert_eq!(setup.rest.call_count(), 0);
}

#[tokio::test]
async fn test_edit_before_identity_is_known_fails_without_request() {
    let setup = Setup::anonymous();
    let message = setup.materialize(MessageFixture::new(unique_id(), unique_id(), setup.self_id));

    let err = message.edit("changed").await.unwrap_err();

    assert_precondition(&err, &DomainError::IdentityUnknown);
    assert_eq!(setup.rest.call_count(), 0);
}

#[tokio::test]
async fn test_edit_own_message_makes_one_request() {
    let setup = Setup::signed_in();
    let (message_id, channel_id) = (unique_id(), unique_id());
    let message = setup.materialize(MessageFixture::new(message_id, channel_id, setup.self_id));

    let body = EditMessage {
        content: Some("changed".to_string()),
        flags: Some(1 << 2),
        ..EditMessage::default()
    };
    let edited = message.edit(body.clone()).await.unwrap();

    assert_eq!(
        setup.rest.calls(),
        vec![RestCall::EditMessage { channel_id, message_id, body }]
    );
    assert_eq!(edited.id, message_id);
    assert_eq!(edited.content.as_deref(), Some("changed"));
    assert!(edited.flags.has("SUPPRESS_EMBEDS"));
    assert!(edited.edited_timestamp.is_some());
    assert!(edited.is_own());
}

// ============================================================================
// announce
// ============================================================================

#[tokio::test]
async fn test_announce_outside_announcement_channel_fails_without_request() {
    let setup = Setup::signed_in();
    let (guild_id, channel_id) = setup.guild_with_channel(GUILD_TEXT);
    let message = setup.materialize(
        MessageFixture::new(unique_id(), channel_id, unique_id()).in_guild(guild_id),
    );

    let err = message.announce().await.unwrap_err();

    assert_precondition(&err, &DomainError::NotAnnouncementChannel);
    assert_eq!(setup.rest.call_count(), 0);
}

#[tokio::test]
async fn test_announce_in_dm_fails_without_request() {
    let setup = Setup::signed_in();
    let message = setup.materialize(MessageFixture::new(unique_id(), unique_id(), unique_id()));

    let err = message.announce().await.unwrap_err();

    assert_precondition(&err, &DomainError::NotAnnouncementChannel);
    assert_eq!(setup.rest.call_count(), 0);
}

#[tokio::test]
async fn test_announce_in_announcement_channel_crossposts_once() {
    let setup = Setup::signed_in();
    let (guild_id, channel_id) = setup.guild_with_channel(GUILD_ANNOUNCEMENT);
    let message_id = unique_id();
    let message = setup.materialize(
        MessageFixture::new(message_id, channel_id, unique_id()).in_guild(guild_id),
    );

    let announced = message.announce().await.unwrap();

    assert_eq!(
        setup.rest.calls(),
        vec![RestCall::Crosspost { channel_id, message_id }]
    );
    assert!(announced.flags.has("CROSSPOSTED"));
}

#[tokio::test]
async fn test_announce_on_placeholder_channel_fails() {
    let setup = Setup::signed_in();
    let (guild_id, _) = setup.guild_with_channel(GUILD_TEXT);

    // Channel not cached yet: the placeholder is not announcement-capable
    let channel_id = unique_id();
    let message = setup.materialize(
        MessageFixture::new(unique_id(), channel_id, unique_id()).in_guild(guild_id),
    );
    assert!(message.channel().is_placeholder());

    let err = message.announce().await.unwrap_err();
    assert_precondition(&err, &DomainError::NotAnnouncementChannel);
    assert!(!setup
        .rest
        .calls()
        .iter()
        .any(|call| matches!(call, RestCall::Crosspost { .. })));
}

// ============================================================================
// reply
// ============================================================================

#[tokio::test]
async fn test_reply_references_message_and_guild() {
    let setup = Setup::signed_in();
    let (guild_id, channel_id) = setup.guild_with_channel(GUILD_TEXT);
    let message_id = unique_id();
    let message = setup.materialize(
        MessageFixture::new(message_id, channel_id, unique_id()).in_guild(guild_id),
    );

    let reply = message.reply("pong").await.unwrap();

    let expected = CreateMessage {
        content: Some("pong".to_string()),
        message_reference: Some(MessageReference {
            message_id,
            guild_id: Some(guild_id),
        }),
        ..CreateMessage::default()
    };
    assert_eq!(
        setup.rest.calls(),
        vec![RestCall::SendMessage { channel_id, body: expected }]
    );

    assert_eq!(reply.kind, Some(MessageType::Reply));
    assert_eq!(reply.channel_id, channel_id);
    assert_eq!(reply.guild_id(), Some(guild_id));
    assert_eq!(reply.author.id(), setup.self_id);
}

#[tokio::test]
async fn test_reply_in_dm_omits_guild() {
    let setup = Setup::signed_in();
    let (message_id, channel_id) = (unique_id(), unique_id());
    let message = setup.materialize(MessageFixture::new(message_id, channel_id, unique_id()));

    message.reply("pong").await.unwrap();

    match &setup.rest.calls()[..] {
        [RestCall::SendMessage { body, .. }] => {
            assert_eq!(
                body.message_reference,
                Some(MessageReference { message_id, guild_id: None })
            );
        }
        other => panic!("unexpected calls: {other:?}"),
    }
}

// ============================================================================
// Reactions, pins, delete
// ============================================================================

#[tokio::test]
async fn test_reaction_actions_address_the_message() {
    let setup = Setup::signed_in();
    let (message_id, channel_id) = (unique_id(), unique_id());
    let message = setup.materialize(MessageFixture::new(message_id, channel_id, unique_id()));
    let someone = unique_id();
    let custom_id = unique_id();

    message.react("🌸").await.unwrap();
    message.react(format!("<:petal:{custom_id}>")).await.unwrap();
    message.remove_reaction("🌸", None).await.unwrap();
    message.remove_reaction("🌸", Some(someone)).await.unwrap();
    message.remove_emoji_reactions("🌸").await.unwrap();
    message.remove_all_reactions().await.unwrap();

    let blossom = EmojiRef::Unicode("🌸".to_string());
    assert_eq!(
        setup.rest.calls(),
        vec![
            RestCall::AddReaction { channel_id, message_id, emoji: blossom.clone() },
            RestCall::AddReaction {
                channel_id,
                message_id,
                emoji: EmojiRef::Custom { name: "petal".to_string(), id: custom_id },
            },
            RestCall::RemoveUserReaction {
                channel_id,
                message_id,
                emoji: blossom.clone(),
                user_id: None,
            },
            RestCall::RemoveUserReaction {
                channel_id,
                message_id,
                emoji: blossom.clone(),
                user_id: Some(someone),
            },
            RestCall::DeleteReactions { channel_id, message_id, emoji: Some(blossom) },
            RestCall::DeleteReactions { channel_id, message_id, emoji: None },
        ]
    );
}

#[tokio::test]
async fn test_find_reactions_returns_users() {
    let setup = Setup::signed_in();
    let (alice, bob) = (unique_id(), unique_id());
    setup.rest.with_reaction_users(vec![
        user_payload(alice, "alice").unwrap(),
        user_payload(bob, "bob").unwrap(),
    ]);
    let message = setup.materialize(MessageFixture::new(unique_id(), unique_id(), unique_id()));

    let query = ReactionQuery { limit: Some(2), ..ReactionQuery::default() };
    let users = message.find_reactions("🌸", query).await.unwrap();

    let names: Vec<_> = users.iter().map(|user| (user.id, user.username.as_str())).collect();
    assert_eq!(names, vec![(alice, "alice"), (bob, "bob")]);
    assert!(matches!(
        &setup.rest.calls()[..],
        [RestCall::GetReactions { query: q, .. }] if *q == query
    ));
}

#[tokio::test]
async fn test_pin_unpin_delete() {
    let setup = Setup::signed_in();
    let (message_id, channel_id) = (unique_id(), unique_id());
    let message = setup.materialize(MessageFixture::new(message_id, channel_id, unique_id()));

    message.pin().await.unwrap();
    message.unpin().await.unwrap();
    message.delete().await.unwrap();

    assert_eq!(
        setup.rest.calls(),
        vec![
            RestCall::AddPin { channel_id, message_id },
            RestCall::DeletePin { channel_id, message_id },
            RestCall::DeleteMessage { channel_id, message_id },
        ]
    );
}

#[tokio::test]
async fn test_rest_failure_is_not_a_precondition() {
    let setup = Setup::signed_in();
    setup.rest.fail_with(403);
    let message = setup.materialize(MessageFixture::new(unique_id(), unique_id(), unique_id()));

    let err = message.pin().await.unwrap_err();

    assert!(!err.is_precondition());
    assert!(!err.is_retryable());
    assert!(matches!(err, ClientError::Rest(ref rest) if rest.status() == Some(403)));
    assert_eq!(setup.rest.call_count(), 1);
}
