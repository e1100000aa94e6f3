//! Message materialization tests
//!
//! Run with: cargo test -p integration-tests --test materializer_tests

use std::sync::Arc;

use integration_tests::*;
use petals_client::{ClientContext, MessageMaterializer};
use petals_core::{Author, Channel, ChannelKind, Guild, MessageType, Role, Snowflake};

/// Cache a guild holding one text channel and one role
fn seed_guild(ctx: &ClientContext, guild_id: Snowflake, channel_id: Snowflake, role_id: Snowflake) {
    let guild = guild_payload(guild_id, &[], &[]).unwrap();
    let channel = channel_payload(channel_id, Some(guild_id), GUILD_TEXT, "general").unwrap();
    let role = role_payload(role_id, "gardeners").unwrap();

    ctx.cache().insert_guild(
        Guild::from_payload(&guild),
        vec![Channel::from_payload(&channel)],
        vec![Role::from_payload(&role, guild_id)],
    );
}

// ============================================================================
// Guild and DM branches
// ============================================================================

#[tokio::test]
async fn test_guild_message_has_member_author_and_guild_channel() {
    init_tracing();
    let rest = MockRestClient::new(unique_id());
    let ctx = test_context(rest.clone());
    let (guild_id, channel_id, role_id) = (unique_id(), unique_id(), unique_id());
    seed_guild(&ctx, guild_id, channel_id, role_id);

    let author_id = unique_id();
    let payload = MessageFixture::new(unique_id(), channel_id, author_id)
        .in_guild(guild_id)
        .build()
        .unwrap();
    let message = MessageMaterializer::new(ctx.clone()).materialize(&payload);

    assert_eq!(message.guild_id(), Some(guild_id));
    match &message.author {
        Author::Member(member) => {
            assert_eq!(member.user_id(), author_id);
            assert_eq!(member.guild_id, guild_id);
            assert_eq!(member.display_name(), "petal");
            assert!(member.joined_at.is_some());
        }
        Author::User(_) => panic!("guild message must have a member author"),
    }

    let channel = message.channel();
    assert_eq!(channel.id, channel_id);
    assert_eq!(channel.guild_id, Some(guild_id));
    assert!(!message.channel_cell().is_pending());
    assert!(Arc::ptr_eq(&channel, &ctx.cache().guild_channel(guild_id, channel_id).unwrap()));

    // Cache hit, no fetch
    assert_eq!(rest.call_count(), 0);
}

#[tokio::test]
async fn test_dm_message_has_user_author_and_synthesized_channel() {
    let rest = MockRestClient::new(unique_id());
    let ctx = test_context(rest.clone());

    let (channel_id, author_id) = (unique_id(), unique_id());
    let payload = MessageFixture::new(unique_id(), channel_id, author_id)
        .build()
        .unwrap();
    let message = MessageMaterializer::new(ctx.clone()).materialize(&payload);

    assert!(message.is_dm());
    assert!(matches!(message.author, Author::User(ref user) if user.id == author_id));

    let channel = message.channel();
    assert_eq!(channel.kind, ChannelKind::Dm);
    assert_eq!(channel.id, channel_id);
    assert_eq!(channel.recipient().map(|user| user.id), Some(author_id));

    let cached = ctx.cache().dm_channel(author_id).unwrap();
    assert!(Arc::ptr_eq(&channel, &cached));
    assert_eq!(rest.call_count(), 0);
}

#[tokio::test]
async fn test_dm_synthesis_is_idempotent() {
    let ctx = test_context(MockRestClient::new(unique_id()));
    let materializer = MessageMaterializer::new(ctx.clone());

    let (channel_id, author_id) = (unique_id(), unique_id());
    let first = materializer.materialize(
        &MessageFixture::new(unique_id(), channel_id, author_id).build().unwrap(),
    );
    let second = materializer.materialize(
        &MessageFixture::new(unique_id(), channel_id, author_id).build().unwrap(),
    );

    assert!(Arc::ptr_eq(&first.channel(), &second.channel()));
}

#[tokio::test]
async fn test_dm_channel_follows_message_channel() {
    let ctx = test_context(MockRestClient::new(unique_id()));
    let materializer = MessageMaterializer::new(ctx.clone());
    let author_id = unique_id();
    let (first_channel, second_channel) = (unique_id(), unique_id());

    let first = materializer.materialize(
        &MessageFixture::new(unique_id(), first_channel, author_id).build().unwrap(),
    );
    let second = materializer.materialize(
        &MessageFixture::new(unique_id(), second_channel, author_id).build().unwrap(),
    );

    assert_eq!(first.channel().id, first_channel);
    assert_eq!(second.channel().id, second_channel);
    assert_eq!(second.channel().kind, ChannelKind::Dm);
    // Last writer owns the author's slot
    assert_eq!(ctx.cache().dm_channel(author_id).map(|c| c.id), Some(second_channel));
}

// ============================================================================
// Placeholder patching
// ============================================================================

#[tokio::test]
async fn test_uncached_guild_channel_is_patched_after_fetch() {
    let rest = MockRestClient::new(unique_id());
    let ctx = test_context(rest.clone());
    let (guild_id, role_id) = (unique_id(), unique_id());
    seed_guild(&ctx, guild_id, unique_id(), role_id);

    let channel_id = unique_id();
    rest.with_channel(channel_payload(channel_id, Some(guild_id), GUILD_ANNOUNCEMENT, "news").unwrap());

    let payload = MessageFixture::new(unique_id(), channel_id, unique_id())
        .in_guild(guild_id)
        .build()
        .unwrap();
    let message = MessageMaterializer::new(ctx.clone()).materialize(&payload);

    // Construction finished before the fetch ran
    let placeholder = message.channel();
    assert!(placeholder.is_placeholder());
    assert_eq!(placeholder.id, channel_id);
    assert_eq!(placeholder.guild_id, Some(guild_id));
    assert!(!placeholder.is_announcement());
    assert!(message.channel_cell().is_pending());

    let patched = message.channel_cell().settled().await;
    assert_eq!(patched.kind, ChannelKind::GuildAnnouncement);
    assert_eq!(patched.name.as_deref(), Some("news"));
    assert_eq!(*message.channel(), *patched);

    // Clones share the cell
    let copy = message.clone();
    assert!(copy.channel().is_announcement());

    // The fetched channel is now cached for later messages
    assert!(ctx.cache().guild_channel(guild_id, channel_id).is_some());
    assert_eq!(rest.calls(), vec![RestCall::FetchChannel(channel_id)]);
}

#[tokio::test]
async fn test_failed_fetch_keeps_placeholder() {
    let rest = MockRestClient::new(unique_id());
    let ctx = test_context(rest.clone());
    let guild_id = unique_id();
    seed_guild(&ctx, guild_id, unique_id(), unique_id());

    let channel_id = unique_id();
    let payload = MessageFixture::new(unique_id(), channel_id, unique_id())
        .in_guild(guild_id)
        .build()
        .unwrap();
    let message = MessageMaterializer::new(ctx.clone()).materialize(&payload);

    let channel = message.channel_cell().settled().await;
    assert!(channel.is_placeholder());
    assert!(!message.channel_cell().is_pending());
    assert_eq!(rest.call_count(), 1);
}

#[tokio::test]
async fn test_uncached_guild_is_not_filed_as_dm() {
    let rest = MockRestClient::new(unique_id());
    let ctx = test_context(rest.clone());

    let (guild_id, channel_id, author_id) = (unique_id(), unique_id(), unique_id());
    rest.with_channel(channel_payload(channel_id, Some(guild_id), GUILD_TEXT, "general").unwrap());

    let payload = MessageFixture::new(unique_id(), channel_id, author_id)
        .in_guild(guild_id)
        .build()
        .unwrap();
    let message = MessageMaterializer::new(ctx.clone()).materialize(&payload);

    assert!(message.guild.is_none());
    assert!(!message.author.is_member());
    assert!(message.channel().is_placeholder());
    assert!(ctx.cache().dm_channel(author_id).is_none());

    let channel = message.channel_cell().settled().await;
    assert_eq!(channel.kind, ChannelKind::GuildText);
}

#[test]
fn test_placeholder_without_runtime_is_settled() {
    let rest = MockRestClient::new(unique_id());
    let ctx = test_context(rest.clone());
    let guild_id = unique_id();
    seed_guild(&ctx, guild_id, unique_id(), unique_id());

    let channel_id = unique_id();
    rest.with_channel(channel_payload(channel_id, Some(guild_id), GUILD_TEXT, "general").unwrap());
    let payload = MessageFixture::new(unique_id(), channel_id, unique_id())
        .in_guild(guild_id)
        .build()
        .unwrap();
    let message = MessageMaterializer::new(ctx).materialize(&payload);

    assert!(message.channel().is_placeholder());
    assert_eq!(message.channel().id, channel_id);
    assert!(!message.channel_cell().is_pending());
    assert_eq!(rest.call_count(), 0);
}

#[test]
fn test_placeholder_fetch_runs_on_captured_runtime() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let rest = MockRestClient::new(unique_id());
    let ctx = ClientContext::new(rest.clone(), petals_cache::ClientCache::new_shared())
        .with_runtime(runtime.handle().clone())
        .into_shared();
    let guild_id = unique_id();
    seed_guild(&ctx, guild_id, unique_id(), unique_id());

    let channel_id = unique_id();
    rest.with_channel(channel_payload(channel_id, Some(guild_id), GUILD_TEXT, "general").unwrap());
    let payload = MessageFixture::new(unique_id(), channel_id, unique_id())
        .in_guild(guild_id)
        .build()
        .unwrap();
    let message = MessageMaterializer::new(ctx).materialize(&payload);
    assert!(message.channel_cell().is_pending());

    let channel = runtime.block_on(message.channel_cell().settled());
    assert_eq!(channel.kind, ChannelKind::GuildText);
    assert_eq!(rest.calls(), vec![RestCall::FetchChannel(channel_id)]);
}

// ============================================================================
// Field transcription
// ============================================================================

#[tokio::test]
async fn test_type_codes() {
    let ctx = test_context(MockRestClient::new(unique_id()));
    let materializer = MessageMaterializer::new(ctx);
    let channel_id = unique_id();

    let reply = materializer.materialize(
        &MessageFixture::new(unique_id(), channel_id, unique_id()).kind(19).build().unwrap(),
    );
    assert_eq!(reply.kind, Some(MessageType::Reply));

    let unknown = materializer.materialize(
        &MessageFixture::new(unique_id(), channel_id, unique_id()).kind(13).build().unwrap(),
    );
    assert_eq!(unknown.kind, None);
}

#[tokio::test]
async fn test_attachments_embeds_flags_and_timestamps() {
    let ctx = test_context(MockRestClient::new(unique_id()));
    let (first, second) = (unique_id(), unique_id());

    let payload = MessageFixture::new(unique_id(), unique_id(), unique_id())
        .attachment(first, "a.png")
        .attachment(second, "b.txt")
        .embed("one")
        .embed("two")
        .flags((1 << 1) | (1 << 2) | (1 << 40))
        .edited_at("2021-03-01T10:05:00.123+00:00")
        .webhook(unique_id())
        .build()
        .unwrap();
    let message = MessageMaterializer::new(ctx).materialize(&payload);

    let ids: Vec<_> = message.attachments.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![first, second]);
    assert_eq!(message.attachments[0].filename, "a.png");
    assert_eq!(message.attachments[0].proxy_url, "https://media.test/a.png");
    assert_eq!(message.attachments[1].size, 1024);

    let titles: Vec<_> = message.embeds.iter().map(|e| e.title.as_deref()).collect();
    assert_eq!(titles, vec![Some("one"), Some("two")]);

    assert_eq!(message.flags.list(), vec!["IS_CROSSPOST", "SUPPRESS_EMBEDS"]);
    assert!(message.flags.has("SUPPRESS_EMBEDS"));
    assert!(!message.flags.has("URGENT"));

    let edited = message.edited_timestamp.unwrap();
    assert_eq!(edited.to_rfc3339(), "2021-03-01T10:05:00.123+00:00");
    assert!(message.timestamp.is_some());
    assert!(message.is_webhook());
}

#[tokio::test]
async fn test_mentions_and_role_mentions() {
    let ctx = test_context(MockRestClient::new(unique_id()));
    let (guild_id, channel_id, role_id) = (unique_id(), unique_id(), unique_id());
    seed_guild(&ctx, guild_id, channel_id, role_id);

    let (alice, bob) = (unique_id(), unique_id());
    let payload = MessageFixture::new(unique_id(), channel_id, unique_id())
        .in_guild(guild_id)
        .mention(alice)
        .mention(bob)
        .mention(alice)
        .mention_role(role_id)
        .mention_role(unique_id())
        .build()
        .unwrap();
    let message = MessageMaterializer::new(ctx).materialize(&payload);

    assert_eq!(message.mentions, vec![alice, bob]);
    assert!(message.mentions_user(bob));

    assert_eq!(message.role_mentions.len(), 1);
    assert_eq!(message.role_mentions[0].id, role_id);
    assert_eq!(message.role_mentions[0].name, "gardeners");
}

// ============================================================================
// Referenced messages
// ============================================================================

#[tokio::test]
async fn test_referenced_message_is_materialized() {
    let ctx = test_context(MockRestClient::new(unique_id()));
    let channel_id = unique_id();
    let (original_id, original_author) = (unique_id(), unique_id());

    let payload = MessageFixture::new(unique_id(), channel_id, unique_id())
        .kind(19)
        .referencing(MessageFixture::new(original_id, channel_id, original_author).content("first"))
        .build()
        .unwrap();
    let message = MessageMaterializer::new(ctx).materialize(&payload);

    let reference = message.referenced_message.as_deref().unwrap();
    assert_eq!(reference.id, original_id);
    assert_eq!(reference.author.id(), original_author);
    assert_eq!(reference.content.as_deref(), Some("first"));
    assert!(reference.referenced_message.is_none());
}

#[tokio::test]
async fn test_reference_depth_is_capped() {
    let rest = MockRestClient::new(unique_id());
    let ctx = ClientContext::new(rest, petals_cache::ClientCache::new_shared())
        .with_max_reference_depth(2)
        .into_shared();
    let channel_id = unique_id();
    let author_id = unique_id();

    let mut fixture = MessageFixture::new(unique_id(), channel_id, author_id);
    for _ in 0..5 {
        fixture = MessageFixture::new(unique_id(), channel_id, author_id).referencing(fixture);
    }
    let message = MessageMaterializer::new(ctx).materialize(&fixture.build().unwrap());

    let mut depth = 0;
    let mut current = &message;
    while let Some(next) = current.referenced_message.as_deref() {
        depth += 1;
        current = next;
    }
    assert_eq!(depth, 2);
}
