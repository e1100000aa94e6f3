//! Shard registry tests
//!
//! Run with: cargo test -p integration-tests --test shard_tests

use std::sync::Arc;
use std::time::Duration;

use integration_tests::*;
use petals_gateway::{GatewayEvent, ShardManager, ShardSettings, ShardState, TransportError};
use tokio::sync::mpsc;

const NORMAL_CLOSURE: u16 = 1000;

fn manager(
    shard_count: u32,
) -> (Arc<ShardManager>, Arc<ScriptedTransportFactory>, mpsc::Receiver<GatewayEvent>) {
    let factory = ScriptedTransportFactory::new();
    let (tx, rx) = mpsc::channel(64);
    let settings = ShardSettings {
        gateway_url: "wss://gateway.test".to_string(),
        shard_count,
    };
    (ShardManager::new(settings, factory.clone(), tx), factory, rx)
}

fn drain(rx: &mut mpsc::Receiver<GatewayEvent>) -> Vec<GatewayEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_start_all_connects_every_shard() {
    init_tracing();
    let (shards, factory, mut rx) = manager(3);

    shards.start_all().await.unwrap();

    assert_eq!(shards.shard_ids(), vec![0, 1, 2]);
    for id in 0..3 {
        let shard = shards.get(id).unwrap();
        assert_eq!(shard.state(), ShardState::Connected);

        let built = factory.transports_for(id);
        assert_eq!(built.len(), 1);
        assert_eq!(built[0].params.shard_id, id);
        assert_eq!(built[0].params.shard_count, 3);
    }

    let connected = drain(&mut rx)
        .into_iter()
        .filter(|e| matches!(e, GatewayEvent::ShardConnected { .. }))
        .count();
    assert_eq!(connected, 3);
}

#[tokio::test]
async fn test_restart_replaces_transport_once() {
    let (shards, factory, mut rx) = manager(2);
    shards.start_all().await.unwrap();
    drain(&mut rx);

    let before = shards.get(1).unwrap().transport().unwrap();
    shards.restart(1).await.unwrap();
    let after = shards.get(1).unwrap().transport().unwrap();

    let built = factory.transports_for(1);
    assert_eq!(built.len(), 2);
    assert_eq!(built[0].closes(), vec![NORMAL_CLOSURE]);
    assert!(built[1].closes().is_empty());
    assert!(!Arc::ptr_eq(&before, &after));

    // Shard 0 is untouched
    assert_eq!(factory.transports_for(0).len(), 1);
    assert!(factory.transports_for(0)[0].closes().is_empty());

    let events = drain(&mut rx);
    let closes = events
        .iter()
        .filter(|e| matches!(e, GatewayEvent::ShardClose { shard_id: 1 }))
        .count();
    assert_eq!(closes, 1);
    assert!(matches!(events.last(), Some(GatewayEvent::ShardConnected { shard_id: 1 })));
}

#[tokio::test]
async fn test_restart_of_unknown_shard_fails() {
    let (shards, factory, _rx) = manager(1);
    shards.start_all().await.unwrap();

    let err = shards.restart(7).await.unwrap_err();

    assert!(matches!(err, TransportError::UnknownShard(7)));
    assert_eq!(factory.transports().len(), 1);
}

#[tokio::test]
async fn test_close_all_closes_each_transport_once() {
    let (shards, factory, mut rx) = manager(2);
    shards.start_all().await.unwrap();
    drain(&mut rx);

    shards.close_all().await;
    shards.close_all().await;

    for transport in factory.transports() {
        assert_eq!(transport.closes(), vec![NORMAL_CLOSURE]);
    }
    for id in 0..2 {
        assert_eq!(shards.get(id).unwrap().state(), ShardState::Disconnected);
    }
    let closes = drain(&mut rx)
        .into_iter()
        .filter(|e| matches!(e, GatewayEvent::ShardClose { .. }))
        .count();
    assert_eq!(closes, 2);
}

#[tokio::test]
async fn test_latency_comes_from_transports() {
    let (shards, factory, _rx) = manager(2);
    assert_eq!(shards.average_latency(), None);

    shards.start_all().await.unwrap();
    assert_eq!(shards.average_latency(), None);

    factory.transports_for(0)[0].set_latency(Duration::from_millis(40));
    assert_eq!(shards.get(0).unwrap().latency(), Some(Duration::from_millis(40)));
    assert_eq!(shards.average_latency(), Some(Duration::from_millis(40)));

    factory.transports_for(1)[0].set_latency(Duration::from_millis(60));
    assert_eq!(shards.average_latency(), Some(Duration::from_millis(50)));
}

#[tokio::test]
async fn test_guild_routing_uses_shard_count() {
    let (shards, _factory, _rx) = manager(4);
    let guild_id = petals_core::Snowflake::new(5 << 22);

    assert_eq!(shards.shard_for_guild(guild_id).unwrap().id(), 1);
}
