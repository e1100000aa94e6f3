//! Shard registry
//!
//! The registry is the only place shard membership changes. Shards are
//! created once per index and re-register themselves on restart.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::mpsc;

use super::{Shard, ShardContext};
use crate::events::GatewayEvent;
use crate::transport::{TransportError, TransportFactory, TransportResult};

/// Deployment-wide shard settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardSettings {
    pub gateway_url: String,
    /// Total shards; ids run from 0 to `shard_count - 1`
    pub shard_count: u32,
}

/// Owns every shard of one client, keyed by shard id
pub struct ShardManager {
    shards: DashMap<u32, Arc<Shard>>,
    context: Arc<ShardContext>,
}

impl ShardManager {
    /// Create the registry with one disconnected shard per index
    #[must_use]
    pub fn new(
        settings: ShardSettings,
        factory: Arc<dyn TransportFactory>,
        events: mpsc::Sender<GatewayEvent>,
    ) -> Arc<Self> {
        let shard_count = settings.shard_count;
        let context = Arc::new(ShardContext { settings, factory, events });

        Arc::new_cyclic(|manager| {
            let shards = DashMap::new();
            for id in 0..shard_count {
                shards.insert(id, Arc::new(Shard::new(id, context.clone(), manager.clone())));
            }
            Self { shards, context }
        })
    }

    /// Connect every shard in index order
    pub async fn start_all(&self) -> TransportResult<()> {
        for shard in self.all() {
            shard.start().await?;
        }
        tracing::info!(shard_count = self.context.settings.shard_count, "All shards started");
        Ok(())
    }

    /// Restart one shard by id
    pub async fn restart(&self, shard_id: u32) -> TransportResult<()> {
        let shard = self.get(shard_id).ok_or(TransportError::UnknownShard(shard_id))?;
        shard.restart().await
    }

    pub async fn close_all(&self) {
        for shard in self.all() {
            shard.close().await;
        }
    }

    /// Insert or overwrite the entry for `shard.id()`
    pub fn register(&self, shard: Arc<Shard>) {
        let shard_id = shard.id();
        self.shards.insert(shard_id, shard);
        tracing::debug!(shard_id, "Shard registered");
    }

    pub fn get(&self, shard_id: u32) -> Option<Arc<Shard>> {
        self.shards.get(&shard_id).map(|entry| entry.value().clone())
    }

    /// Registered shard ids, ascending
    pub fn shard_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.shards.iter().map(|entry| *entry.key()).collect();
        ids.sort_unstable();
        ids
    }

    /// Shard responsible for a guild under the deployment's shard count
    pub fn shard_for_guild(&self, guild_id: petals_core::Snowflake) -> Option<Arc<Shard>> {
        let count = u64::from(self.context.settings.shard_count.max(1));
        let shard_id = (((guild_id.into_inner() as u64) >> 22) % count) as u32;
        self.get(shard_id)
    }

    /// Mean latency over shards that have measured one
    pub fn average_latency(&self) -> Option<Duration> {
        let samples: Vec<Duration> = self.all().iter().filter_map(|s| s.latency()).collect();
        if samples.is_empty() {
            return None;
        }
        Some(samples.iter().sum::<Duration>() / samples.len() as u32)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.shards.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }

    /// Snapshot in id order; no map guard is held afterwards
    fn all(&self) -> Vec<Arc<Shard>> {
        self.shard_ids().into_iter().filter_map(|id| self.get(id)).collect()
    }
}

impl std::fmt::Debug for ShardManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardManager")
            .field("settings", &self.context.settings)
            .field("shards", &self.shard_ids())
            .finish()
    }
}
