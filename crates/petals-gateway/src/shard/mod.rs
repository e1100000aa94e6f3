//! Shards and their registry

mod manager;
mod shard;

pub use manager::{ShardManager, ShardSettings};
pub(crate) use shard::ShardContext;
pub use shard::{Shard, ShardState};
