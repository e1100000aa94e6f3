//! # petals-cache
//!
//! In-memory caching layer for gateway entities.
//!
//! ## Features
//!
//! - **MemoryStore**: concurrent id-keyed store handing out shared `Arc` values
//! - **ClientCache**: guilds, per-guild channels and roles, DM channels, users
//!
//! ## Example
//!
//! ```ignore
//! use petals_cache::ClientCache;
//!
//! let cache = ClientCache::new_shared();
//! cache.insert_guild(guild, channels, roles);
//! let channel = cache.guild_channel(guild_id, channel_id);
//! ```

pub mod client_cache;
pub mod store;

pub use client_cache::ClientCache;
pub use store::MemoryStore;
