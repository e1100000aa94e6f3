//! Keyed in-memory store
//!
//! Values are shared as `Arc<V>` so readers on other shards keep a stable
//! snapshot while writers replace the entry. Inserts overwrite by id.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use petals_core::Snowflake;
use std::sync::Arc;

/// Concurrent id -> value store
#[derive(Debug)]
pub struct MemoryStore<V> {
    entries: DashMap<Snowflake, Arc<V>>,
}

impl<V> Default for MemoryStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> MemoryStore<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Get a value by id
    pub fn get(&self, id: Snowflake) -> Option<Arc<V>> {
        self.entries.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Insert or replace a value, returning the shared handle
    pub fn set(&self, id: Snowflake, value: V) -> Arc<V> {
        let value = Arc::new(value);
        self.entries.insert(id, Arc::clone(&value));
        value
    }

    /// Insert an already shared value
    pub fn set_shared(&self, id: Snowflake, value: Arc<V>) {
        self.entries.insert(id, value);
    }

    /// Return the cached value if `keep` accepts it, otherwise store and
    /// return the one built by `make`.
    ///
    /// Runs under the entry's shard lock, so concurrent callers with the same
    /// id all observe the single stored instance.
    pub fn get_matching_or_insert_with<K, F>(&self, id: Snowflake, keep: K, make: F) -> Arc<V>
    where
        K: FnOnce(&V) -> bool,
        F: FnOnce() -> V,
    {
        match self.entries.entry(id) {
            Entry::Occupied(entry) if keep(entry.get()) => Arc::clone(entry.get()),
            Entry::Occupied(mut entry) => {
                let value = Arc::new(make());
                entry.insert(Arc::clone(&value));
                value
            }
            Entry::Vacant(entry) => Arc::clone(entry.insert(Arc::new(make())).value()),
        }
    }

    pub fn remove(&self, id: Snowflake) -> Option<Arc<V>> {
        self.entries.remove(&id).map(|(_, value)| value)
    }

    pub fn contains(&self, id: Snowflake) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of all values
    pub fn values(&self) -> Vec<Arc<V>> {
        self.entries
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }
}
