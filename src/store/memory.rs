//! In-Memory Document Store
//!
//! Sharded-map implementation of [`DocumentStore`] used by the server binary
//! and the test suite. Version tokens come from a single process-wide
//! counter, so a token observed for a key is never issued twice.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::Value;

use super::{Cas, DocumentStore, StoreError, VersionedDoc};

struct Stored {
    value: Value,
    cas: u64,
}

/// In-memory store over a sharded concurrent map.
///
/// Writes to the same key serialize on the map shard, which is what makes
/// `replace` a true compare-and-swap: the token check and the overwrite
/// happen under the same shard guard.
pub struct MemoryStore {
    docs: DashMap<(String, String), Stored>,
    cas_gen: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            docs: DashMap::new(),
            cas_gen: AtomicU64::new(1),
        }
    }

    fn next_cas(&self) -> u64 {
        self.cas_gen.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, key: &str) -> Result<VersionedDoc, StoreError> {
        let map_key = (collection.to_string(), key.to_string());
        match self.docs.get(&map_key) {
            Some(entry) => Ok(VersionedDoc {
                value: entry.value.clone(),
                cas: Cas::new(entry.cas),
            }),
            None => Err(StoreError::not_found(collection, key)),
        }
    }

    async fn insert(
        &self,
        collection: &str,
        key: &str,
        value: Value,
    ) -> Result<Cas, StoreError> {
        let map_key = (collection.to_string(), key.to_string());
        match self.docs.entry(map_key) {
            Entry::Occupied(_) => Err(StoreError::already_exists(collection, key)),
            Entry::Vacant(slot) => {
                let cas = self.next_cas();
                slot.insert(Stored { value, cas });
                Ok(Cas::new(cas))
            }
        }
    }

    async fn replace(
        &self,
        collection: &str,
        key: &str,
        value: Value,
        expected: Cas,
    ) -> Result<Cas, StoreError> {
        let map_key = (collection.to_string(), key.to_string());
        match self.docs.get_mut(&map_key) {
            Some(mut entry) => {
                if entry.cas != expected.value() {
                    return Err(StoreError::cas_mismatch(collection, key));
                }
                let cas = self.next_cas();
                entry.value = value;
                entry.cas = cas;
                Ok(Cas::new(cas))
            }
            None => Err(StoreError::not_found(collection, key)),
        }
    }

    async fn remove(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        let map_key = (collection.to_string(), key.to_string());
        match self.docs.remove(&map_key) {
            Some(_) => Ok(()),
            None => Err(StoreError::not_found(collection, key)),
        }
    }

    async fn scan(&self, collection: &str) -> Result<Vec<(String, Value)>, StoreError> {
        let mut rows: Vec<(String, Value)> = self
            .docs
            .iter()
            .filter(|entry| entry.key().0 == collection)
            .map(|entry| (entry.key().1.clone(), entry.value().value.clone()))
            .collect();
        // Deterministic order for query handlers
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(rows)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
