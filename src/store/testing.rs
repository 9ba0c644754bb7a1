//! Fault-Injecting Store Decorator (test support)
//!
//! Wraps any [`DocumentStore`] and forces a configured number of failures,
//! so retry and compensation paths can be exercised deterministically.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use super::{Cas, DocumentStore, StoreError, VersionedDoc};

/// Store decorator that injects failures into `replace` and `get`.
pub struct FlakyStore {
    inner: Arc<dyn DocumentStore>,
    /// Remaining forced conflicts applied to any `replace`
    replace_conflicts: AtomicU32,
    /// Remaining forced conflicts per document key
    keyed_conflicts: DashMap<String, u32>,
    /// Remaining forced `Unavailable` results on `get`
    unavailable_gets: AtomicU32,
}

impl FlakyStore {
    pub fn new(inner: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner,
            replace_conflicts: AtomicU32::new(0),
            keyed_conflicts: DashMap::new(),
            unavailable_gets: AtomicU32::new(0),
        }
    }

    /// Force the next `n` replace calls (any key) to fail with `CasMismatch`.
    pub fn fail_next_replaces(&self, n: u32) {
        self.replace_conflicts.store(n, Ordering::SeqCst);
    }

    /// Force the next `n` replace calls for `key` to fail with `CasMismatch`.
    pub fn fail_replaces_for_key(&self, key: &str, n: u32) {
        self.keyed_conflicts.insert(key.to_string(), n);
    }

    /// Force the next `n` get calls to fail with `Unavailable`.
    pub fn fail_next_gets(&self, n: u32) {
        self.unavailable_gets.store(n, Ordering::SeqCst);
    }

    fn take_conflict(&self, key: &str) -> bool {
        if let Some(mut remaining) = self.keyed_conflicts.get_mut(key)
            && *remaining > 0
        {
            *remaining -= 1;
            return true;
        }
        self.replace_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn get(&self, collection: &str, key: &str) -> Result<VersionedDoc, StoreError> {
        if self
            .unavailable_gets
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(StoreError::Unavailable("injected outage".into()));
        }
        self.inner.get(collection, key).await
    }

    async fn insert(
        &self,
        collection: &str,
        key: &str,
        value: Value,
    ) -> Result<Cas, StoreError> {
        self.inner.insert(collection, key, value).await
    }

    async fn replace(
        &self,
        collection: &str,
        key: &str,
        value: Value,
        expected: Cas,
    ) -> Result<Cas, StoreError> {
        if self.take_conflict(key) {
            return Err(StoreError::cas_mismatch(collection, key));
        }
        self.inner.replace(collection, key, value, expected).await
    }

    async fn remove(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        self.inner.remove(collection, key).await
    }

    async fn scan(&self, collection: &str) -> Result<Vec<(String, Value)>, StoreError> {
        self.inner.scan(collection).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.ping().await
    }
}
