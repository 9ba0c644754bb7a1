//! Document Store Abstraction
//!
//! Key-addressed JSON document persistence with optimistic-concurrency
//! writes. The store guarantees atomicity at the single-document level only;
//! anything spanning documents (the credit transfer) is coordinated above
//! this layer with the compare-and-swap protocol.
//!
//! # Contract
//!
//! - Every document carries an opaque version token ([`Cas`]) that changes
//!   on each successful write.
//! - [`DocumentStore::replace`] succeeds only if the caller's token still
//!   matches the stored one.
//! - [`DocumentStore::insert`] is create-only and therefore doubles as an
//!   atomic reservation primitive.

pub mod error;
pub mod memory;

#[cfg(test)]
pub mod testing;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use error::StoreError;
pub use memory::MemoryStore;

/// Collection names used by the quickstart dataset.
pub mod collections {
    pub const AIRLINE: &str = "airline";
    pub const AIRPORT: &str = "airport";
    pub const ROUTE: &str = "route";
    pub const PROFILE: &str = "profile";
    pub const TRANSFER_LEDGER: &str = "transfer_ledger";
}

/// Opaque document version token for optimistic-concurrency writes.
///
/// Tokens are never reused for a key within a process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cas(u64);

impl Cas {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Cas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A document together with the version token it was read at.
#[derive(Debug, Clone)]
pub struct VersionedDoc {
    pub value: Value,
    pub cas: Cas,
}

/// Key-addressed document persistence with CAS write semantics.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document and its current version token.
    async fn get(&self, collection: &str, key: &str) -> Result<VersionedDoc, StoreError>;

    /// Create a document. Fails with `AlreadyExists` when the key is taken.
    async fn insert(&self, collection: &str, key: &str, value: Value)
    -> Result<Cas, StoreError>;

    /// Conditionally overwrite a document. Fails with `CasMismatch` if the
    /// stored version no longer matches `expected`.
    async fn replace(
        &self,
        collection: &str,
        key: &str,
        value: Value,
        expected: Cas,
    ) -> Result<Cas, StoreError>;

    /// Delete a document. Fails with `NotFound` when absent.
    async fn remove(&self, collection: &str, key: &str) -> Result<(), StoreError>;

    /// Full collection scan, backing the list/filter query endpoints.
    async fn scan(&self, collection: &str) -> Result<Vec<(String, Value)>, StoreError>;

    /// Liveness probe for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Fetch and deserialize a document in one step.
pub async fn get_typed<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    key: &str,
) -> Result<(T, Cas), StoreError> {
    let doc = store.get(collection, key).await?;
    let typed = serde_json::from_value(doc.value)
        .map_err(|e| StoreError::Unavailable(format!("corrupt document {collection}/{key}: {e}")))?;
    Ok((typed, doc.cas))
}

/// Serialize and insert a document in one step.
pub async fn insert_typed<T: Serialize>(
    store: &dyn DocumentStore,
    collection: &str,
    key: &str,
    value: &T,
) -> Result<Cas, StoreError> {
    let raw = serde_json::to_value(value)
        .map_err(|e| StoreError::Unavailable(format!("serialize {collection}/{key}: {e}")))?;
    store.insert(collection, key, raw).await
}

/// Serialize and conditionally replace a document in one step.
pub async fn replace_typed<T: Serialize>(
    store: &dyn DocumentStore,
    collection: &str,
    key: &str,
    value: &T,
    expected: Cas,
) -> Result<Cas, StoreError> {
    let raw = serde_json::to_value(value)
        .map_err(|e| StoreError::Unavailable(format!("serialize {collection}/{key}: {e}")))?;
    store.replace(collection, key, raw, expected).await
}
