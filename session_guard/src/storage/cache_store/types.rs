use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Instant;

use crate::storage::errors::StorageError;
use crate::storage::types::CacheData;

/// A stored value with an optional expiry deadline. Entries written without
/// a TTL never expire at the store level.
pub(super) struct StoredEntry {
    pub(super) data: CacheData,
    pub(super) deadline: Option<Instant>,
}

pub(crate) struct InMemoryCacheStore {
    pub(super) entries: HashMap<String, StoredEntry>,
}

#[async_trait]
pub(crate) trait CacheStore: Send + Sync + 'static {
    /// Initialize the store. This is called when the store is created.
    async fn init(&self) -> Result<(), StorageError>;

    /// Put a value into the store.
    async fn put(&mut self, prefix: &str, key: &str, value: CacheData) -> Result<(), StorageError>;

    /// Put a value into the store with a TTL.
    async fn put_with_ttl(
        &mut self,
        prefix: &str,
        key: &str,
        value: CacheData,
        ttl: usize,
    ) -> Result<(), StorageError>;

    /// Put a value only if the key doesn't already exist (atomic check-and-set).
    /// Returns true if the value was stored, false if the key already existed.
    async fn put_if_not_exists(
        &mut self,
        prefix: &str,
        key: &str,
        value: CacheData,
        ttl: usize,
    ) -> Result<bool, StorageError>;

    /// Get a value from the store.
    async fn get(&self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError>;

    /// Remove a value from the store.
    async fn remove(&mut self, prefix: &str, key: &str) -> Result<(), StorageError>;
}
