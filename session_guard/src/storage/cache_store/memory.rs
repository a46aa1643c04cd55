use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::storage::errors::StorageError;
use crate::storage::types::CacheData;

use super::types::{CacheStore, InMemoryCacheStore, StoredEntry};

const CACHE_PREFIX: &str = "cache";

impl InMemoryCacheStore {
    pub(crate) fn new() -> Self {
        tracing::info!("Creating new in-memory generic cache store");
        Self {
            entries: HashMap::new(),
        }
    }

    fn make_key(prefix: &str, key: &str) -> String {
        format!("{CACHE_PREFIX}:{prefix}:{key}")
    }

    fn is_live(entry: &StoredEntry, now: Instant) -> bool {
        entry.deadline.is_none_or(|deadline| now < deadline)
    }

    /// Expiry sweep: drop every entry whose deadline has passed. Runs on each
    /// TTL-bearing write, so abandoned records are reclaimed even when their
    /// keys are never read again.
    fn purge_expired(&mut self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| Self::is_live(entry, now));
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn init(&self) -> Result<(), StorageError> {
        Ok(()) // Nothing to initialize for in-memory store
    }

    async fn put(&mut self, prefix: &str, key: &str, value: CacheData) -> Result<(), StorageError> {
        let key = Self::make_key(prefix, key);
        self.entries.insert(
            key,
            StoredEntry {
                data: value,
                deadline: None,
            },
        );
        Ok(())
    }

    async fn put_with_ttl(
        &mut self,
        prefix: &str,
        key: &str,
        value: CacheData,
        ttl: usize,
    ) -> Result<(), StorageError> {
        self.purge_expired();
        let key = Self::make_key(prefix, key);
        self.entries.insert(
            key,
            StoredEntry {
                data: value,
                deadline: Some(Instant::now() + Duration::from_secs(ttl as u64)),
            },
        );
        Ok(())
    }

    async fn put_if_not_exists(
        &mut self,
        prefix: &str,
        key: &str,
        value: CacheData,
        ttl: usize,
    ) -> Result<bool, StorageError> {
        self.purge_expired();
        let key = Self::make_key(prefix, key);
        if self.entries.contains_key(&key) {
            return Ok(false);
        }
        self.entries.insert(
            key,
            StoredEntry {
                data: value,
                deadline: Some(Instant::now() + Duration::from_secs(ttl as u64)),
            },
        );
        Ok(true)
    }

    async fn get(&self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError> {
        let key = Self::make_key(prefix, key);
        let now = Instant::now();
        Ok(self
            .entries
            .get(&key)
            .filter(|entry| Self::is_live(entry, now))
            .map(|entry| entry.data.clone()))
    }

    async fn remove(&mut self, prefix: &str, key: &str) -> Result<(), StorageError> {
        let key = Self::make_key(prefix, key);
        self.entries.remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_key() {
        let result = InMemoryCacheStore::make_key("session", "abc123");
        assert_eq!(result, "cache:session:abc123");
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let mut store = InMemoryCacheStore::new();
        let value = CacheData {
            value: "test value".to_string(),
        };

        store
            .put("test", "key1", value.clone())
            .await
            .expect("put failed");

        let retrieved = store.get("test", "key1").await.expect("get failed");
        assert_eq!(retrieved.expect("missing value").value, "test value");
    }

    #[tokio::test]
    async fn test_put_if_not_exists() {
        let mut store = InMemoryCacheStore::new();
        let first = CacheData {
            value: "first".to_string(),
        };
        let second = CacheData {
            value: "second".to_string(),
        };

        let created = store
            .put_if_not_exists("test", "key2", first, 60)
            .await
            .expect("put_if_not_exists failed");
        assert!(created);

        let replaced = store
            .put_if_not_exists("test", "key2", second, 60)
            .await
            .expect("put_if_not_exists failed");
        assert!(!replaced);

        let retrieved = store.get("test", "key2").await.expect("get failed");
        assert_eq!(retrieved.expect("missing value").value, "first");
    }

    #[tokio::test]
    async fn test_remove() {
        let mut store = InMemoryCacheStore::new();
        let value = CacheData {
            value: "value to remove".to_string(),
        };

        store.put("test", "key3", value).await.expect("put failed");
        store.remove("test", "key3").await.expect("remove failed");

        let retrieved = store.get("test", "key3").await.expect("get failed");
        assert!(retrieved.is_none());
    }

    #[tokio::test]
    async fn test_get_missing_key_returns_none() {
        let store = InMemoryCacheStore::new();
        let retrieved = store.get("test", "absent").await.expect("get failed");
        assert!(retrieved.is_none());
    }

    #[tokio::test]
    async fn test_get_ignores_expired_entries() {
        let mut store = InMemoryCacheStore::new();
        let value = CacheData {
            value: "stale".to_string(),
        };

        // A zero TTL expires the entry as soon as it lands
        store
            .put_with_ttl("session", "stale-key", value, 0)
            .await
            .expect("put_with_ttl failed");

        let retrieved = store.get("session", "stale-key").await.expect("get failed");
        assert!(retrieved.is_none());
    }

    #[tokio::test]
    async fn test_expired_entries_are_reclaimed_without_being_read() {
        let mut store = InMemoryCacheStore::new();
        let abandoned = CacheData {
            value: "abandoned".to_string(),
        };
        let fresh = CacheData {
            value: "fresh".to_string(),
        };

        store
            .put_with_ttl("session", "abandoned-key", abandoned, 0)
            .await
            .expect("put_with_ttl failed");

        // The abandoned key is never looked up again; a later write for a
        // different key runs the sweep and must evict it from the map.
        store
            .put_with_ttl("session", "fresh-key", fresh, 60)
            .await
            .expect("put_with_ttl failed");

        let abandoned_key = InMemoryCacheStore::make_key("session", "abandoned-key");
        assert!(
            !store.entries.contains_key(&abandoned_key),
            "expired entry must not stay resident once the sweep has run"
        );
        assert!(
            store
                .entries
                .contains_key(&InMemoryCacheStore::make_key("session", "fresh-key"))
        );
    }

    #[tokio::test]
    async fn test_put_if_not_exists_replaces_an_expired_entry() {
        let mut store = InMemoryCacheStore::new();
        let stale = CacheData {
            value: "stale".to_string(),
        };
        let replacement = CacheData {
            value: "replacement".to_string(),
        };

        store
            .put_with_ttl("session", "key", stale, 0)
            .await
            .expect("put_with_ttl failed");

        let created = store
            .put_if_not_exists("session", "key", replacement, 60)
            .await
            .expect("put_if_not_exists failed");
        assert!(created, "an expired entry must not block a new write");

        let retrieved = store.get("session", "key").await.expect("get failed");
        assert_eq!(retrieved.expect("missing value").value, "replacement");
    }

    #[tokio::test]
    async fn test_entries_without_ttl_never_expire() {
        let mut store = InMemoryCacheStore::new();
        let durable = CacheData {
            value: "durable".to_string(),
        };
        let other = CacheData {
            value: "other".to_string(),
        };

        store.put("test", "durable-key", durable).await.expect("put failed");
        store
            .put_with_ttl("test", "other-key", other, 60)
            .await
            .expect("put_with_ttl failed");

        let retrieved = store.get("test", "durable-key").await.expect("get failed");
        assert_eq!(retrieved.expect("missing value").value, "durable");
    }
}
