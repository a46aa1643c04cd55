use std::{env, sync::LazyLock};
use tokio::sync::Mutex;

use super::types::{CacheStore, InMemoryCacheStore};

pub(crate) static CACHE_STORE_TYPE: LazyLock<String> = LazyLock::new(|| {
    env::var("SG_CACHE_STORE_TYPE")
        .ok()
        .unwrap_or("memory".to_string())
});

pub(crate) static GENERIC_CACHE_STORE: LazyLock<Mutex<Box<dyn CacheStore>>> =
    LazyLock::new(|| {
        let store_type = CACHE_STORE_TYPE.as_str();

        tracing::info!("Initializing cache store with type: {}", store_type);

        let store: Box<dyn CacheStore> = match store_type {
            "memory" => Box::new(InMemoryCacheStore::new()),
            t => panic!("Unsupported cache store type: {t}. Supported type is 'memory'"),
        };

        Mutex::new(store)
    });
