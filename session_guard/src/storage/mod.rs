mod cache_store;
mod errors;
mod types;

pub(crate) async fn init() -> Result<(), errors::StorageError> {
    let _ = *cache_store::GENERIC_CACHE_STORE;
    Ok(())
}

pub(crate) use cache_store::GENERIC_CACHE_STORE;
pub(crate) use errors::StorageError;
pub(crate) use types::CacheData;
