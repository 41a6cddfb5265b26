//! Moka backend implementation.

use async_trait::async_trait;
use moka::future::Cache;
use rescache_backend::{Backend, BackendResult, CacheBackend, DeleteStatus};
use rescache_core::{CacheKey, CacheValue, Raw};

/// In-memory cache backend powered by Moka.
///
/// `MokaBackend` provides a concurrent in-memory store with bounded
/// capacity. Reads are lock-free and writes use fine-grained locking.
///
/// # Staleness vs eviction
///
/// The logical expiry timestamp carried by each [`CacheValue`] is evaluated
/// by the adapter's reader, not by this backend. Entries past their expiry
/// stay **physically present** so they remain available for stale rescue
/// after a failed live fetch. Physical retention is bounded separately by
/// capacity (LRU-style eviction) and the optional
/// [`retention`](crate::MokaBackendBuilder::retention) window.
///
/// # Caveats
///
/// - Data is **not persisted** - the cache is lost on process restart
/// - Data is **not shared** across processes
///
/// # Examples
///
/// ```
/// use rescache_moka::MokaBackend;
///
/// let backend = MokaBackend::builder().max_entries(10_000).build();
/// ```
#[derive(Clone, Debug)]
pub struct MokaBackend {
    cache: Cache<CacheKey, CacheValue<Raw>>,
}

impl MokaBackend {
    /// Creates a new builder for `MokaBackend`.
    pub fn builder() -> crate::builder::MokaBackendBuilder<crate::builder::NoCapacity> {
        crate::builder::MokaBackendBuilder::new()
    }

    pub(crate) fn from_cache(cache: Cache<CacheKey, CacheValue<Raw>>) -> Self {
        MokaBackend { cache }
    }

    /// Returns a reference to the underlying Moka cache.
    pub fn cache(&self) -> &Cache<CacheKey, CacheValue<Raw>> {
        &self.cache
    }
}

#[async_trait]
impl Backend for MokaBackend {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<CacheValue<Raw>>> {
        Ok(self.cache.get(key).await)
    }

    async fn write(&self, key: &CacheKey, value: CacheValue<Raw>) -> BackendResult<()> {
        self.cache.insert(key.clone(), value).await;
        Ok(())
    }

    async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        match self.cache.remove(key).await {
            Some(_) => Ok(DeleteStatus::Deleted(1)),
            None => Ok(DeleteStatus::Missing),
        }
    }

    fn name(&self) -> &str {
        "moka"
    }
}

// Explicit CacheBackend implementation using default trait methods
impl CacheBackend for MokaBackend {}
