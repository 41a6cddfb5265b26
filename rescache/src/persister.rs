//! Writing fetched responses back to the store.

use chrono::Utc;
use rescache_backend::{BackendError, CacheBackend};
use rescache_core::{CacheKey, CacheValue, Cacheable};
use std::time::Duration;
use tracing::trace;

/// Persists a freshly fetched response under the resolved key.
///
/// The expiry timestamp is `now + ttl`; without a TTL the entry never
/// expires. An existing entry for the key is overwritten, which is how a
/// previously stale entry gets repopulated after a successful fetch.
pub(crate) async fn persist<B, T>(
    backend: &B,
    key: &CacheKey,
    response: &T,
    ttl: Option<Duration>,
) -> Result<(), BackendError>
where
    B: CacheBackend,
    T: Cacheable,
{
    let expire = ttl.and_then(|ttl| {
        chrono::Duration::from_std(ttl)
            .ok()
            .map(|ttl| Utc::now() + ttl)
    });
    trace!(key = %key, expire = ?expire, "persisting response");
    backend.set(key, &CacheValue::new(response, expire)).await
}
