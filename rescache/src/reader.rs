//! Typed cache lookup with freshness evaluation.

use rescache_backend::{BackendError, CacheBackend};
use rescache_core::{CacheKey, CacheState, Cacheable};
use tracing::trace;

use crate::error::ReadMiss;

/// A cached response returned by a lookup.
#[derive(Debug)]
pub(crate) struct CachedEntry<T> {
    pub(crate) response: T,
    /// Set when the entry was past its expiry and served only because
    /// staleness was accepted.
    pub(crate) stale: bool,
}

/// Looks up and decodes the entry for a key, evaluating freshness.
///
/// The nested result separates the two failure planes: the outer error is a
/// store failure and fatal to the request; the inner [`ReadMiss`] is a
/// local signal the pipeline handles by falling through to a live fetch.
///
/// A stale entry is reported as [`ReadMiss::Expired`] unless
/// `accept_stale` is set, in which case it is served with the `stale`
/// marker. The entry itself is never removed here.
pub(crate) async fn read<B, T>(
    backend: &B,
    key: &CacheKey,
    accept_stale: bool,
) -> Result<Result<CachedEntry<T>, ReadMiss>, BackendError>
where
    B: CacheBackend,
    T: Cacheable,
{
    let Some(value) = backend.get::<T>(key).await? else {
        trace!(key = %key, "cache entry absent");
        return Ok(Err(ReadMiss::Absent));
    };
    match value.cache_state() {
        CacheState::Fresh(value) => Ok(Ok(CachedEntry {
            response: value.into_inner(),
            stale: false,
        })),
        CacheState::Stale(value) if accept_stale => Ok(Ok(CachedEntry {
            response: value.into_inner(),
            stale: true,
        })),
        CacheState::Stale(_) => {
            trace!(key = %key, "cache entry expired");
            Ok(Err(ReadMiss::Expired))
        }
    }
}
