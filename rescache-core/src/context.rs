//! Cache context types for tracking where a response came from.

use crate::key::CacheKey;

/// Provenance of a served response.
///
/// Distinguishes degraded service (`Stale`) from a normal cache hit, so
/// callers can detect that a response was served only because the live
/// fetch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheStatus {
    /// Cache hit - a valid cached entry was found and returned.
    Hit,
    /// Cache miss - the response was fetched from upstream.
    #[default]
    Miss,
    /// An expired cached entry was served, either because staleness was
    /// accepted up front or because the live fetch failed and the entry
    /// rescued the request.
    Stale,
    /// The request was excluded from caching; no store interaction happened
    /// for read or write.
    Bypass,
}

impl CacheStatus {
    /// Returns the status as a string slice.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "hit",
            CacheStatus::Miss => "miss",
            CacheStatus::Stale => "stale",
            CacheStatus::Bypass => "bypass",
        }
    }
}

/// Source of the response - either the upstream transport or the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseSource {
    /// Response came from the upstream transport (miss or bypass).
    #[default]
    Upstream,
    /// Response came from the cache store.
    Cache,
}

impl ResponseSource {
    /// Returns the source as a string slice.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ResponseSource::Upstream => "upstream",
            ResponseSource::Cache => "cache",
        }
    }
}

/// Context information about one cache operation.
///
/// Returned alongside every response produced by the adapter. The resolved
/// key is carried for diagnostics; it is `None` only when resolution never
/// happened (the adapter resolves it exactly once per request).
#[derive(Debug, Clone, Default)]
pub struct CacheContext {
    /// Whether the request resulted in a hit, miss, stale read, or bypass.
    pub status: CacheStatus,
    /// Source of the response.
    pub source: ResponseSource,
    /// The cache key resolved for this request.
    pub key: Option<CacheKey>,
}

impl CacheContext {
    /// Context for a response served from the store.
    pub fn cached(status: CacheStatus, key: CacheKey) -> Self {
        CacheContext {
            status,
            source: ResponseSource::Cache,
            key: Some(key),
        }
    }

    /// Context for a response served from upstream.
    pub fn upstream(status: CacheStatus, key: Option<CacheKey>) -> Self {
        CacheContext {
            status,
            source: ResponseSource::Upstream,
            key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings() {
        assert_eq!(CacheStatus::Hit.as_str(), "hit");
        assert_eq!(CacheStatus::Miss.as_str(), "miss");
        assert_eq!(CacheStatus::Stale.as_str(), "stale");
        assert_eq!(CacheStatus::Bypass.as_str(), "bypass");
    }

    #[test]
    fn default_is_upstream_miss() {
        let ctx = CacheContext::default();
        assert_eq!(ctx.status, CacheStatus::Miss);
        assert_eq!(ctx.source, ResponseSource::Upstream);
        assert!(ctx.key.is_none());
    }
}
