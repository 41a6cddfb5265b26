//! Builder for configuring [`MokaBackend`].

use std::time::Duration;

use moka::future::{Cache, CacheBuilder};
use moka::policy::EvictionPolicy;

use crate::backend::MokaBackend;
use rescache_core::{CacheKey, CacheValue, Raw};

/// Marker type: capacity has not been configured yet.
///
/// This is the initial state of a [`MokaBackendBuilder`]. You must call
/// [`max_entries()`](MokaBackendBuilder::max_entries) before `build()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapacity;

/// Marker type: entry-count capacity has been configured.
#[derive(Debug, Clone, Copy)]
pub struct EntryCapacity(pub(crate) u64);

/// Builder for creating and configuring a [`MokaBackend`].
///
/// Use [`MokaBackend::builder`] to create a new builder instance. Capacity
/// is enforced at compile time via the typestate pattern: `build()` is only
/// available after [`max_entries()`](Self::max_entries).
///
/// # Examples
///
/// ```
/// use rescache_moka::{EvictionPolicy, MokaBackend};
/// use std::time::Duration;
///
/// let backend = MokaBackend::builder()
///     .max_entries(10_000)
///     .retention(Duration::from_secs(24 * 3600))
///     .eviction_policy(EvictionPolicy::lru())
///     .build();
/// ```
pub struct MokaBackendBuilder<Cap> {
    capacity: Cap,
    retention: Option<Duration>,
    eviction_policy: Option<EvictionPolicy>,
}

impl MokaBackendBuilder<NoCapacity> {
    /// Creates a new builder with no capacity configured.
    pub fn new() -> Self {
        Self {
            capacity: NoCapacity,
            retention: None,
            eviction_policy: None,
        }
    }

    /// Sets the maximum number of entries the cache can hold.
    ///
    /// When the cache exceeds this capacity, least recently used entries
    /// are evicted.
    pub fn max_entries(self, capacity: u64) -> MokaBackendBuilder<EntryCapacity> {
        MokaBackendBuilder {
            capacity: EntryCapacity(capacity),
            retention: self.retention,
            eviction_policy: self.eviction_policy,
        }
    }
}

impl Default for MokaBackendBuilder<NoCapacity> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Cap> MokaBackendBuilder<Cap> {
    /// Sets the physical retention window for entries.
    ///
    /// This bounds how long an entry stays in memory regardless of its
    /// logical expiry timestamp. It must be **longer** than the longest
    /// configured TTL, otherwise expired entries are evicted before the
    /// stale-rescue path can use them.
    ///
    /// # Default
    ///
    /// Unbounded - entries live until capacity eviction or removal.
    pub fn retention(mut self, window: Duration) -> Self {
        self.retention = Some(window);
        self
    }

    /// Sets the eviction policy for the cache.
    ///
    /// # Default
    ///
    /// [`EvictionPolicy::tiny_lfu()`]
    pub fn eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.eviction_policy = Some(policy);
        self
    }
}

impl MokaBackendBuilder<EntryCapacity> {
    /// Builds the [`MokaBackend`].
    ///
    /// Consumes the builder and returns a fully configured backend.
    pub fn build(self) -> MokaBackend {
        let policy = self
            .eviction_policy
            .unwrap_or_else(EvictionPolicy::tiny_lfu);
        let mut builder: CacheBuilder<CacheKey, CacheValue<Raw>, _> =
            CacheBuilder::new(self.capacity.0).eviction_policy(policy);
        if let Some(window) = self.retention {
            builder = builder.time_to_live(window);
        }
        MokaBackend::from_cache(builder.build())
    }
}
