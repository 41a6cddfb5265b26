//! Cached value types with expiration metadata.
//!
//! This module provides the persisted record shape of the cache:
//!
//! - [`CacheValue`] - Cached data with an optional expiry timestamp
//! - [`CacheState`] - Freshness evaluated against the current time
//!
//! An entry past its expiry timestamp is **stale**: still physically
//! present in the store, but no longer served by a normal lookup. Stale
//! entries remain readable when staleness is explicitly accepted, which is
//! what the adapter's stale-rescue path relies on.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Freshness state of a cached value.
///
/// Produced by [`CacheValue::cache_state`] by comparing the expiry
/// timestamp against the current time. Both variants keep ownership of the
/// value so the caller decides what to do with an expired entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheState<T> {
    /// Value is within its validity window.
    Fresh(T),
    /// Value is past its expiry timestamp but still present in the store.
    Stale(T),
}

/// A cached value with expiration metadata.
///
/// Wraps any data type `T` with an optional expiry timestamp. A value
/// without an expiry never goes stale and is served until invalidated.
///
/// # Example
///
/// ```
/// use rescache_core::CacheValue;
/// use chrono::Utc;
///
/// let value = CacheValue::new("payload", Some(Utc::now() + chrono::Duration::hours(1)));
/// assert_eq!(value.data(), &"payload");
/// assert!(value.ttl().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheValue<T> {
    data: T,
    expire: Option<DateTime<Utc>>,
}

impl<T> CacheValue<T> {
    /// Creates a new cache value with the given data and expiry timestamp.
    pub fn new(data: T, expire: Option<DateTime<Utc>>) -> Self {
        CacheValue { data, expire }
    }

    /// Returns a reference to the cached data.
    #[inline]
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Returns when the data expires, if ever.
    #[inline]
    pub fn expire(&self) -> Option<DateTime<Utc>> {
        self.expire
    }

    /// Consumes the cache value and returns the inner data.
    pub fn into_inner(self) -> T {
        self.data
    }

    /// Consumes the cache value and returns the expiry and data separately.
    pub fn into_parts(self) -> (Option<DateTime<Utc>>, T) {
        (self.expire, self.data)
    }

    /// Replaces the data while keeping the expiry timestamp.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> CacheValue<U> {
        CacheValue {
            data: f(self.data),
            expire: self.expire,
        }
    }

    /// Remaining time-to-live derived from the expiry timestamp.
    ///
    /// Returns `None` if there is no expiry or it has already passed.
    pub fn ttl(&self) -> Option<Duration> {
        self.expire.and_then(|expire| {
            let duration = expire.signed_duration_since(Utc::now());
            if duration.num_seconds() > 0 {
                Some(Duration::from_secs(duration.num_seconds() as u64))
            } else {
                None
            }
        })
    }

    /// Evaluates the freshness of this value against the current time.
    pub fn cache_state(self) -> CacheState<Self> {
        let now = Utc::now();
        if let Some(expire) = self.expire
            && expire <= now
        {
            CacheState::Stale(self)
        } else {
            CacheState::Fresh(self)
        }
    }
}
