//! Cacheable request types and traits.
//!
//! The adapter only needs one thing from a request besides key derivation:
//! its method verb. Verbs drive the three-way routing decision:
//!
//! 1. `HEAD` is unconditionally non-cacheable and bypasses the store
//! 2. `GET` is the only verb that reads from or writes to the store
//! 3. every other verb invalidates the stored entry for its key
//!
//! All comparisons are case-insensitive; `"get"` and `"GET"` behave
//! identically.

/// Trait for request types that can participate in caching.
///
/// Key derivation is handled separately by the
/// [`Extractor`](crate::Extractor) seam; this trait only exposes the
/// method verb used for routing.
pub trait CacheableRequest {
    /// The request method verb, e.g. `"GET"`. Case does not matter.
    fn method(&self) -> &str;

    /// Whether this request reads from the cache.
    fn is_get(&self) -> bool {
        self.method().eq_ignore_ascii_case("GET")
    }

    /// Whether this request is unconditionally excluded from caching.
    fn is_head(&self) -> bool {
        self.method().eq_ignore_ascii_case("HEAD")
    }
}

impl<T> CacheableRequest for &T
where
    T: CacheableRequest + ?Sized,
{
    fn method(&self) -> &str {
        (*self).method()
    }
}
