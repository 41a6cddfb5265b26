//! Layered cache configuration.
//!
//! Configuration is built in layers: instance-level defaults on the
//! [`Cache`](crate::Cache), optionally shallow-merged with per-request
//! overrides, then resolved into an immutable [`ResolvedContext`] for the
//! duration of one request. The resolved context carries the cache key,
//! which is computed exactly once - an explicit key is reused verbatim,
//! a derived key is extracted once and threaded through the pipeline.
//!
//! There is no shared mutable configuration state across requests.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rescache_core::{CacheKey, ExcludePolicy, Extractor, StaleReadPolicy};

/// Where the cache key for a request comes from.
pub(crate) enum KeySource<Req> {
    /// Explicit identifier, reused verbatim on every resolution.
    Explicit(CacheKey),
    /// Derived from the request by an extractor, overriding the cache's
    /// default extractor.
    Extract(Arc<dyn Extractor<Subject = Req> + Send + Sync>),
}

impl<Req> Clone for KeySource<Req> {
    fn clone(&self) -> Self {
        match self {
            KeySource::Explicit(key) => KeySource::Explicit(key.clone()),
            KeySource::Extract(extractor) => KeySource::Extract(Arc::clone(extractor)),
        }
    }
}

impl<Req> fmt::Debug for KeySource<Req> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Explicit(key) => f.debug_tuple("Explicit").field(&key.to_string()).finish(),
            KeySource::Extract(_) => f.write_str("Extract(..)"),
        }
    }
}

/// One layer of cache options; every field is optional.
///
/// Unset fields inherit from the layer below (per-request overrides fall
/// back to instance defaults, which fall back to the built-in defaults:
/// nothing excluded, no stale reads, no TTL).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use rescache::{CacheOptions, StaleReadPolicy};
///
/// let options: CacheOptions<String, std::io::Error> = CacheOptions::new()
///     .ttl(Duration::from_secs(300))
///     .clear_on_stale(true)
///     .read_on_error(StaleReadPolicy::Constant(true));
/// ```
pub struct CacheOptions<Req, E> {
    pub(crate) key: Option<KeySource<Req>>,
    pub(crate) exclude: Option<ExcludePolicy<Req>>,
    pub(crate) read_on_error: Option<StaleReadPolicy<Req, E>>,
    pub(crate) accept_stale: Option<bool>,
    pub(crate) clear_on_stale: Option<bool>,
    pub(crate) ttl: Option<Duration>,
    pub(crate) debug: Option<bool>,
}

impl<Req, E> CacheOptions<Req, E> {
    /// Creates an empty options layer; every field unset.
    pub fn new() -> Self {
        CacheOptions {
            key: None,
            exclude: None,
            read_on_error: None,
            accept_stale: None,
            clear_on_stale: None,
            ttl: None,
            debug: None,
        }
    }

    /// Sets an explicit cache key, bypassing key extraction entirely.
    pub fn key(mut self, key: CacheKey) -> Self {
        self.key = Some(KeySource::Explicit(key));
        self
    }

    /// Sets a key extractor overriding the cache's default extractor.
    pub fn key_extractor(
        mut self,
        extractor: impl Extractor<Subject = Req> + Send + Sync + 'static,
    ) -> Self {
        self.key = Some(KeySource::Extract(Arc::new(extractor)));
        self
    }

    /// Sets the exclusion policy.
    pub fn exclude(mut self, policy: impl Into<ExcludePolicy<Req>>) -> Self {
        self.exclude = Some(policy.into());
        self
    }

    /// Sets the stale-read policy consulted after transport failures.
    pub fn read_on_error(mut self, policy: impl Into<StaleReadPolicy<Req, E>>) -> Self {
        self.read_on_error = Some(policy.into());
        self
    }

    /// Whether expired entries are served by a normal lookup.
    ///
    /// Normally left unset by callers; the stale-rescue path forces it
    /// internally when re-entering the lookup after a transport failure.
    pub fn accept_stale(mut self, value: bool) -> Self {
        self.accept_stale = Some(value);
        self
    }

    /// Whether a lookup that misses due to staleness proactively removes
    /// the expired entry before falling through to a live fetch.
    pub fn clear_on_stale(mut self, value: bool) -> Self {
        self.clear_on_stale = Some(value);
        self
    }

    /// Time-to-live written into persisted entries.
    ///
    /// Entries persisted without a TTL never expire. A per-request
    /// override can shorten or lengthen the TTL but cannot clear it.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Enables per-request pipeline transition logging at debug level.
    pub fn debug(mut self, value: bool) -> Self {
        self.debug = Some(value);
        self
    }

    /// Shallow-merges this layer over a base layer.
    ///
    /// Fields set here win; unset fields are taken from `base`.
    pub(crate) fn merged_over(self, base: &Self) -> Self {
        CacheOptions {
            key: self.key.or_else(|| base.key.clone()),
            exclude: self.exclude.or_else(|| base.exclude.clone()),
            read_on_error: self.read_on_error.or_else(|| base.read_on_error.clone()),
            accept_stale: self.accept_stale.or(base.accept_stale),
            clear_on_stale: self.clear_on_stale.or(base.clear_on_stale),
            ttl: self.ttl.or(base.ttl),
            debug: self.debug.or(base.debug),
        }
    }
}

impl<Req, E> Default for CacheOptions<Req, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Req, E> Clone for CacheOptions<Req, E> {
    fn clone(&self) -> Self {
        CacheOptions {
            key: self.key.clone(),
            exclude: self.exclude.clone(),
            read_on_error: self.read_on_error.clone(),
            accept_stale: self.accept_stale,
            clear_on_stale: self.clear_on_stale,
            ttl: self.ttl,
            debug: self.debug,
        }
    }
}

impl<Req, E> fmt::Debug for CacheOptions<Req, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheOptions")
            .field("key", &self.key)
            .field("exclude", &self.exclude)
            .field("read_on_error", &self.read_on_error)
            .field("accept_stale", &self.accept_stale)
            .field("clear_on_stale", &self.clear_on_stale)
            .field("ttl", &self.ttl)
            .field("debug", &self.debug)
            .finish()
    }
}

/// The effective configuration for one request.
///
/// Immutable once built. Holds the cache key resolved exactly once during
/// the `RESOLVING` stage; downstream pipeline stages observe this single
/// consistent value and never recompute it.
pub struct ResolvedContext<Req, E> {
    pub(crate) key: CacheKey,
    pub(crate) read_on_error: StaleReadPolicy<Req, E>,
    pub(crate) accept_stale: bool,
    pub(crate) clear_on_stale: bool,
    pub(crate) ttl: Option<Duration>,
    pub(crate) debug: bool,
}

impl<Req, E> ResolvedContext<Req, E> {
    /// The cache key resolved for this request.
    pub fn key(&self) -> &CacheKey {
        &self.key
    }
}

impl<Req, E> fmt::Debug for ResolvedContext<Req, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedContext")
            .field("key", &self.key.to_string())
            .field("accept_stale", &self.accept_stale)
            .field("clear_on_stale", &self.clear_on_stale)
            .field("ttl", &self.ttl)
            .field("debug", &self.debug)
            .finish()
    }
}

/// Resolves merged options into an immutable per-request context.
///
/// This is the only place a cache key is ever computed: an explicit key is
/// reused verbatim, otherwise the override extractor or the cache's
/// default extractor runs once. Ownership of the request threads through
/// extraction and back to the caller.
pub(crate) async fn resolve<Req, E, Ext>(
    options: CacheOptions<Req, E>,
    default_extractor: &Ext,
    request: Req,
) -> (Req, ResolvedContext<Req, E>)
where
    Req: Send,
    Ext: Extractor<Subject = Req> + Send + Sync,
{
    let CacheOptions {
        key,
        exclude: _,
        read_on_error,
        accept_stale,
        clear_on_stale,
        ttl,
        debug,
    } = options;

    let (request, key) = match key {
        Some(KeySource::Explicit(key)) => (request, key),
        Some(KeySource::Extract(extractor)) => extractor.get(request).await.into_cache_key(),
        None => default_extractor.get(request).await.into_cache_key(),
    };

    let context = ResolvedContext {
        key,
        read_on_error: read_on_error.unwrap_or_default(),
        accept_stale: accept_stale.unwrap_or(false),
        clear_on_stale: clear_on_stale.unwrap_or(false),
        ttl,
        debug: debug.unwrap_or(false),
    };
    (request, context)
}
