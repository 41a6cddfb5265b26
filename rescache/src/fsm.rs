//! The per-request caching state machine.
//!
//! Every processed request moves through a fixed set of stages:
//!
//! ```text
//! RESOLVING -> { EXCLUDED | INVALIDATING | CACHE_LOOKUP }
//! CACHE_LOOKUP -> { CACHE_HIT | FETCH }
//! FETCH -> { PERSIST | STALE_RESCUE }
//! ```
//!
//! `EXCLUDED` covers both the exclusion predicate and the unconditional
//! `HEAD` bypass. `INVALIDATING` is entered for any non-`GET` verb: the
//! stored entry is removed best-effort and the request proceeds without
//! cache involvement. `STALE_RESCUE` re-runs the cache lookup with
//! staleness force-accepted after the upstream transport has failed and
//! the stale-read policy approved.
//!
//! The state machine holds no shared mutable state across requests; the
//! per-request configuration is resolved once and then read-only.

use rescache_backend::CacheBackend;
use rescache_core::{
    CacheContext, CacheStatus, Cacheable, CacheableRequest, Extractor, Upstream,
};
use tracing::{debug, instrument, warn};

use crate::config::{CacheOptions, ResolvedContext, resolve};
use crate::error::{Error, ReadMiss};
use crate::persister::persist;
use crate::reader::read;

/// Marker type for builder slots that have not been filled yet.
pub struct NotSet;

/// The caching adapter.
///
/// Wraps a store backend, a default key extractor, and instance-level
/// default options. Requests enter through [`process`](Cache::process) or
/// [`process_with`](Cache::process_with); every call returns the transport
/// (or cached) outcome together with a [`CacheContext`] describing where
/// the response came from.
///
/// The adapter is `&self` throughout; it can be shared behind an `Arc`
/// and processes requests independently. Concurrent fetches for the same
/// key are not coalesced.
pub struct Cache<B, Ext, Req, E> {
    backend: B,
    extractor: Ext,
    defaults: CacheOptions<Req, E>,
}

impl<B, Req, E> Cache<B, NotSet, Req, E> {
    /// Starts building a cache over the given backend.
    pub fn builder(backend: B) -> CacheBuilder<B, NotSet, Req, E> {
        CacheBuilder {
            backend,
            extractor: NotSet,
            defaults: CacheOptions::new(),
        }
    }
}

/// Builder for [`Cache`].
///
/// The extractor slot starts as [`NotSet`]; [`build`](CacheBuilder::build)
/// only exists once an extractor has been provided, so a cache without a
/// key derivation strategy cannot be constructed.
pub struct CacheBuilder<B, Ext, Req, E> {
    backend: B,
    extractor: Ext,
    defaults: CacheOptions<Req, E>,
}

impl<B, Ext, Req, E> CacheBuilder<B, Ext, Req, E> {
    /// Sets the default key extractor.
    pub fn extractor<Ext2>(self, extractor: Ext2) -> CacheBuilder<B, Ext2, Req, E>
    where
        Ext2: Extractor<Subject = Req> + Send + Sync,
    {
        CacheBuilder {
            backend: self.backend,
            extractor,
            defaults: self.defaults,
        }
    }

    /// Sets the instance-level default options.
    pub fn defaults(mut self, defaults: CacheOptions<Req, E>) -> Self {
        self.defaults = defaults;
        self
    }
}

impl<B, Ext, Req, E> CacheBuilder<B, Ext, Req, E>
where
    Ext: Extractor<Subject = Req> + Send + Sync,
{
    /// Finalizes the builder.
    pub fn build(self) -> Cache<B, Ext, Req, E> {
        Cache {
            backend: self.backend,
            extractor: self.extractor,
            defaults: self.defaults,
        }
    }
}

impl<B, Ext, Req, E> Cache<B, Ext, Req, E>
where
    B: CacheBackend,
    Ext: Extractor<Subject = Req> + Send + Sync,
    Req: CacheableRequest + Send + Sync,
    E: Send,
{
    /// Processes a request with the instance-level default options.
    pub async fn process<U>(
        &self,
        request: Req,
        upstream: U,
    ) -> (Result<U::Response, Error<E>>, CacheContext)
    where
        U: Upstream<Req, Error = E> + Send,
        U::Response: Cacheable,
    {
        self.process_with(request, upstream, CacheOptions::new())
            .await
    }

    /// Processes a request with per-request option overrides.
    ///
    /// The overrides are shallow-merged over the instance defaults before
    /// anything else happens.
    #[instrument(skip_all, fields(backend = self.backend.name()))]
    pub async fn process_with<U>(
        &self,
        request: Req,
        mut upstream: U,
        overrides: CacheOptions<Req, E>,
    ) -> (Result<U::Response, Error<E>>, CacheContext)
    where
        U: Upstream<Req, Error = E> + Send,
        U::Response: Cacheable,
    {
        let options = overrides.merged_over(&self.defaults);

        // EXCLUDED is decided before key resolution: a bypassed request
        // never touches the store, so there is nothing to key.
        let excluded = request.is_head()
            || options
                .exclude
                .as_ref()
                .is_some_and(|policy| policy.evaluate(&request));
        if excluded {
            if options.debug.unwrap_or(false) {
                debug!(method = request.method(), "request excluded from caching");
            }
            let result = upstream.call(&request).await.map_err(Error::Upstream);
            return (result, CacheContext::upstream(CacheStatus::Bypass, None));
        }

        let (request, ctx) = resolve(options, &self.extractor, request).await;
        if ctx.debug {
            debug!(key = %ctx.key, "cache key resolved");
        }

        if request.is_get() {
            self.lookup(request, upstream, ctx).await
        } else {
            self.invalidate(request, upstream, ctx).await
        }
    }

    /// INVALIDATING: any non-`GET` verb removes the stored entry and then
    /// goes straight to the upstream, never reading or writing the cache.
    async fn invalidate<U>(
        &self,
        request: Req,
        mut upstream: U,
        ctx: ResolvedContext<Req, E>,
    ) -> (Result<U::Response, Error<E>>, CacheContext)
    where
        U: Upstream<Req, Error = E> + Send,
    {
        match self.backend.delete(&ctx.key).await {
            Ok(status) => {
                if ctx.debug {
                    debug!(key = %ctx.key, method = request.method(), ?status, "cache entry invalidated");
                }
            }
            // Removal is fire-and-forget; the request must not fail
            // because the store could not be cleaned up.
            Err(error) => {
                warn!(key = %ctx.key, error = %error, "cache invalidation failed");
            }
        }
        let result = upstream.call(&request).await.map_err(Error::Upstream);
        (result, CacheContext::upstream(CacheStatus::Bypass, Some(ctx.key)))
    }

    /// CACHE_LOOKUP: serve a usable entry, otherwise fall through to a
    /// live fetch (clearing an expired entry first when configured).
    async fn lookup<U>(
        &self,
        request: Req,
        upstream: U,
        ctx: ResolvedContext<Req, E>,
    ) -> (Result<U::Response, Error<E>>, CacheContext)
    where
        U: Upstream<Req, Error = E> + Send,
        U::Response: Cacheable,
    {
        match read::<B, U::Response>(&self.backend, &ctx.key, ctx.accept_stale).await {
            Ok(Ok(entry)) => {
                let status = if entry.stale {
                    CacheStatus::Stale
                } else {
                    CacheStatus::Hit
                };
                if ctx.debug {
                    debug!(key = %ctx.key, status = status.as_str(), "served from cache");
                }
                (Ok(entry.response), CacheContext::cached(status, ctx.key))
            }
            Ok(Err(miss)) => {
                if miss == ReadMiss::Expired && ctx.clear_on_stale {
                    if let Err(error) = self.backend.delete(&ctx.key).await {
                        warn!(key = %ctx.key, error = %error, "failed to clear stale entry");
                    }
                }
                self.fetch(request, upstream, ctx).await
            }
            Err(error) => (
                Err(error.into()),
                CacheContext::upstream(CacheStatus::Miss, Some(ctx.key)),
            ),
        }
    }

    /// FETCH then PERSIST on success, or hand the failure to the rescue
    /// path.
    async fn fetch<U>(
        &self,
        request: Req,
        mut upstream: U,
        ctx: ResolvedContext<Req, E>,
    ) -> (Result<U::Response, Error<E>>, CacheContext)
    where
        U: Upstream<Req, Error = E> + Send,
        U::Response: Cacheable,
    {
        if ctx.debug {
            debug!(key = %ctx.key, "cache miss, fetching from upstream");
        }
        match upstream.call(&request).await {
            Ok(response) => {
                match persist(&self.backend, &ctx.key, &response, ctx.ttl).await {
                    Ok(()) => (
                        Ok(response),
                        CacheContext::upstream(CacheStatus::Miss, Some(ctx.key)),
                    ),
                    Err(error) => (
                        Err(error.into()),
                        CacheContext::upstream(CacheStatus::Miss, Some(ctx.key)),
                    ),
                }
            }
            Err(error) => self.rescue::<U>(request, error, ctx).await,
        }
    }

    /// STALE_RESCUE: after a transport failure, consult the stale-read
    /// policy and re-run the lookup with staleness force-accepted.
    ///
    /// Anything short of a servable entry, including a failing rescue
    /// read, re-raises the original upstream error unchanged.
    async fn rescue<U>(
        &self,
        request: Req,
        error: E,
        ctx: ResolvedContext<Req, E>,
    ) -> (Result<U::Response, Error<E>>, CacheContext)
    where
        U: Upstream<Req, Error = E> + Send,
        U::Response: Cacheable,
    {
        if !ctx.read_on_error.evaluate(&error, &request) {
            return (
                Err(Error::Upstream(error)),
                CacheContext::upstream(CacheStatus::Miss, Some(ctx.key)),
            );
        }
        if ctx.debug {
            debug!(key = %ctx.key, "upstream failed, attempting stale rescue");
        }
        match read::<B, U::Response>(&self.backend, &ctx.key, true).await {
            Ok(Ok(entry)) => (
                Ok(entry.response),
                CacheContext::cached(CacheStatus::Stale, ctx.key),
            ),
            Ok(Err(_)) => (
                Err(Error::Upstream(error)),
                CacheContext::upstream(CacheStatus::Miss, Some(ctx.key)),
            ),
            Err(backend_error) => {
                warn!(key = %ctx.key, error = %backend_error, "stale rescue read failed");
                (
                    Err(Error::Upstream(error)),
                    CacheContext::upstream(CacheStatus::Miss, Some(ctx.key)),
                )
            }
        }
    }
}
