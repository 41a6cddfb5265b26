//! Error types for cache operations.

use rescache_backend::BackendError;
use thiserror::Error;

/// Why a cache lookup produced nothing servable.
///
/// The two kinds are distinct on purpose: the orchestrator must be able to
/// tell "nothing there" from "there, but expired" - only the latter
/// triggers clear-on-stale removal. Both are handled locally; they never
/// escape the lookup step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMiss {
    /// No entry is stored for the key.
    Absent,
    /// An entry is stored but past its expiry, and staleness was not
    /// accepted.
    Expired,
}

/// Error type returned by the cache adapter.
///
/// The `Upstream` variant carries the transport's failure payload exactly
/// as the transport produced it - no wrapping, no conversion - so callers
/// can match on the original error identity.
#[derive(Debug, Error)]
pub enum Error<E> {
    /// The upstream transport failed and no stale rescue applied.
    #[error("upstream transport error")]
    Upstream(E),

    /// The store failed during a read or write.
    ///
    /// Store removal failures never surface here; they are logged and
    /// swallowed.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl<E> Error<E> {
    /// Returns the original transport error, if that is what this is.
    pub fn into_upstream(self) -> Option<E> {
        match self {
            Error::Upstream(error) => Some(error),
            Error::Backend(_) => None,
        }
    }

    /// Whether this error originated in the upstream transport.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::Upstream(_))
    }
}
