//! Boolean-or-predicate configuration options.
//!
//! Two of the adapter's options accept either a constant boolean or a
//! predicate evaluated per request:
//!
//! - [`ExcludePolicy`] - bypass caching entirely for matching requests
//! - [`StaleReadPolicy`] - allow serving a stale entry after a transport error
//!
//! Both are modelled as tagged variants rather than runtime type
//! inspection, and are evaluated uniformly at the call site. The predicates
//! are pure and synchronous.

use std::fmt;
use std::sync::Arc;

/// Decides whether a request must bypass the cache entirely.
///
/// Evaluated before any store interaction. A `true` result skips both the
/// cache read and the cache write; the request goes straight to the
/// upstream transport. Note that `HEAD` requests are excluded
/// unconditionally by the adapter, independent of this policy.
///
/// The default is `Constant(false)`: nothing excluded.
pub enum ExcludePolicy<Req: ?Sized> {
    /// Fixed decision applied to every request.
    Constant(bool),
    /// Per-request decision.
    Predicate(Arc<dyn Fn(&Req) -> bool + Send + Sync>),
}

impl<Req: ?Sized> ExcludePolicy<Req> {
    /// Builds a predicate-backed policy.
    pub fn predicate(f: impl Fn(&Req) -> bool + Send + Sync + 'static) -> Self {
        ExcludePolicy::Predicate(Arc::new(f))
    }

    /// Evaluates the policy against a request.
    pub fn evaluate(&self, request: &Req) -> bool {
        match self {
            ExcludePolicy::Constant(value) => *value,
            ExcludePolicy::Predicate(predicate) => predicate(request),
        }
    }
}

impl<Req: ?Sized> Clone for ExcludePolicy<Req> {
    fn clone(&self) -> Self {
        match self {
            ExcludePolicy::Constant(value) => ExcludePolicy::Constant(*value),
            ExcludePolicy::Predicate(predicate) => ExcludePolicy::Predicate(Arc::clone(predicate)),
        }
    }
}

impl<Req: ?Sized> Default for ExcludePolicy<Req> {
    fn default() -> Self {
        ExcludePolicy::Constant(false)
    }
}

impl<Req: ?Sized> From<bool> for ExcludePolicy<Req> {
    fn from(value: bool) -> Self {
        ExcludePolicy::Constant(value)
    }
}

impl<Req: ?Sized> fmt::Debug for ExcludePolicy<Req> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExcludePolicy::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            ExcludePolicy::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Decides whether a stale cached entry may answer a failed live fetch.
///
/// Evaluated only after the upstream transport has failed, with the opaque
/// transport error and the original request. A `true` result sends the
/// state machine back into the cache lookup with staleness force-accepted.
///
/// The default is `Constant(false)`: transport errors always propagate.
pub enum StaleReadPolicy<Req: ?Sized, E: ?Sized> {
    /// Fixed decision applied to every failure.
    Constant(bool),
    /// Per-failure decision over the transport error and the request.
    Predicate(Arc<dyn Fn(&E, &Req) -> bool + Send + Sync>),
}

impl<Req: ?Sized, E: ?Sized> StaleReadPolicy<Req, E> {
    /// Builds a predicate-backed policy.
    pub fn predicate(f: impl Fn(&E, &Req) -> bool + Send + Sync + 'static) -> Self {
        StaleReadPolicy::Predicate(Arc::new(f))
    }

    /// Evaluates the policy against a transport error and the request.
    pub fn evaluate(&self, error: &E, request: &Req) -> bool {
        match self {
            StaleReadPolicy::Constant(value) => *value,
            StaleReadPolicy::Predicate(predicate) => predicate(error, request),
        }
    }
}

impl<Req: ?Sized, E: ?Sized> Clone for StaleReadPolicy<Req, E> {
    fn clone(&self) -> Self {
        match self {
            StaleReadPolicy::Constant(value) => StaleReadPolicy::Constant(*value),
            StaleReadPolicy::Predicate(predicate) => {
                StaleReadPolicy::Predicate(Arc::clone(predicate))
            }
        }
    }
}

impl<Req: ?Sized, E: ?Sized> Default for StaleReadPolicy<Req, E> {
    fn default() -> Self {
        StaleReadPolicy::Constant(false)
    }
}

impl<Req: ?Sized, E: ?Sized> From<bool> for StaleReadPolicy<Req, E> {
    fn from(value: bool) -> Self {
        StaleReadPolicy::Constant(value)
    }
}

impl<Req: ?Sized, E: ?Sized> fmt::Debug for StaleReadPolicy<Req, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaleReadPolicy::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            StaleReadPolicy::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_exclude_ignores_request() {
        let policy: ExcludePolicy<str> = ExcludePolicy::Constant(true);
        assert!(policy.evaluate("anything"));
        let policy: ExcludePolicy<str> = ExcludePolicy::default();
        assert!(!policy.evaluate("anything"));
    }

    #[test]
    fn predicate_exclude_sees_request() {
        let policy = ExcludePolicy::predicate(|req: &String| req.contains("/no-cache/"));
        assert!(policy.evaluate(&"https://x/no-cache/a".to_string()));
        assert!(!policy.evaluate(&"https://x/a".to_string()));
    }

    #[test]
    fn stale_read_predicate_sees_error_and_request() {
        let policy: StaleReadPolicy<String, u16> =
            StaleReadPolicy::predicate(|status, _req| *status >= 500);
        assert!(policy.evaluate(&502, &"req".to_string()));
        assert!(!policy.evaluate(&404, &"req".to_string()));
    }

    #[test]
    fn cloned_predicate_shares_closure() {
        let policy = ExcludePolicy::predicate(|req: &u32| *req > 10);
        let clone = policy.clone();
        assert_eq!(policy.evaluate(&11), clone.evaluate(&11));
        assert_eq!(policy.evaluate(&3), clone.evaluate(&3));
    }
}
