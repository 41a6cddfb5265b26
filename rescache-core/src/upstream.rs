//! The live transport seam.

use async_trait::async_trait;

/// Trait for calling the upstream transport with a request.
///
/// The transport is opaque to the adapter: an asynchronous function from a
/// request to either a response or an error. It is expected to fail for
/// non-2xx-class outcomes; the error payload is passed untouched to the
/// configured [`StaleReadPolicy`](crate::StaleReadPolicy) when a stale
/// rescue is considered, and re-raised unchanged when no rescue applies.
///
/// The request is borrowed, not consumed: after a transport failure the
/// adapter still needs it to evaluate the stale-read policy and possibly
/// retry the cache lookup. Implementations that need an owned request
/// clone the pieces they dispatch.
///
/// # Examples
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use rescache_core::Upstream;
///
/// struct MockUpstream {
///     response: MyResponse,
/// }
///
/// #[async_trait]
/// impl Upstream<MyRequest> for MockUpstream {
///     type Response = MyResponse;
///     type Error = MyError;
///
///     async fn call(&mut self, _req: &MyRequest) -> Result<MyResponse, MyError> {
///         Ok(self.response.clone())
///     }
/// }
/// ```
#[async_trait]
pub trait Upstream<Req> {
    /// The response type returned by the transport on success.
    type Response;

    /// The opaque failure payload of the transport.
    type Error;

    /// Call the upstream transport with the given request.
    async fn call(&mut self, req: &Req) -> Result<Self::Response, Self::Error>;
}
