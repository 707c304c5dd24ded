//! The per-request environment passed to adapted functions.

use std::sync::Arc;
use talaria_core::Request;
use talaria_session::Session;

/// What an adapted function can see of the pending request.
///
/// `Env` replaces opaque context keys with an explicit record: the request
/// itself plus accessors for the values upstream middleware attached to it.
///
/// # Example
///
/// ```
/// use talaria_json::Env;
/// use bytes::Bytes;
///
/// let req = http::Request::builder()
///     .header("User-Agent", "doc-test/1.0")
///     .body(Bytes::new())
///     .unwrap();
/// let env = Env::new(&req);
/// assert!(env.trace_id().is_none());
/// assert_eq!(
///     env.request().headers().get("User-Agent").unwrap(),
///     "doc-test/1.0"
/// );
/// ```
#[derive(Debug)]
pub struct Env<'a> {
    request: &'a Request,
}

impl<'a> Env<'a> {
    /// Builds an environment around a request.
    #[must_use]
    pub fn new(request: &'a Request) -> Self {
        Self { request }
    }

    /// Returns the pending request.
    #[must_use]
    pub fn request(&self) -> &Request {
        self.request
    }

    /// Returns the trace ID attached by the trace middleware, if any.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        talaria_middleware::trace_id(self.request)
    }

    /// Returns the session attached by the session gate, if any.
    #[must_use]
    pub fn session(&self) -> Option<&Arc<dyn Session>> {
        talaria_session::session(self.request)
    }
}
