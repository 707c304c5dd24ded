//! The core [`Handler`] trait and the request driver.

use std::future::Future;
use std::pin::Pin;
use talaria_core::{BufferedSink, Request, Response, ResponseSink};

/// A boxed future, as returned by handler methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// An async HTTP handler writing through a [`ResponseSink`].
///
/// The request is mutable so middleware can decorate its
/// [extensions](http::Extensions) (trace ID, session) before delegating
/// inward. Handlers are immutable after construction and safe to invoke
/// concurrently.
pub trait Handler: Send + Sync {
    /// Handles one request, writing the response to `sink`.
    fn handle<'a>(
        &'a self,
        sink: &'a mut dyn ResponseSink,
        req: &'a mut Request,
    ) -> BoxFuture<'a, ()>;
}

impl<H: Handler> Handler for std::sync::Arc<H> {
    fn handle<'a>(
        &'a self,
        sink: &'a mut dyn ResponseSink,
        req: &'a mut Request,
    ) -> BoxFuture<'a, ()> {
        self.as_ref().handle(sink, req)
    }
}

/// Runs a handler against a fresh buffered sink and finalizes the response.
///
/// This is the bridge a server embedding the stack (and every integration
/// test) uses to turn a buffered request into a [`Response`].
///
/// # Example
///
/// ```
/// use talaria_core::{Request, ResponseSink};
/// use talaria_middleware::{respond, BoxFuture, Handler};
/// use bytes::Bytes;
///
/// struct Hello;
///
/// impl Handler for Hello {
///     fn handle<'a>(
///         &'a self,
///         sink: &'a mut dyn ResponseSink,
///         _req: &'a mut Request,
///     ) -> BoxFuture<'a, ()> {
///         Box::pin(async move {
///             let _ = sink.write(b"hello");
///         })
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let req = http::Request::builder().uri("/").body(Bytes::new()).unwrap();
/// let response = respond(&Hello, req).await;
/// assert_eq!(response.status(), http::StatusCode::OK);
/// # });
/// ```
pub async fn respond<H: Handler>(handler: &H, mut req: Request) -> Response {
    let mut sink = BufferedSink::new();
    handler.handle(&mut sink, &mut req).await;
    sink.into_response()
}
