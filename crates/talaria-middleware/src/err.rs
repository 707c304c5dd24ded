//! The error-normalizing handler adapter.
//!
//! [`ErrHandler`] turns an error-returning body into a [`Handler`]. It is the
//! single place where "what the body did" (returned error, prior writes,
//! prior explicit status) becomes exactly one HTTP response.

use crate::handler::{BoxFuture, Handler};
use http::StatusCode;
use talaria_core::{text_reply, Request, ResponseCapture, ResponseSink, TalariaResult};

/// An error-returning handler body.
///
/// This is the shape [`ErrHandler`] wraps. Middleware that want the
/// normalizing behavior implement `ErrFn` and construct an `ErrHandler`
/// around themselves; ad-hoc bodies use a function matching the signature.
pub trait ErrFn: Send + Sync {
    /// Handles one request, returning an error instead of writing a failure
    /// response itself.
    fn call<'a>(
        &'a self,
        sink: &'a mut dyn ResponseSink,
        req: &'a mut Request,
    ) -> BoxFuture<'a, TalariaResult<()>>;
}

impl<F> ErrFn for F
where
    F: for<'a> Fn(&'a mut dyn ResponseSink, &'a mut Request) -> BoxFuture<'a, TalariaResult<()>>
        + Send
        + Sync,
{
    fn call<'a>(
        &'a self,
        sink: &'a mut dyn ResponseSink,
        req: &'a mut Request,
    ) -> BoxFuture<'a, TalariaResult<()>> {
        self(sink, req)
    }
}

/// Wraps an [`ErrFn`] body as a [`Handler`], normalizing its outcome.
///
/// # Disposition
///
/// After the body runs against a [`ResponseCapture`]:
///
/// 1. A returned error whose chain holds a
///    [`Responder`](talaria_core::Responder) responds through the *original*
///    sink; its status replaces anything the body wrote.
/// 2. Any other error with no status committed yet renders as a 500 with the
///    error message as plain-text body.
/// 3. Any other error after a committed status changes nothing; the body
///    already answered.
/// 4. Success with no committed status finalizes as 204 (nothing written)
///    or 200 (bytes written).
/// 5. Success with a committed status changes nothing.
///
/// # Example
///
/// ```
/// use talaria_middleware::{err_fn, respond, BoxFuture};
/// use talaria_core::{Request, ResponseSink, TalariaResult};
/// use bytes::Bytes;
///
/// fn quiet<'a>(
///     _sink: &'a mut dyn ResponseSink,
///     _req: &'a mut Request,
/// ) -> BoxFuture<'a, TalariaResult<()>> {
///     Box::pin(async { Ok(()) })
/// }
///
/// # tokio_test::block_on(async {
/// let req = http::Request::builder().uri("/").body(Bytes::new()).unwrap();
/// let response = respond(&err_fn(quiet), req).await;
/// assert_eq!(response.status(), http::StatusCode::NO_CONTENT);
/// # });
/// ```
pub struct ErrHandler<F> {
    body: F,
}

impl<F: ErrFn> ErrHandler<F> {
    /// Wraps a body.
    pub fn new(body: F) -> Self {
        Self { body }
    }
}

/// Shorthand for [`ErrHandler::new`].
pub fn err_fn<F: ErrFn>(body: F) -> ErrHandler<F> {
    ErrHandler::new(body)
}

impl<F: ErrFn> Handler for ErrHandler<F> {
    fn handle<'a>(
        &'a self,
        sink: &'a mut dyn ResponseSink,
        req: &'a mut Request,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let (outcome, status, silent_status) = {
                let mut capture = ResponseCapture::new(&mut *sink);
                let outcome = self.body.call(&mut capture, req).await;
                (outcome, capture.status(), capture.result_status())
            };

            match outcome {
                Err(err) => {
                    if let Some(responder) = err.responder() {
                        responder.respond(sink);
                    } else if status.is_none() {
                        text_reply(sink, StatusCode::INTERNAL_SERVER_ERROR, &err.to_string());
                    }
                    // Status already committed: the body answered before
                    // failing, leave its response alone.
                }
                Ok(()) => {
                    if status.is_none() {
                        sink.write_status(silent_status);
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::respond;
    use bytes::Bytes;
    use http_body_util::BodyExt;
    use talaria_core::{CodedError, Responder, TalariaError};

    fn get(path: &str) -> Request {
        http::Request::builder()
            .method("GET")
            .uri(path)
            .body(Bytes::new())
            .unwrap()
    }

    async fn body_string(response: talaria_core::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn ok_silent<'a>(
        _sink: &'a mut dyn ResponseSink,
        _req: &'a mut Request,
    ) -> BoxFuture<'a, TalariaResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn plain_error<'a>(
        _sink: &'a mut dyn ResponseSink,
        _req: &'a mut Request,
    ) -> BoxFuture<'a, TalariaResult<()>> {
        Box::pin(async { Err(TalariaError::msg("e1")) })
    }

    fn coded_error<'a>(
        _sink: &'a mut dyn ResponseSink,
        _req: &'a mut Request,
    ) -> BoxFuture<'a, TalariaResult<()>> {
        Box::pin(async { Err(CodedError::new(StatusCode::METHOD_NOT_ALLOWED).into()) })
    }

    fn writes_foo<'a>(
        sink: &'a mut dyn ResponseSink,
        _req: &'a mut Request,
    ) -> BoxFuture<'a, TalariaResult<()>> {
        Box::pin(async move {
            sink.write(b"foo").map_err(anyhow::Error::from)?;
            Ok(())
        })
    }

    fn explicit_status<'a>(
        sink: &'a mut dyn ResponseSink,
        _req: &'a mut Request,
    ) -> BoxFuture<'a, TalariaResult<()>> {
        Box::pin(async move {
            text_reply(sink, StatusCode::NOT_ACCEPTABLE, "xyzzy");
            Ok(())
        })
    }

    fn explicit_status_then_error<'a>(
        sink: &'a mut dyn ResponseSink,
        _req: &'a mut Request,
    ) -> BoxFuture<'a, TalariaResult<()>> {
        Box::pin(async move {
            sink.write_status(StatusCode::NOT_ACCEPTABLE);
            Err(TalariaError::msg("late failure"))
        })
    }

    #[tokio::test]
    async fn silent_success_is_204_with_empty_body() {
        let response = respond(&err_fn(ok_silent), get("/a")).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(body_string(response).await, "");
    }

    #[tokio::test]
    async fn plain_error_is_500_with_message_body() {
        let response = respond(&err_fn(plain_error), get("/b")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(response).await, "e1\n");
    }

    #[tokio::test]
    async fn coded_error_controls_the_status() {
        let response = respond(&err_fn(coded_error), get("/c")).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body_string(response).await, "HTTP 405: Method Not Allowed\n");
    }

    #[tokio::test]
    async fn write_then_success_is_200_with_body() {
        let response = respond(&err_fn(writes_foo), get("/d")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "foo");
    }

    #[tokio::test]
    async fn explicit_status_survives_success() {
        let response = respond(&err_fn(explicit_status), get("/e")).await;
        assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    }

    #[tokio::test]
    async fn explicit_status_survives_non_responder_error() {
        let response = respond(&err_fn(explicit_status_then_error), get("/f")).await;
        assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    }

    #[derive(Debug)]
    struct Teapot;

    impl std::fmt::Display for Teapot {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("short and stout")
        }
    }

    impl Responder for Teapot {
        fn respond(&self, sink: &mut dyn ResponseSink) {
            text_reply(sink, StatusCode::IM_A_TEAPOT, "short and stout");
        }
    }

    fn responder_after_write<'a>(
        sink: &'a mut dyn ResponseSink,
        _req: &'a mut Request,
    ) -> BoxFuture<'a, TalariaResult<()>> {
        Box::pin(async move {
            sink.write_status(StatusCode::OK);
            Err(TalariaError::reply(Teapot))
        })
    }

    #[tokio::test]
    async fn responder_overrides_captured_status() {
        let response = respond(&err_fn(responder_after_write), get("/g")).await;
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(body_string(response).await, "short and stout\n");
    }
}
