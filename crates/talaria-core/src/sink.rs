//! The response sink abstraction.
//!
//! A [`ResponseSink`] is the write side of a pending HTTP exchange: headers,
//! a status code, and a body stream. Handlers receive a `&mut dyn
//! ResponseSink` rather than building a response value, which lets wrappers
//! such as [`crate::ResponseCapture`] observe exactly what was written and
//! when.

use crate::types::Response;
use bytes::{BufMut, BytesMut};
use http::{HeaderMap, StatusCode};
use http_body_util::Full;
use std::io;

/// The write side of a pending HTTP response.
///
/// # Contract
///
/// - Header mutations made after the first `write` are not guaranteed to
///   reach the client; callers should set headers first.
/// - `write_status` may be called more than once; implementations follow
///   last-write-wins semantics.
/// - A `write` without a preceding `write_status` implies status 200.
pub trait ResponseSink: Send {
    /// Returns the response header map for mutation.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Records the response status code.
    fn write_status(&mut self, status: StatusCode);

    /// Appends bytes to the response body, returning the number written.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
}

/// An in-memory [`ResponseSink`] that accumulates into a [`Response`].
///
/// This is the sink the [driver](../talaria_middleware/fn.respond.html) hands
/// to the outermost handler, and the one tests write against.
///
/// # Example
///
/// ```
/// use talaria_core::{BufferedSink, ResponseSink};
/// use http::StatusCode;
///
/// let mut sink = BufferedSink::new();
/// sink.write_status(StatusCode::CREATED);
/// sink.write(b"done").unwrap();
///
/// let response = sink.into_response();
/// assert_eq!(response.status(), StatusCode::CREATED);
/// ```
#[derive(Debug, Default)]
pub struct BufferedSink {
    headers: HeaderMap,
    status: Option<StatusCode>,
    body: BytesMut,
}

impl BufferedSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the status recorded so far, if any.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Returns the body bytes accumulated so far.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Finalizes the sink into a [`Response`].
    ///
    /// A sink that saw writes but no explicit status finalizes as 200, which
    /// mirrors how a real HTTP connection commits an implicit status on the
    /// first body write.
    #[must_use]
    pub fn into_response(self) -> Response {
        let mut response = http::Response::new(Full::new(self.body.freeze()));
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }
}

impl ResponseSink for BufferedSink {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.status.is_none() {
            self.status = Some(StatusCode::OK);
        }
        self.body.put_slice(buf);
        Ok(buf.len())
    }
}
