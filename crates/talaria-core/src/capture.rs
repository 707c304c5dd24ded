//! Response observation.
//!
//! [`ResponseCapture`] wraps another [`ResponseSink`] and records what flows
//! through it: the status code (if any was committed) and the number of body
//! bytes written. The error-normalizing handler uses it to decide which final
//! status a request deserves, and the log middleware uses it to report the
//! status on exit.

use crate::sink::ResponseSink;
use http::{HeaderMap, StatusCode};
use std::io;

/// A [`ResponseSink`] wrapper that records status and byte count.
///
/// # Invariants
///
/// - `status()` is `None` until the first `write_status` or `write`.
/// - The first `write` with no prior `write_status` records status 200,
///   matching the implicit commit a real connection performs.
/// - Every `write_status` updates the recorded status and still delegates to
///   the wrapped sink; nothing is frozen.
/// - `bytes_written()` accumulates the counts actually reported by the
///   wrapped sink, not the lengths requested.
pub struct ResponseCapture<'a> {
    inner: &'a mut dyn ResponseSink,
    status: Option<StatusCode>,
    bytes_written: usize,
}

impl std::fmt::Debug for ResponseCapture<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCapture")
            .field("status", &self.status)
            .field("bytes_written", &self.bytes_written)
            .finish_non_exhaustive()
    }
}

impl<'a> ResponseCapture<'a> {
    /// Wraps a sink for observation.
    pub fn new(inner: &'a mut dyn ResponseSink) -> Self {
        Self {
            inner,
            status: None,
            bytes_written: 0,
        }
    }

    /// Returns the recorded status, or `None` if nothing was committed.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Returns the total number of body bytes the wrapped sink accepted.
    #[must_use]
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    /// The status a silent handler should finalize with: 204 when no body
    /// bytes were written, 200 otherwise.
    #[must_use]
    pub fn result_status(&self) -> StatusCode {
        if self.bytes_written == 0 {
            StatusCode::NO_CONTENT
        } else {
            StatusCode::OK
        }
    }
}

impl ResponseSink for ResponseCapture<'_> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn write_status(&mut self, status: StatusCode) {
        self.status = Some(status);
        self.inner.write_status(status);
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.status.is_none() {
            self.status = Some(StatusCode::OK);
        }
        let n = self.inner.write(buf)?;
        self.bytes_written += n;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::BufferedSink;

    #[test]
    fn starts_with_no_status_and_no_bytes() {
        let mut sink = BufferedSink::new();
        let capture = ResponseCapture::new(&mut sink);
        assert_eq!(capture.status(), None);
        assert_eq!(capture.bytes_written(), 0);
    }

    #[test]
    fn first_write_records_200() {
        let mut sink = BufferedSink::new();
        let mut capture = ResponseCapture::new(&mut sink);
        capture.write(b"foo").unwrap();
        assert_eq!(capture.status(), Some(StatusCode::OK));
        assert_eq!(capture.bytes_written(), 3);
    }

    #[test]
    fn explicit_status_is_recorded_and_delegated() {
        let mut sink = BufferedSink::new();
        {
            let mut capture = ResponseCapture::new(&mut sink);
            capture.write_status(StatusCode::NOT_ACCEPTABLE);
            assert_eq!(capture.status(), Some(StatusCode::NOT_ACCEPTABLE));
        }
        assert_eq!(sink.status(), Some(StatusCode::NOT_ACCEPTABLE));
    }

    #[test]
    fn later_status_still_wins() {
        let mut sink = BufferedSink::new();
        let mut capture = ResponseCapture::new(&mut sink);
        capture.write_status(StatusCode::OK);
        capture.write_status(StatusCode::IM_A_TEAPOT);
        assert_eq!(capture.status(), Some(StatusCode::IM_A_TEAPOT));
    }

    #[test]
    fn writes_after_status_do_not_change_it() {
        let mut sink = BufferedSink::new();
        let mut capture = ResponseCapture::new(&mut sink);
        capture.write_status(StatusCode::CREATED);
        capture.write(b"body").unwrap();
        assert_eq!(capture.status(), Some(StatusCode::CREATED));
        assert_eq!(capture.bytes_written(), 4);
    }

    #[test]
    fn byte_count_accumulates_across_writes() {
        let mut sink = BufferedSink::new();
        let mut capture = ResponseCapture::new(&mut sink);
        capture.write(b"ab").unwrap();
        capture.write(b"cde").unwrap();
        assert_eq!(capture.bytes_written(), 5);
    }

    #[test]
    fn result_status_distinguishes_empty_from_written() {
        let mut sink = BufferedSink::new();
        let mut capture = ResponseCapture::new(&mut sink);
        assert_eq!(capture.result_status(), StatusCode::NO_CONTENT);
        capture.write(b"x").unwrap();
        assert_eq!(capture.result_status(), StatusCode::OK);
    }

    #[test]
    fn headers_pass_through_to_wrapped_sink() {
        let mut sink = BufferedSink::new();
        {
            let mut capture = ResponseCapture::new(&mut sink);
            capture.headers_mut().insert(
                http::header::CONTENT_TYPE,
                http::HeaderValue::from_static("application/json"),
            );
        }
        let response = sink.into_response();
        assert!(response.headers().contains_key(http::header::CONTENT_TYPE));
    }
}
