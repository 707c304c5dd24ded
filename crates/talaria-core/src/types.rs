//! Request and response type aliases.
//!
//! Talaria operates on fully buffered requests: the body is read into
//! [`Bytes`] before any middleware runs, so adapters can decode it without
//! consuming a stream. Responses use [`Full`] bodies for the same reason.

use bytes::Bytes;
use http_body_util::Full;

/// An inbound HTTP request with a fully buffered body.
pub type Request = http::Request<Bytes>;

/// An outbound HTTP response with a fully buffered body.
pub type Response = http::Response<Full<Bytes>>;
