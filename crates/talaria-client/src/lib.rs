//! Rate-limited outbound HTTP.
//!
//! [`RateLimitedTransport`] composes a [`Limiter`] in front of a
//! [`Transport`]: each round trip waits for the limiter before the request
//! goes out. The inner transport defaults to a process-wide reqwest client
//! when none is supplied.

pub mod transport;

pub use transport::{DefaultTransport, Limiter, RateLimitedTransport, Transport};
