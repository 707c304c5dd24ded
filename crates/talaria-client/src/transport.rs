//! Transports and the rate-limiting wrapper.

use anyhow::Context as _;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::OnceLock;
use talaria_core::Request;

/// Admission control for some repeated operation.
///
/// `wait` blocks until the next operation may proceed. Token-bucket and
/// fixed-window limiters fit this shape; cancellation is dropping the
/// future.
#[async_trait]
pub trait Limiter: Send + Sync {
    /// Waits until the operation is allowed to proceed.
    async fn wait(&self) -> anyhow::Result<()>;
}

/// An outbound HTTP exchange: one request in, one buffered response out.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs the exchange.
    async fn round_trip(&self, req: Request) -> anyhow::Result<http::Response<Bytes>>;
}

/// A [`Transport`] backed by a reqwest client.
#[derive(Debug, Clone, Default)]
pub struct DefaultTransport {
    client: reqwest::Client,
}

impl DefaultTransport {
    /// Builds a transport around a fresh client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide shared instance.
    pub(crate) fn shared() -> &'static Self {
        static SHARED: OnceLock<DefaultTransport> = OnceLock::new();
        SHARED.get_or_init(Self::new)
    }
}

#[async_trait]
impl Transport for DefaultTransport {
    async fn round_trip(&self, req: Request) -> anyhow::Result<http::Response<Bytes>> {
        let (parts, body) = req.into_parts();
        let url = parts.uri.to_string();
        let response = self
            .client
            .request(parts.method, url.as_str())
            .headers(parts.headers)
            .body(body)
            .send()
            .await
            .with_context(|| format!("requesting {url}"))?;

        let status = response.status();
        let version = response.version();
        let headers = response.headers().clone();
        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("reading response body from {url}"))?;

        let mut out = http::Response::new(bytes);
        *out.status_mut() = status;
        *out.version_mut() = version;
        *out.headers_mut() = headers;
        Ok(out)
    }
}

/// A [`Transport`] that rate-limits the requests it makes.
///
/// Each round trip first waits for the limiter; a limiter error aborts the
/// exchange without touching the inner transport. With no inner transport
/// configured, requests go through the shared [`DefaultTransport`].
pub struct RateLimitedTransport<L> {
    limiter: L,
    inner: Option<Box<dyn Transport>>,
}

impl<L: Limiter> RateLimitedTransport<L> {
    /// Limits the shared default transport.
    #[must_use]
    pub fn new(limiter: L) -> Self {
        Self {
            limiter,
            inner: None,
        }
    }

    /// Limits a specific inner transport.
    #[must_use]
    pub fn with_inner(limiter: L, inner: Box<dyn Transport>) -> Self {
        Self {
            limiter,
            inner: Some(inner),
        }
    }
}

#[async_trait]
impl<L: Limiter> Transport for RateLimitedTransport<L> {
    async fn round_trip(&self, req: Request) -> anyhow::Result<http::Response<Bytes>> {
        self.limiter.wait().await?;
        match &self.inner {
            Some(inner) => inner.round_trip(req).await,
            None => DefaultTransport::shared().round_trip(req).await,
        }
    }
}
