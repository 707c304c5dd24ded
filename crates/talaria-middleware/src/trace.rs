//! Trace ID middleware.
//!
//! [`TraceLayer`] decorates each request with a trace identifier before
//! delegating inward. The ID comes from the first non-empty header among
//! `X-Trace-Id`, `Idempotency-Key`, and `X-Idempotency-Key`; failing those,
//! 16 bytes from the system CSPRNG are hex-encoded. [`LogLayer`]
//! (see [`crate::log`]) includes the ID in its entry/exit lines.

use crate::handler::{BoxFuture, Handler};
use anyhow::Context as _;
use http::StatusCode;
use rand::rngs::OsRng;
use rand::RngCore as _;
use talaria_core::{error_reply, Request, ResponseSink};

/// Header names consulted for an inbound trace ID, in precedence order.
pub const TRACE_HEADERS: [&str; 3] = ["x-trace-id", "idempotency-key", "x-idempotency-key"];

/// Private extension key for the trace ID.
#[derive(Debug, Clone)]
struct TraceId(String);

/// Middleware that attaches a trace ID to the request.
///
/// On CSPRNG failure the chain is aborted with a 500; every other path
/// stores the ID in the request extensions and delegates to the wrapped
/// handler.
///
/// # Example
///
/// ```ignore
/// let handler = TraceLayer::new(LogLayer::new(app));
/// ```
pub struct TraceLayer<H> {
    next: H,
}

impl<H> TraceLayer<H> {
    /// Wraps a handler.
    pub fn new(next: H) -> Self {
        Self { next }
    }
}

impl<H: Handler> Handler for TraceLayer<H> {
    fn handle<'a>(
        &'a self,
        sink: &'a mut dyn ResponseSink,
        req: &'a mut Request,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let id = match request_trace_id(req) {
                Ok(id) => id,
                Err(err) => {
                    error_reply(
                        sink,
                        StatusCode::INTERNAL_SERVER_ERROR,
                        &format!("getting trace ID: {err:#}"),
                    );
                    return;
                }
            };
            req.extensions_mut().insert(TraceId(id));
            self.next.handle(sink, req).await;
        })
    }
}

/// Resolves the trace ID for a request: first non-empty trace header
/// (whitespace-trimmed), else 32 lowercase hex chars of CSPRNG output.
fn request_trace_id(req: &Request) -> anyhow::Result<String> {
    for name in TRACE_HEADERS {
        let candidate = req
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .unwrap_or_default();
        if !candidate.is_empty() {
            return Ok(candidate.to_string());
        }
    }

    let mut buf = [0u8; 16];
    OsRng
        .try_fill_bytes(&mut buf)
        .context("computing random trace ID")?;
    Ok(hex::encode(buf))
}

/// Returns the trace ID attached to a request by [`TraceLayer`], if any.
#[must_use]
pub fn trace_id(req: &Request) -> Option<&str> {
    req.extensions().get::<TraceId>().map(|id| id.0.as_str())
}
