//! Entry/exit request logging.
//!
//! [`LogLayer`] emits exactly two log lines per request:
//!
//! ```text
//! < GET /foo [xyzzy]
//! > 204 GET /foo [xyzzy]
//! ```
//!
//! The `[trace]` suffix appears only when [`crate::trace_id`] finds an ID on
//! the request. The exit status is whatever the downstream handler committed,
//! rendered as `0` when it committed nothing.

use crate::handler::{BoxFuture, Handler};
use crate::trace::trace_id;
use http::{Method, StatusCode, Uri};
use talaria_core::{Request, ResponseCapture, ResponseSink};

/// Middleware that logs entry to and exit from the wrapped handler.
pub struct LogLayer<H> {
    next: H,
}

impl<H> LogLayer<H> {
    /// Wraps a handler.
    pub fn new(next: H) -> Self {
        Self { next }
    }
}

impl<H: Handler> Handler for LogLayer<H> {
    fn handle<'a>(
        &'a self,
        sink: &'a mut dyn ResponseSink,
        req: &'a mut Request,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let trace = trace_id(req).map(String::from);
            let method = req.method().clone();
            let uri = req.uri().clone();

            tracing::info!("{}", entry_line(&method, &uri, trace.as_deref()));

            let status = {
                let mut capture = ResponseCapture::new(&mut *sink);
                self.next.handle(&mut capture, req).await;
                capture.status()
            };

            tracing::info!("{}", exit_line(status, &method, &uri, trace.as_deref()));
        })
    }
}

fn entry_line(method: &Method, uri: &Uri, trace: Option<&str>) -> String {
    match trace {
        Some(trace) => format!("< {method} {uri} [{trace}]"),
        None => format!("< {method} {uri}"),
    }
}

fn exit_line(status: Option<StatusCode>, method: &Method, uri: &Uri, trace: Option<&str>) -> String {
    let code = status.map_or(0, |status| status.as_u16());
    match trace {
        Some(trace) => format!("> {code} {method} {uri} [{trace}]"),
        None => format!("> {code} {method} {uri}"),
    }
}
