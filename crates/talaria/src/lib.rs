//! # Talaria
//!
//! **Composable HTTP middleware for async Rust services**
//!
//! Talaria is a small stack of HTTP building blocks:
//!
//! - **Error normalization** – handlers return `Result`; one adapter turns
//!   every outcome into exactly one well-formed response
//! - **Typed JSON adapters** – plain functions become validated POST+JSON
//!   endpoints
//! - **Sessions and CSRF** – a cookie-resolved session gate and HMAC-based
//!   CSRF tokens
//! - **Request tracing and logging** – trace IDs from inbound headers or
//!   the CSPRNG, with structured entry/exit lines
//! - **Rate-limited outbound HTTP** – a limiter-fronted client transport
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use talaria::prelude::*;
//!
//! let app = json_in_out(|_env: &Env, input: Greeting| -> TalariaResult<Reply> {
//!     Ok(Reply { message: format!("hello, {}", input.name) })
//! });
//!
//! let handler = TraceLayer::new(LogLayer::new(app));
//! let response = respond(&handler, request).await;
//! ```
//!
//! ## Architecture
//!
//! Middleware layers nest outermost-first around a handler:
//!
//! ```text
//! Request → TraceLayer → LogLayer → SessionGate → ErrHandler → your function
//!                                                                  ↓
//! Response ←──────────────── one normalized reply ←───────────────┘
//! ```

#![doc(html_root_url = "https://docs.rs/talaria/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use talaria_core as core;

// Re-export middleware types
pub use talaria_middleware as middleware;

// Re-export JSON adapter types
pub use talaria_json as json;

// Re-export session types
pub use talaria_session as session;

// Re-export outbound client types
pub use talaria_client as client;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use talaria::prelude::*;
/// ```
pub mod prelude {
    pub use talaria_core::{
        error_reply, text_reply, BufferedSink, CodedError, Request, Responder, Response,
        ResponseCapture, ResponseSink, TalariaError, TalariaResult,
    };

    // Re-export the handler seam and layers
    pub use talaria_middleware::{
        err_fn, respond, BoxFuture, ErrFn, ErrHandler, Handler, LogLayer, TraceLayer,
    };

    // Re-export the JSON adapters
    pub use talaria_json::{json, json_in, json_in_out, json_out, Env};

    // Re-export session types
    pub use talaria_session::{
        cancel_session, csrf_check, csrf_token, session_gate, Session, SessionError, SessionGate,
        SessionStore,
    };

    // Re-export outbound transport types
    pub use talaria_client::{DefaultTransport, Limiter, RateLimitedTransport, Transport};
}
