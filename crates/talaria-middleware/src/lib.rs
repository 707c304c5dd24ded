//! Handler abstraction and request middleware for Talaria.
//!
//! A [`Handler`] writes its response through a `&mut dyn ResponseSink`;
//! middleware are handlers that wrap another handler. The stack composes
//! outer-to-inner:
//!
//! ```text
//! Request → TraceLayer → LogLayer → (session gate) → (JSON adapter) → body
//! ```
//!
//! Errors from any layer bubble up through [`ErrHandler`], which turns the
//! combination of returned error, prior writes, and prior explicit status
//! into exactly one response.

pub mod err;
pub mod handler;
pub mod log;
pub mod trace;

pub use err::{err_fn, ErrFn, ErrHandler};
pub use handler::{respond, BoxFuture, Handler};
pub use log::LogLayer;
pub use trace::{trace_id, TraceLayer, TRACE_HEADERS};
