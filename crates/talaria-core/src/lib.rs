//! Core types for the Talaria HTTP middleware collection.
//!
//! This crate defines the building blocks the rest of the workspace is
//! assembled from:
//!
//! - [`ResponseSink`] – the capability a handler writes its response through,
//!   with [`BufferedSink`] as the standard in-memory implementation
//! - [`ResponseCapture`] – a sink wrapper that records the status code and
//!   byte count flowing through it
//! - [`CodedError`] and [`Responder`] – errors that carry an HTTP status and
//!   know how to render themselves as a response
//! - [`TalariaError`] – the error type handler bodies return, with cause-chain
//!   support for locating an embedded [`Responder`]
//! - [`error_reply`] – the log-and-reply helper for plain-text error responses

pub mod capture;
pub mod error;
pub mod sink;
pub mod types;

pub use capture::ResponseCapture;
pub use error::{error_reply, text_reply, CodedError, Responder, TalariaError, TalariaResult};
pub use sink::{BufferedSink, ResponseSink};
pub use types::{Request, Response};
