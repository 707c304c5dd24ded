//! Error types and plain-text error replies.
//!
//! Handler bodies return [`TalariaError`]. The error-normalizing adapter
//! inspects the returned error for a [`Responder`] (an error that fully
//! describes its own HTTP response) and falls back to a 500 with the error
//! message otherwise. [`CodedError`] is the canonical responder: an HTTP
//! status plus an optional cause.

use crate::sink::ResponseSink;
use http::{header, HeaderValue, StatusCode};
use std::error::Error as StdError;
use std::fmt;

/// Result alias for handler bodies.
pub type TalariaResult<T> = Result<T, TalariaError>;

/// An object that knows how to respond to an HTTP request on its own.
///
/// Errors implementing `Responder` short-circuit the default error handling:
/// instead of a generic 500, their [`respond`](Responder::respond) method is
/// invoked against the original response sink.
pub trait Responder: fmt::Display + Send + Sync {
    /// Writes this object's response to the sink.
    fn respond(&self, sink: &mut dyn ResponseSink);
}

/// An error carrying an HTTP status code.
///
/// Returned from a handler body, a `CodedError` controls the status of the
/// pending response. Its rendered form is
/// `HTTP <code>: <reason>[: <cause>]`, and its [`Responder`] implementation
/// writes that text as a plain-text body with the carried status.
///
/// # Example
///
/// ```
/// use talaria_core::CodedError;
/// use http::StatusCode;
///
/// let err = CodedError::new(StatusCode::METHOD_NOT_ALLOWED);
/// assert_eq!(err.to_string(), "HTTP 405: Method Not Allowed");
/// ```
#[derive(Debug)]
pub struct CodedError {
    status: StatusCode,
    source: Option<anyhow::Error>,
}

impl CodedError {
    /// Creates a coded error with no cause.
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            source: None,
        }
    }

    /// Creates a coded error wrapping a cause.
    pub fn with_source(status: StatusCode, source: impl Into<anyhow::Error>) -> Self {
        Self {
            status,
            source: Some(source.into()),
        }
    }

    /// Returns the carried HTTP status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl fmt::Display for CodedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status.as_u16())?;
        if let Some(reason) = self.status.canonical_reason() {
            write!(f, ": {reason}")?;
        }
        if let Some(source) = &self.source {
            write!(f, ": {source:#}")?;
        }
        Ok(())
    }
}

impl StdError for CodedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|err| err.as_ref() as &(dyn StdError + 'static))
    }
}

impl Responder for CodedError {
    fn respond(&self, sink: &mut dyn ResponseSink) {
        text_reply(sink, self.status, &self.to_string());
    }
}

/// The error type returned by handler bodies.
///
/// Three shapes cover everything the adapters need:
///
/// - [`Coded`](TalariaError::Coded) – a [`CodedError`], found directly
/// - [`Reply`](TalariaError::Reply) – any other [`Responder`], boxed
/// - [`Other`](TalariaError::Other) – an opaque cause chain; a [`CodedError`]
///   buried anywhere in the chain is still honored
pub enum TalariaError {
    /// An error carrying an HTTP status.
    Coded(CodedError),
    /// An error that fully renders its own response.
    Reply(Box<dyn Responder + Send + Sync>),
    /// Any other error; rendered as a 500 with its message.
    Other(anyhow::Error),
}

impl TalariaError {
    /// Creates an opaque error from a message.
    pub fn msg<M>(msg: M) -> Self
    where
        M: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        Self::Other(anyhow::Error::msg(msg))
    }

    /// Creates an error from any [`Responder`].
    pub fn reply(responder: impl Responder + 'static) -> Self {
        Self::Reply(Box::new(responder))
    }

    /// Wraps a cause with a context message, like `anyhow::Context`.
    pub fn wrap<C, E>(context: C, err: E) -> Self
    where
        C: fmt::Display + Send + Sync + 'static,
        E: Into<anyhow::Error>,
    {
        Self::Other(err.into().context(context))
    }

    /// Adds a context message to this error.
    ///
    /// A wrapped [`CodedError`] moves into the cause chain but remains
    /// discoverable by [`responder`](Self::responder). `Reply` errors are
    /// left untouched so the responder is not buried.
    pub fn context<C>(self, context: C) -> Self
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        match self {
            Self::Coded(coded) => Self::Other(anyhow::Error::new(coded).context(context)),
            Self::Reply(reply) => Self::Reply(reply),
            Self::Other(err) => Self::Other(err.context(context)),
        }
    }

    /// Searches this error and its cause chain for a [`Responder`].
    ///
    /// The first match wins: a `Coded` or `Reply` error matches itself, and
    /// an `Other` chain is walked cause by cause looking for a
    /// [`CodedError`].
    #[must_use]
    pub fn responder(&self) -> Option<&dyn Responder> {
        match self {
            Self::Coded(coded) => Some(coded),
            Self::Reply(reply) => Some(reply.as_ref()),
            Self::Other(err) => err
                .chain()
                .find_map(|cause| cause.downcast_ref::<CodedError>())
                .map(|coded| coded as &dyn Responder),
        }
    }
}

impl fmt::Display for TalariaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coded(coded) => coded.fmt(f),
            Self::Reply(reply) => reply.fmt(f),
            // Alternate form renders the whole context chain,
            // "context: cause: cause".
            Self::Other(err) => write!(f, "{err:#}"),
        }
    }
}

impl fmt::Debug for TalariaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coded(coded) => f.debug_tuple("Coded").field(coded).finish(),
            Self::Reply(reply) => write!(f, "Reply({reply})"),
            Self::Other(err) => f.debug_tuple("Other").field(err).finish(),
        }
    }
}

impl StdError for TalariaError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Coded(coded) => coded.source(),
            Self::Reply(_) => None,
            Self::Other(err) => {
                let err: &(dyn StdError + 'static) = err.as_ref();
                err.source()
            }
        }
    }
}

impl From<CodedError> for TalariaError {
    fn from(err: CodedError) -> Self {
        Self::Coded(err)
    }
}

impl From<anyhow::Error> for TalariaError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err)
    }
}

/// Writes a plain-text response: status, `text/plain` content type, and the
/// body followed by a newline.
pub fn text_reply(sink: &mut dyn ResponseSink, status: StatusCode, body: &str) {
    sink.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    sink.write_status(status);
    // Best-effort terminal write, like the response path of any server:
    // there is nobody left to report a failure to.
    let _ = sink.write(body.as_bytes());
    let _ = sink.write(b"\n");
}

/// Logs a message and replies to the request with it as a plain-text body.
///
/// An empty `msg` falls back to the canonical reason phrase for `status`
/// (or `HTTP <code>` for codes without one).
///
/// # Example
///
/// ```
/// use talaria_core::{error_reply, BufferedSink};
/// use http::StatusCode;
///
/// let mut sink = BufferedSink::new();
/// error_reply(&mut sink, StatusCode::INTERNAL_SERVER_ERROR, "");
/// assert_eq!(sink.body(), b"Internal Server Error\n");
/// ```
pub fn error_reply(sink: &mut dyn ResponseSink, status: StatusCode, msg: &str) {
    let body = if msg.is_empty() {
        status
            .canonical_reason()
            .map_or_else(|| format!("HTTP {}", status.as_u16()), String::from)
    } else {
        msg.to_string()
    };
    tracing::error!("{body}");
    text_reply(sink, status, &body);
}
