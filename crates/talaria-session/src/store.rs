//! Session and store capabilities.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use talaria_core::Request;
use thiserror::Error;

/// The length in bytes of a session's CSRF key.
pub const CSRF_KEY_LEN: usize = 32;

/// An authenticated session, as stored in a [`SessionStore`].
pub trait Session: Send + Sync {
    /// A persistent random secret unique to this session's lifetime,
    /// used to anchor CSRF tokens.
    fn csrf_key(&self) -> [u8; CSRF_KEY_LEN];

    /// True from creation until the session is canceled.
    fn active(&self) -> bool;

    /// The expiration time of the session.
    fn expires_at(&self) -> DateTime<Utc>;

    /// True iff the session is active and unexpired as of `now`.
    fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.active() && self.expires_at() > now
    }
}

/// Errors produced while resolving or checking sessions.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The request carried no session cookie.
    #[error("no session cookie")]
    NoCookie,

    /// The store holds no session under the presented key.
    #[error("no session")]
    NoSession,

    /// The session exists but is canceled or past its expiry.
    #[error("session inactive or expired")]
    Inactive,

    /// A presented CSRF token failed verification.
    #[error("CSRF check failed")]
    Csrf,

    /// The store itself failed.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// True when the error means "the caller simply has no session": either
/// no cookie was presented or the store does not know the key. Both cases
/// gate to 403 rather than 500.
#[must_use]
pub fn is_no_session(err: &SessionError) -> bool {
    matches!(err, SessionError::NoCookie | SessionError::NoSession)
}

/// Persistent storage for session objects.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Gets the session with the given key, or
    /// [`SessionError::NoSession`] when none exists.
    async fn get(&self, key: &str) -> Result<Arc<dyn Session>, SessionError>;

    /// Cancels the session with the given key.
    ///
    /// Idempotent: canceling an unknown, already-canceled, or expired
    /// session silently succeeds.
    async fn cancel(&self, key: &str) -> Result<(), SessionError>;
}

/// Resolves the session for a request: reads the named cookie and looks its
/// value up in the store.
pub async fn get_session(
    store: &dyn SessionStore,
    cookie_name: &str,
    req: &Request,
) -> Result<Arc<dyn Session>, SessionError> {
    let key = request_cookie(req, cookie_name).ok_or(SessionError::NoCookie)?;
    store.get(&key).await
}

/// Best-effort logout: cancels the session named by the request cookie.
///
/// A missing cookie is not an error; there is simply nothing to cancel.
pub async fn cancel_session(
    store: &dyn SessionStore,
    cookie_name: &str,
    req: &Request,
) -> Result<(), SessionError> {
    match request_cookie(req, cookie_name) {
        Some(key) => store.cancel(&key).await,
        None => Ok(()),
    }
}

/// Finds a cookie by name across the request's `Cookie` headers.
pub(crate) fn request_cookie(req: &Request, name: &str) -> Option<String> {
    for header in req.headers().get_all(http::header::COOKIE) {
        let Ok(value) = header.to_str() else { continue };
        for pair in value.split(';') {
            if let Some((key, val)) = pair.trim().split_once('=') {
                if key.trim() == name {
                    return Some(val.trim().trim_matches('"').to_string());
                }
            }
        }
    }
    None
}
