//! The session gate middleware.

use crate::store::{get_session, is_no_session, Session, SessionError, SessionStore};
use chrono::Utc;
use http::StatusCode;
use std::sync::Arc;
use talaria_core::{CodedError, Request, ResponseSink, TalariaResult};
use talaria_middleware::{BoxFuture, ErrFn, ErrHandler, Handler};

/// Private extension key for the resolved session.
#[derive(Clone)]
struct SessionHandle(Arc<dyn Session>);

/// Middleware that requires a valid session on every request.
///
/// The session key is read from the named cookie and resolved through the
/// store. A missing cookie, an unknown key, or an inactive or expired
/// session produce a 403; a store failure produces a 500. On success the
/// session rides the request extensions, where [`session`] retrieves it
/// for downstream handlers.
pub struct SessionGate<S, H> {
    store: S,
    cookie_name: String,
    next: H,
}

/// Wraps a handler in a [`SessionGate`] over the given store and cookie.
pub fn session_gate<S, H>(store: S, cookie_name: &str, next: H) -> ErrHandler<SessionGate<S, H>>
where
    S: SessionStore,
    H: Handler,
{
    ErrHandler::new(SessionGate {
        store,
        cookie_name: cookie_name.to_string(),
        next,
    })
}

impl<S, H> ErrFn for SessionGate<S, H>
where
    S: SessionStore,
    H: Handler,
{
    fn call<'a>(
        &'a self,
        sink: &'a mut dyn ResponseSink,
        req: &'a mut Request,
    ) -> BoxFuture<'a, TalariaResult<()>> {
        Box::pin(async move {
            let session = match get_session(&self.store, &self.cookie_name, req).await {
                Ok(session) => session,
                Err(err) if is_no_session(&err) => {
                    return Err(CodedError::with_source(
                        StatusCode::FORBIDDEN,
                        anyhow::Error::new(err),
                    )
                    .into());
                }
                Err(err) => {
                    return Err(anyhow::Error::new(err).context("getting session").into());
                }
            };
            if !session.is_valid(Utc::now()) {
                return Err(CodedError::with_source(
                    StatusCode::FORBIDDEN,
                    anyhow::Error::new(SessionError::Inactive),
                )
                .into());
            }
            req.extensions_mut().insert(SessionHandle(session));
            self.next.handle(sink, req).await;
            Ok(())
        })
    }
}

/// Returns the session attached to a request by [`SessionGate`], if any.
#[must_use]
pub fn session(req: &Request) -> Option<&Arc<dyn Session>> {
    req.extensions().get::<SessionHandle>().map(|h| &h.0)
}
