//! Authenticated sessions and CSRF protection.
//!
//! Sessions are created and persisted elsewhere; this crate only reads
//! them. [`SessionGate`] resolves a session from a request cookie and
//! attaches it for downstream handlers; [`csrf_token`] and [`csrf_check`]
//! implement the HMAC-based token scheme a session's
//! [`csrf_key`](Session::csrf_key) anchors.

pub mod csrf;
pub mod gate;
pub mod store;

pub use csrf::{csrf_check, csrf_token, CSRF_NONCE_LEN};
pub use gate::{session, session_gate, SessionGate};
pub use store::{
    cancel_session, get_session, is_no_session, Session, SessionError, SessionStore,
};
