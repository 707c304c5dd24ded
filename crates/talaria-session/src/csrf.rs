//! HMAC-based CSRF tokens.
//!
//! A token is `base64url(nonce || HMAC-SHA256(nonce, key))` with no
//! padding, where the nonce is fresh CSPRNG output and the key is the
//! session's [`csrf_key`](crate::Session::csrf_key). Tokens are therefore
//! bound to one session and unlinkable across sessions, and verification
//! needs no storage.

use crate::store::{Session, SessionError};
use anyhow::Context as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore as _;
use sha2::Sha256;

/// The length in bytes of a token's random nonce.
pub const CSRF_NONCE_LEN: usize = 16;

type HmacSha256 = Hmac<Sha256>;

/// Mints a CSRF token bound to the session.
pub fn csrf_token(session: &dyn Session) -> Result<String, SessionError> {
    let mut nonce = [0u8; CSRF_NONCE_LEN];
    OsRng
        .try_fill_bytes(&mut nonce)
        .context("generating random nonce")?;

    let sum = csrf_sum(&nonce, &session.csrf_key());
    let mut raw = nonce.to_vec();
    raw.extend_from_slice(&sum);
    Ok(URL_SAFE_NO_PAD.encode(raw))
}

/// Verifies a CSRF token against the session.
///
/// A token that is not valid base64url surfaces as
/// [`SessionError::Store`]; a decoded token of the wrong length or with a
/// bad MAC is [`SessionError::Csrf`]. The MAC comparison is constant-time.
pub fn csrf_check(session: &dyn Session, token: &str) -> Result<(), SessionError> {
    let raw = URL_SAFE_NO_PAD
        .decode(token)
        .context("decoding base64")
        .map_err(SessionError::Store)?;

    if raw.len() != CSRF_NONCE_LEN + 32 {
        return Err(SessionError::Csrf);
    }
    let (nonce, sum) = raw.split_at(CSRF_NONCE_LEN);

    let mut mac = HmacSha256::new_from_slice(&session.csrf_key())
        .expect("HMAC accepts any key length");
    mac.update(nonce);
    mac.verify_slice(sum).map_err(|_| SessionError::Csrf)
}

/// HMAC-SHA256 of the nonce under the session key.
fn csrf_sum(nonce: &[u8], key: &[u8]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(nonce);
    mac.finalize().into_bytes().into()
}
