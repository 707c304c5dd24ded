//! The standalone JSON response helper.

use http::{header, HeaderValue};
use serde::Serialize;
use talaria_core::{ResponseSink, TalariaResult};

/// Responds to a request with a JSON-encoded object.
///
/// Sets `Content-Type: application/json; charset=utf-8` and writes the
/// pretty-encoded value followed by a newline. Serialization happens before
/// anything is written, so a failure leaves the body untouched.
pub fn reply_json<T: Serialize + ?Sized>(
    sink: &mut dyn ResponseSink,
    value: &T,
) -> TalariaResult<()> {
    sink.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );
    let mut body = serde_json::to_vec_pretty(value).map_err(anyhow::Error::from)?;
    body.push(b'\n');
    sink.write(&body).map_err(anyhow::Error::from)?;
    Ok(())
}
