//! Adapter constructors.
//!
//! Each constructor wraps a function in a validation shell and composes it
//! over [`ErrHandler`], so every failure (wrong method, wrong media type,
//! undecodable body, or an error returned by the function) flows through
//! the standard disposition logic.

use crate::env::Env;
use crate::reply::reply_json;
use http::{header, StatusCode};
use mime::Mime;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use talaria_core::{CodedError, Request, ResponseSink, TalariaError, TalariaResult};
use talaria_middleware::{BoxFuture, ErrFn, ErrHandler};

/// Adapts a function with neither input nor output.
///
/// No method or media-type check is performed; a successful return
/// finalizes as 204.
pub fn json<F>(f: F) -> ErrHandler<UnitFn<F>>
where
    F: Fn(&Env<'_>) -> TalariaResult<()> + Send + Sync,
{
    ErrHandler::new(UnitFn { f })
}

/// Adapts a function producing a JSON output.
///
/// The output is encoded with `Content-Type: application/json;
/// charset=utf-8`; an encoding failure is reported as
/// `marshaling JSON response: …`.
pub fn json_out<F, Out>(f: F) -> ErrHandler<OutFn<F, Out>>
where
    F: Fn(&Env<'_>) -> TalariaResult<Out> + Send + Sync,
    Out: Serialize,
{
    ErrHandler::new(OutFn {
        f,
        _out: PhantomData,
    })
}

/// Adapts a function consuming a JSON input.
///
/// The request must be a `POST` with Content-Type `application/json`; the
/// body is decoded into `In` before the function runs. A decode failure is
/// reported as `unmarshaling JSON argument: …`.
pub fn json_in<F, In>(f: F) -> ErrHandler<InFn<F, In>>
where
    F: Fn(&Env<'_>, In) -> TalariaResult<()> + Send + Sync,
    In: DeserializeOwned,
{
    ErrHandler::new(InFn {
        f,
        _in: PhantomData,
    })
}

/// Adapts a function consuming a JSON input and producing a JSON output.
pub fn json_in_out<F, In, Out>(f: F) -> ErrHandler<InOutFn<F, In, Out>>
where
    F: Fn(&Env<'_>, In) -> TalariaResult<Out> + Send + Sync,
    In: DeserializeOwned,
    Out: Serialize,
{
    ErrHandler::new(InOutFn {
        f,
        _in: PhantomData,
        _out: PhantomData,
    })
}

/// Body for [`json`].
pub struct UnitFn<F> {
    f: F,
}

impl<F> ErrFn for UnitFn<F>
where
    F: Fn(&Env<'_>) -> TalariaResult<()> + Send + Sync,
{
    fn call<'a>(
        &'a self,
        _sink: &'a mut dyn ResponseSink,
        req: &'a mut Request,
    ) -> BoxFuture<'a, TalariaResult<()>> {
        Box::pin(async move { (self.f)(&Env::new(req)) })
    }
}

/// Body for [`json_out`].
pub struct OutFn<F, Out> {
    f: F,
    _out: PhantomData<fn() -> Out>,
}

impl<F, Out> ErrFn for OutFn<F, Out>
where
    F: Fn(&Env<'_>) -> TalariaResult<Out> + Send + Sync,
    Out: Serialize,
{
    fn call<'a>(
        &'a self,
        sink: &'a mut dyn ResponseSink,
        req: &'a mut Request,
    ) -> BoxFuture<'a, TalariaResult<()>> {
        Box::pin(async move {
            let out = (self.f)(&Env::new(req))?;
            reply_json(sink, &out).map_err(|err| err.context("marshaling JSON response"))
        })
    }
}

/// Body for [`json_in`].
pub struct InFn<F, In> {
    f: F,
    _in: PhantomData<fn() -> In>,
}

impl<F, In> ErrFn for InFn<F, In>
where
    F: Fn(&Env<'_>, In) -> TalariaResult<()> + Send + Sync,
    In: DeserializeOwned,
{
    fn call<'a>(
        &'a self,
        _sink: &'a mut dyn ResponseSink,
        req: &'a mut Request,
    ) -> BoxFuture<'a, TalariaResult<()>> {
        Box::pin(async move {
            let input = decode_input::<In>(req)?;
            (self.f)(&Env::new(req), input)
        })
    }
}

/// Body for [`json_in_out`].
pub struct InOutFn<F, In, Out> {
    f: F,
    _in: PhantomData<fn() -> In>,
    _out: PhantomData<fn() -> Out>,
}

impl<F, In, Out> ErrFn for InOutFn<F, In, Out>
where
    F: Fn(&Env<'_>, In) -> TalariaResult<Out> + Send + Sync,
    In: DeserializeOwned,
    Out: Serialize,
{
    fn call<'a>(
        &'a self,
        sink: &'a mut dyn ResponseSink,
        req: &'a mut Request,
    ) -> BoxFuture<'a, TalariaResult<()>> {
        Box::pin(async move {
            let input = decode_input::<In>(req)?;
            let out = (self.f)(&Env::new(req), input)?;
            reply_json(sink, &out).map_err(|err| err.context("marshaling JSON response"))
        })
    }
}

/// Validates method and media type, then decodes the body.
fn decode_input<In: DeserializeOwned>(req: &Request) -> TalariaResult<In> {
    if !req.method().as_str().eq_ignore_ascii_case("POST") {
        return Err(CodedError::new(StatusCode::METHOD_NOT_ALLOWED).into());
    }
    check_content_type(req)?;
    serde_json::from_slice(req.body())
        .map_err(|err| TalariaError::wrap("unmarshaling JSON argument", err))
}

/// Requires a parseable Content-Type whose base media type is
/// `application/json`; parameters such as `charset` are ignored.
fn check_content_type(req: &Request) -> TalariaResult<()> {
    let value = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let media: Mime = value
        .parse()
        .map_err(|err| CodedError::with_source(StatusCode::BAD_REQUEST, anyhow::Error::new(err)))?;
    if media.type_() == mime::APPLICATION && media.subtype() == mime::JSON {
        Ok(())
    } else {
        Err(CodedError::new(StatusCode::BAD_REQUEST).into())
    }
}
