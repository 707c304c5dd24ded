//! End-to-end tests for the JSON adapters.

use bytes::Bytes;
use http::{header, StatusCode};
use http_body_util::BodyExt;
use serde::{Deserialize, Serialize};
use talaria_core::{CodedError, Request, Response, TalariaResult};
use talaria_json::{json, json_in_out, json_out, Env};
use talaria_middleware::respond;

#[derive(Deserialize)]
struct JsonInput {
    a: i64,
    b: String,
}

#[derive(Serialize)]
struct JsonOutput {
    c: String,
    d: i64,
}

fn get(path: &str) -> Request {
    http::Request::builder()
        .method("GET")
        .uri(path)
        .body(Bytes::new())
        .unwrap()
}

fn post(content_type: &str, body: &str) -> Request {
    http::Request::builder()
        .method("POST")
        .uri("/t")
        .header(header::CONTENT_TYPE, content_type)
        .body(Bytes::from(body.to_string()))
        .unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn no_input_no_output_is_204_even_on_get() {
    let handler = json(|_env: &Env| Ok(()));
    let response = respond(&handler, get("/a")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(body_string(response).await, "");
}

#[tokio::test]
async fn input_output_exchange() {
    let handler = json_in_out(|_env: &Env, input: JsonInput| -> TalariaResult<JsonOutput> {
        Ok(JsonOutput {
            c: format!("{}{}", input.b, input.b),
            d: 2 * input.a,
        })
    });

    let response = respond(&handler, post("application/json", r#"{"a":206,"b":"azaz"}"#)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json; charset=utf-8"
    );

    let parsed: serde_json::Value =
        serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(parsed, serde_json::json!({"c": "azazazaz", "d": 412}));
}

#[tokio::test]
async fn coded_error_from_the_function_controls_the_reply() {
    let handler = json(|_env: &Env| Err(CodedError::new(StatusCode::METHOD_NOT_ALLOWED).into()));
    let response = respond(&handler, post("application/json", "")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_string(response).await, "HTTP 405: Method Not Allowed\n");
}

#[tokio::test]
async fn get_to_an_input_taking_handler_is_405() {
    let handler = json_in_out(|_env: &Env, input: JsonInput| -> TalariaResult<JsonOutput> {
        Ok(JsonOutput { c: input.b, d: input.a })
    });
    let response = respond(&handler, get("/j")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn method_is_not_checked_without_an_input() {
    let handler = json_out(|_env: &Env| -> TalariaResult<JsonOutput> {
        Ok(JsonOutput {
            c: "ok".to_string(),
            d: 1,
        })
    });
    let response = respond(&handler, get("/j")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn wrong_content_type_is_400() {
    let handler = json_in_out(|_env: &Env, input: JsonInput| -> TalariaResult<JsonOutput> {
        Ok(JsonOutput { c: input.b, d: input.a })
    });
    let response = respond(&handler, post("text/plain", r#"{"a":1,"b":"x"}"#)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn charset_parameter_is_accepted() {
    let handler = json_in_out(|_env: &Env, input: JsonInput| -> TalariaResult<JsonOutput> {
        Ok(JsonOutput { c: input.b, d: input.a })
    });
    let response = respond(
        &handler,
        post("application/json; charset=utf-8", r#"{"a":1,"b":"x"}"#),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn undecodable_body_is_a_500_with_prefix() {
    let handler = json_in_out(|_env: &Env, input: JsonInput| -> TalariaResult<JsonOutput> {
        Ok(JsonOutput { c: input.b, d: input.a })
    });
    let response = respond(&handler, post("application/json", "{oops")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_string(response)
        .await
        .starts_with("unmarshaling JSON argument"));
}

#[tokio::test]
async fn env_exposes_the_request() {
    let handler = json_out(|env: &Env| -> TalariaResult<String> {
        let agent = env
            .request()
            .headers()
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        Ok(agent.to_string())
    });

    let mut req = post("application/json", "");
    req.headers_mut().insert(
        header::USER_AGENT,
        header::HeaderValue::from_static("json-e2e/1.0"),
    );
    let response = respond(&handler, req).await;
    let parsed: serde_json::Value =
        serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(parsed, serde_json::json!("json-e2e/1.0"));
}

#[tokio::test]
async fn numbers_keep_arbitrary_precision_until_narrowed() {
    let handler = json_in_out(
        |_env: &Env, input: serde_json::Value| -> TalariaResult<serde_json::Value> { Ok(input) },
    );

    let digits = "123456789012345678901234567890";
    let response = respond(
        &handler,
        post("application/json", &format!(r#"{{"n":{digits}}}"#)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        body_string(response).await.contains(digits),
        "large integer should survive the round trip unnarrowed"
    );
}
