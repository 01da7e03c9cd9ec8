//! Response envelope test helpers
//!
//! Assertions over the JSON envelope the backend writes for errors and
//! successes, without depending on backend types.

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::HeaderMap;
use actix_web::http::StatusCode;
use serde::Deserialize;
use serde_json::Value;

/// Local mirror of the backend's error envelope.
#[derive(Debug, Deserialize)]
struct ErrorEnvelopeLike {
    status: String,
    status_code: u16,
    message: String,
    #[serde(default)]
    success: bool,
}

/// Assert that response parts conform to the error contract
///
/// Validates:
/// - HTTP status matches expected and equals the body's `status_code`
/// - `x-trace-id` header exists and is non-empty
/// - `status` carries the expected error code
/// - `success` is absent or false
pub fn assert_error_envelope_from_parts(
    status: StatusCode,
    headers: &HeaderMap,
    body_bytes: &[u8],
    expected_code: &str,
    expected_status: StatusCode,
    expected_message_contains: Option<&str>,
) {
    assert_eq!(status, expected_status);

    let envelope: ErrorEnvelopeLike = serde_json::from_slice(body_bytes)
        .expect("Response body should be a valid error envelope");

    let trace_id = headers
        .get("x-trace-id")
        .expect("x-trace-id header should be present")
        .to_str()
        .expect("x-trace-id header should be valid UTF-8");
    assert!(!trace_id.is_empty(), "x-trace-id header should not be empty");

    assert_eq!(envelope.status, expected_code);
    assert_eq!(envelope.status_code, expected_status.as_u16());
    assert!(!envelope.success, "error envelopes must not report success");

    if let Some(expected) = expected_message_contains {
        assert!(
            envelope.message.contains(expected),
            "Expected message to contain '{}', but got '{}'",
            expected,
            envelope.message
        );
    }
}

/// Assert that a ServiceResponse is an error envelope
pub async fn assert_error_envelope<B: MessageBody>(
    resp: ServiceResponse<B>,
    expected_code: &str,
    expected_status: StatusCode,
    expected_message_contains: Option<&str>,
) {
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = actix_web::test::read_body(resp).await;

    assert_error_envelope_from_parts(
        status,
        &headers,
        &body,
        expected_code,
        expected_status,
        expected_message_contains,
    );
}

/// Read a ServiceResponse body as JSON, asserting the status first.
pub async fn read_json<B: MessageBody>(resp: ServiceResponse<B>, expected_status: StatusCode) -> Value {
    assert_eq!(resp.status(), expected_status);
    let body = actix_web::test::read_body(resp).await;
    serde_json::from_slice(&body).expect("Response body should be valid JSON")
}

/// Recursively collect every object key in `value`.
pub fn object_keys(value: &Value) -> Vec<String> {
    let mut keys = Vec::new();
    collect_keys(value, &mut keys);
    keys
}

fn collect_keys(value: &Value, keys: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                keys.push(key.clone());
                collect_keys(nested, keys);
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_keys(item, keys)),
        _ => {}
    }
}
