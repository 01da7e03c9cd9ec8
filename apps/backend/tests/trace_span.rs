//! Integration test for handler logs inheriting `trace_id` and the caller's
//! identity via the request span.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use actix_web::{test, web, App, HttpResponse};
use serde_json::Value;
use serial_test::serial;
use skeleton_api::middleware::jwt_extract::JwtExtract;
use skeleton_api::middleware::request_trace::RequestTrace;
use skeleton_api::middleware::structured_logger::StructuredLogger;
use skeleton_api::middleware::trace_span::TraceSpan;
use skeleton_api::{mint_access_token, AppState, SecurityConfig};
use tracing::info;
use tracing::subscriber::set_global_default;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::Registry;

/// Simple writer that appends JSON lines to a shared Vec<u8>.
#[derive(Clone)]
struct BufWriter(Arc<Mutex<Vec<u8>>>);

impl Write for BufWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self.0.lock().unwrap();
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Find the "request" span attached to the first event whose message
/// contains `needle`.
fn request_span_for(data: &str, needle: &str) -> Option<Value> {
    for line in data.lines() {
        let Ok(v) = serde_json::from_str::<Value>(line) else {
            continue; // ignore any non-JSON noise
        };

        let msg = v
            .get("fields")
            .and_then(|f| f.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("");
        if !msg.contains(needle) {
            continue;
        }

        return v
            .get("spans")
            .and_then(Value::as_array)
            .and_then(|spans| {
                spans
                    .iter()
                    .find(|s| s.get("name").and_then(Value::as_str) == Some("request"))
                    .cloned()
            });
    }
    None
}

#[actix_web::test]
#[serial]
async fn handler_logs_are_in_request_span_with_trace_id() {
    // ---- 1) In-memory JSON logger that records span list, globally (worker threads) ----
    let buf = Arc::new(Mutex::new(Vec::new()));
    let make_writer = {
        let buf = buf.clone();
        move || BufWriter(buf.clone())
    };

    let subscriber = Registry::default().with(
        fmt::Layer::default()
            .json()
            .with_span_list(true)
            .with_current_span(true)
            .with_ansi(false)
            .with_writer(make_writer),
    );
    set_global_default(subscriber).expect("set global subscriber");

    // ---- 2) Minimal app ----
    let security = SecurityConfig::hmac("trace-span-secret");
    let app = test::init_service(
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(web::Data::new(AppState::without_db(security.clone())))
            .route(
                "/ping",
                web::get().to(|| async {
                    info!("inside public handler");
                    HttpResponse::Ok().finish()
                }),
            )
            .service(
                web::resource("/private").wrap(JwtExtract).route(web::get().to(|| async {
                    info!("inside guarded handler");
                    HttpResponse::Ok().finish()
                })),
            ),
    )
    .await;

    // ---- 3) Public request: span carries the trace id ----
    let req = test::TestRequest::get().uri("/ping").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let trace_id = resp
        .headers()
        .get("x-request-id")
        .expect("x-request-id header present")
        .to_str()
        .unwrap()
        .to_string();

    // ---- 4) Guarded request: span also carries the caller's identity ----
    let token = mint_access_token(77, None, SystemTime::now(), &security).unwrap();
    let req = test::TestRequest::get()
        .uri("/private")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let data = {
        let bytes = buf.lock().unwrap().clone();
        String::from_utf8(bytes).expect("utf8")
    };

    let public_span =
        request_span_for(&data, "inside public handler").expect("public handler log in span");
    assert_eq!(
        public_span.get("trace_id").and_then(Value::as_str),
        Some(trace_id.as_str()),
        "handler log did not inherit trace_id via active request span"
    );
    assert!(public_span.get("user_id").is_none());

    let guarded_span =
        request_span_for(&data, "inside guarded handler").expect("guarded handler log in span");
    assert_eq!(guarded_span.get("user_id").and_then(Value::as_i64), Some(77));
    assert!(guarded_span
        .get("jwt_id")
        .and_then(Value::as_str)
        .is_some_and(|jti| !jti.is_empty()));
}
