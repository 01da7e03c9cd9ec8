//! Error responses share one envelope shape and carry the request's trace id.

mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App, HttpResponse};
use backend_test_support::assert_error_envelope;
use skeleton_api::errors::ErrorCode;
use skeleton_api::middleware::request_trace::RequestTrace;
use skeleton_api::middleware::trace_span::TraceSpan;
use skeleton_api::{routes, AppError};

use common::test_state;

async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::not_found("Order 9 not found"))
}

async fn wrong_args() -> Result<HttpResponse, AppError> {
    Err(AppError::bad_request(ErrorCode::WrongArgs, "page must be a number"))
}

async fn internal() -> Result<HttpResponse, AppError> {
    Err(AppError::internal("connection string leaked: postgres://secret"))
}

macro_rules! app {
    () => {
        test::init_service(
            App::new()
                .wrap(TraceSpan)
                .wrap(RequestTrace)
                .app_data(web::Data::new(test_state()))
                .route("/not-found", web::get().to(not_found))
                .route("/wrong-args", web::get().to(wrong_args))
                .route("/internal", web::get().to(internal))
                .configure(routes::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn test_handler_errors_use_the_envelope() {
    let app = app!();

    let req = test::TestRequest::get().uri("/not-found").to_request();
    let resp = test::call_service(&app, req).await;
    assert_error_envelope(resp, "NOT_FOUND", StatusCode::NOT_FOUND, Some("Order 9")).await;

    let req = test::TestRequest::get().uri("/wrong-args").to_request();
    let resp = test::call_service(&app, req).await;
    assert_error_envelope(
        resp,
        "WRONG_ARGS",
        StatusCode::BAD_REQUEST,
        Some("page must be a number"),
    )
    .await;
}

#[actix_web::test]
async fn test_internal_errors_hide_detail() {
    let app = app!();

    let req = test::TestRequest::get().uri("/internal").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = test::read_body(resp).await;
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(!text.contains("postgres://secret"));
    assert!(text.contains("INTERNAL_ERROR"));
}

#[actix_web::test]
async fn test_trace_id_header_matches_request_id() {
    let app = app!();

    // Handler error
    let req = test::TestRequest::get().uri("/not-found").to_request();
    let resp = test::call_service(&app, req).await;
    let trace_id = resp.headers().get("x-trace-id").unwrap().to_str().unwrap();
    let request_id = resp.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert_eq!(trace_id, request_id);

    // Middleware error
    let req = test::TestRequest::get().uri("/check-health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let trace_id = resp.headers().get("x-trace-id").unwrap().to_str().unwrap();
    let request_id = resp.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert_eq!(trace_id, request_id);
    assert_ne!(trace_id, skeleton_api::trace_ctx::UNKNOWN_TRACE_ID);
}
