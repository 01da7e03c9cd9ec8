//! Outgoing JSON encoding with snake_case keys.

use actix_web::body::BoxBody;
use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, ResponseError};
use serde::Serialize;
use tracing::error;

use crate::casing::snake_case_json_keys;
use crate::error::AppError;
use crate::errors::FormatError;

/// Serialize `value` to JSON and rewrite every object key to snake_case.
pub fn format<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, FormatError> {
    let raw = serde_json::to_string(value)?;
    Ok(snake_case_json_keys(&raw).into_bytes())
}

/// Responder that writes its value through [`format`].
#[derive(Debug)]
pub struct SnakeJson<T> {
    value: T,
    status: StatusCode,
}

impl<T> SnakeJson<T> {
    pub fn ok(value: T) -> Self {
        Self::with_status(value, StatusCode::OK)
    }

    pub fn with_status(value: T, status: StatusCode) -> Self {
        Self { value, status }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Serialize> Responder for SnakeJson<T> {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        match format(&self.value) {
            Ok(body) => HttpResponse::build(self.status)
                .insert_header(ContentType::json())
                .body(body),
            Err(e) => {
                error!(error = %e, "response serialization failed");
                AppError::from(e).error_response()
            }
        }
    }
}
