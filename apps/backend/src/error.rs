use std::collections::BTreeMap;

use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;
use tracing::{error, warn};

use crate::errors::{BindError, ErrorCode, FormatError, IdentityError};
use crate::response::ApiResponse;
use crate::trace_ctx;

/// Message shown to clients for failures whose detail must stay server-side.
const MSG_SYSTEM_ERROR: &str = "Something went wrong on our side. Please try again later.";
/// Message shown to clients when the database or network is unreachable.
const MSG_NETWORK_ERROR: &str =
    "The service is experiencing network problems. Please try again in a few moments.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation {
        detail: String,
        fields: BTreeMap<String, String>,
    },
    #[error("Bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("Not found: {detail}")]
    NotFound { detail: String },
    #[error("Unauthorized: {detail}")]
    Unauthorized { detail: String },
    #[error("Forbidden")]
    Forbidden,
    #[error("Unsupported media type: {detail}")]
    UnsupportedMediaType { detail: String },
    #[error("Database error: {detail}")]
    Db { detail: String },
    #[error("Database unavailable: {detail}")]
    DbUnavailable { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } => ErrorCode::WrongArgs,
            AppError::BadRequest { code, .. } => *code,
            AppError::NotFound { .. } => ErrorCode::NotFound,
            AppError::Unauthorized { .. } => ErrorCode::Unauthorized,
            AppError::Forbidden => ErrorCode::Forbidden,
            AppError::UnsupportedMediaType { .. } => ErrorCode::InvalidMimeType,
            AppError::Db { .. } => ErrorCode::InternalError,
            AppError::DbUnavailable { .. } => ErrorCode::DbUnavailable,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::Db { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DbUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text safe to show to clients. Server-side failures never echo their
    /// detail.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation { detail, .. }
            | AppError::BadRequest { detail, .. }
            | AppError::NotFound { detail }
            | AppError::Unauthorized { detail }
            | AppError::UnsupportedMediaType { detail } => detail.clone(),
            AppError::Forbidden => "Access denied".to_string(),
            AppError::DbUnavailable { .. } => MSG_NETWORK_ERROR.to_string(),
            AppError::Db { .. } | AppError::Internal { .. } | AppError::Config { .. } => {
                MSG_SYSTEM_ERROR.to_string()
            }
        }
    }

    pub fn invalid(detail: impl Into<String>, fields: BTreeMap<String, String>) -> Self {
        Self::Validation {
            detail: detail.into(),
            fields,
        }
    }

    pub fn bad_request(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            detail: detail.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::NotFound {
            detail: detail.into(),
        }
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::Unauthorized {
            detail: detail.into(),
        }
    }

    pub fn forbidden() -> Self {
        Self::Forbidden
    }

    pub fn unsupported_media_type(detail: impl Into<String>) -> Self {
        Self::UnsupportedMediaType {
            detail: detail.into(),
        }
    }

    pub fn db(detail: impl Into<String>) -> Self {
        Self::Db {
            detail: detail.into(),
        }
    }

    pub fn db_unavailable(detail: impl Into<String>) -> Self {
        Self::DbUnavailable {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }
}

impl From<IdentityError> for AppError {
    fn from(e: IdentityError) -> Self {
        AppError::unauthorized(e.to_string())
    }
}

impl From<BindError> for AppError {
    fn from(e: BindError) -> Self {
        match e {
            BindError::Authentication { source, .. } => AppError::from(source),
            BindError::UnsupportedType { field, key } => AppError::bad_request(
                ErrorCode::WrongArgs,
                format!("Query parameter '{key}' cannot be applied to field '{field}'"),
            ),
        }
    }
}

impl From<FormatError> for AppError {
    fn from(e: FormatError) -> Self {
        AppError::internal(e.to_string())
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        match e {
            sea_orm::DbErr::RecordNotFound(detail) => AppError::not_found(detail),
            sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
                AppError::db_unavailable(e.to_string())
            }
            other => {
                let detail = other.to_string();
                if detail.to_lowercase().contains("timeout") {
                    AppError::db_unavailable(detail)
                } else {
                    AppError::db(detail)
                }
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code();
        let trace_id = trace_ctx::trace_id();

        if status.is_server_error() {
            error!(trace_id = %trace_id, code = %code, error = %self, "request failed");
        } else {
            warn!(trace_id = %trace_id, code = %code, error = %self, "request rejected");
        }

        let mut body = ApiResponse::<()>::error(code.as_str(), self.public_message(), status);
        if let AppError::Validation { fields, .. } = self {
            if !fields.is_empty() {
                body = body.with_fields(fields.clone());
            }
        }

        HttpResponse::build(status)
            .insert_header(("x-trace-id", trace_id))
            .json(body)
    }
}
