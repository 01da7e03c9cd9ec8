use std::collections::BTreeMap;

use actix_web::http::StatusCode;
use serde::Serialize;

use crate::query::Pagination;

pub const MSG_DATA_RETRIEVED: &str = "Data retrieved successfully";
pub const MSG_DATA_NOT_FOUND: &str = "Data not found!";

/// Outer JSON shape of every API response. Empty members are omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T = serde_json::Value> {
    /// Per-field validation messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
    /// Error code or coarse status tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

fn is_zero(code: &u16) -> bool {
    *code == 0
}

impl<T> Default for ApiResponse<T> {
    fn default() -> Self {
        Self {
            fields: None,
            status: None,
            success: false,
            message: None,
            status_code: 0,
            data: None,
        }
    }
}

impl<T> ApiResponse<T> {
    /// 200 with data and the default success message.
    pub fn success(data: T) -> Self {
        Self::success_with_data_message(data, MSG_DATA_RETRIEVED)
    }

    pub fn success_with_data_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            status_code: StatusCode::OK.as_u16(),
            message: Some(message.into()),
            data: Some(data),
            ..Self::default()
        }
    }

    /// 200 carrying only a message.
    pub fn success_with_message(message: impl Into<String>) -> Self {
        Self::success_with_status(message, StatusCode::OK)
    }

    /// Success carrying only a message, with an explicit status code in the
    /// body (e.g. 201 after a create).
    pub fn success_with_status(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            success: true,
            status_code: status.as_u16(),
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Error body: `status` carries the error code.
    pub fn error(code: &str, message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            status: Some(code.to_string()),
            message: Some(message.into()),
            status_code: status.as_u16(),
            ..Self::default()
        }
    }

    pub fn with_fields(mut self, fields: BTreeMap<String, String>) -> Self {
        self.fields = Some(fields);
        self
    }
}

/// Empty page shape used by the "no data" responses.
pub type EmptyPage = Pagination<Vec<serde_json::Value>>;

fn empty_page() -> EmptyPage {
    Pagination {
        total: 0,
        data: Vec::new(),
    }
}

impl ApiResponse<EmptyPage> {
    /// Successful lookup that matched nothing.
    pub fn empty_data() -> Self {
        Self {
            success: true,
            status_code: StatusCode::OK.as_u16(),
            message: Some(MSG_DATA_NOT_FOUND.to_string()),
            data: Some(empty_page()),
            ..Self::default()
        }
    }

    /// Failed lookup that still hands the client an empty page.
    /// An empty `message` falls back to the "not found" text.
    pub fn error_with_empty_data(message: &str) -> Self {
        let message = if message.is_empty() {
            MSG_DATA_NOT_FOUND
        } else {
            message
        };
        Self {
            status: Some("ERROR".to_string()),
            status_code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            message: Some(message.to_string()),
            data: Some(empty_page()),
            ..Self::default()
        }
    }
}
