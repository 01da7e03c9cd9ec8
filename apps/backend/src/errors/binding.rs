//! Errors raised by the query binder and the response formatter.
//!
//! These are HTTP-agnostic. The web layer converts them into `AppError`
//! through the `From` impls in `crate::error`.

use thiserror::Error;

/// Failure to derive the authenticated customer id from request claims.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The `sub` claim is present but cannot be read as an integer id.
    #[error("invalid access token: {detail}")]
    MalformedSubject { detail: String },
    /// An identity was required but the request carries no verified claims.
    #[error("authentication required")]
    Missing,
}

impl IdentityError {
    pub fn malformed_subject(detail: impl Into<String>) -> Self {
        Self::MalformedSubject {
            detail: detail.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindError {
    /// The destination has a `customer_id` field but no identity could be
    /// determined. Aborts the whole bind.
    #[error("cannot bind `{field}`: {source}")]
    Authentication {
        field: &'static str,
        #[source]
        source: IdentityError,
    },
    /// A value was present for `key` but the field's kind cannot hold it.
    #[error("cannot bind `{field}` from `{key}`: unsupported field type")]
    UnsupportedType { field: &'static str, key: String },
}

impl BindError {
    /// Name of the destination field that failed.
    pub fn field(&self) -> &'static str {
        match self {
            BindError::Authentication { field, .. } => field,
            BindError::UnsupportedType { field, .. } => field,
        }
    }
}

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("failed to serialize response: {0}")]
    Serialization(#[from] serde_json::Error),
}
