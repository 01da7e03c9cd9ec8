//! Error codes for the API.
//!
//! Every error response carries one of these in its `status` field. Add new
//! codes here; never pass ad-hoc strings as error codes.

use core::fmt;

/// Centralized error codes, rendered as SCREAMING_SNAKE_CASE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Malformed or unusable request arguments
    WrongArgs,
    /// Requested resource does not exist
    NotFound,
    /// Unexpected server-side failure
    InternalError,
    /// Missing, invalid or expired credentials
    Unauthorized,
    /// Authenticated but not allowed
    Forbidden,
    /// Request body has an unsupported content type
    InvalidMimeType,
    /// Server configuration is missing or invalid
    ConfigError,
    /// Database could not be reached
    DbUnavailable,
}

impl ErrorCode {
    /// Returns the canonical string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WrongArgs => "WRONG_ARGS",
            Self::NotFound => "NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::InvalidMimeType => "INVALID_MIME_TYPE",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
        }
    }

    pub const ALL: [ErrorCode; 8] = [
        Self::WrongArgs,
        Self::NotFound,
        Self::InternalError,
        Self::Unauthorized,
        Self::Forbidden,
        Self::InvalidMimeType,
        Self::ConfigError,
        Self::DbUnavailable,
    ];
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
