//! Error handling for the API.

pub mod binding;
pub mod error_code;

pub use binding::{BindError, FormatError, IdentityError};
pub use error_code::ErrorCode;
