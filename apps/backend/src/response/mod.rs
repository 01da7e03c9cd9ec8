//! Response envelope and snake_case JSON output.

pub mod envelope;
pub mod formatter;

pub use envelope::{ApiResponse, EmptyPage, MSG_DATA_NOT_FOUND, MSG_DATA_RETRIEVED};
pub use formatter::{format, SnakeJson};
