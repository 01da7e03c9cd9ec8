//! Backend test support utilities
//!
//! Unified logging initialization and response envelope assertions shared
//! by the backend's unit and integration tests.

pub mod envelope;
pub mod logging;

pub use envelope::{assert_error_envelope, object_keys, read_json};
