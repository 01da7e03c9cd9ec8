//! Rate limiting middleware configuration helpers
//!
//! When `APPLICATION_RATE_LIMIT` is on, every route shares one in-memory
//! budget per client IP.

use std::time::Duration;

use actix_extensible_rate_limit::backend::memory::InMemoryBackend;
use actix_extensible_rate_limit::backend::SimpleInputFunctionBuilder;

/// Requests allowed per client IP within [`API_WINDOW`].
pub const API_MAX_REQUESTS: u64 = 100;
pub const API_WINDOW: Duration = Duration::from_secs(60);

/// Input for general API rate limiting: 100 requests per 60 seconds per IP.
pub fn api_rate_limit_config() -> SimpleInputFunctionBuilder {
    SimpleInputFunctionBuilder::new(API_WINDOW, API_MAX_REQUESTS).real_ip_key()
}

/// Shared counter store. Build once and clone into each worker so all
/// workers draw from the same budget.
pub fn rate_limit_backend() -> InMemoryBackend {
    InMemoryBackend::builder().build()
}
