#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod auth;
pub mod casing;
pub mod config;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod health;
pub mod infra;
pub mod metrics;
pub mod middleware;
pub mod query;
pub mod response;
pub mod routes;
pub mod state;
pub mod trace_ctx;

// Re-exports for public API
pub use auth::identity::{customer_id_from_claims, ClaimsIdentity};
pub use auth::jwt::{mint_access_token, verify_access_token, Claims};
pub use casing::{snake_case_json_keys, to_snake_case};
pub use config::AppConfig;
pub use error::AppError;
pub use extractors::{AuthClaims, BoundQuery, CustomerId};
pub use infra::db::connect_db;
pub use middleware::cors::cors_middleware;
pub use middleware::jwt_extract::JwtExtract;
pub use middleware::request_metrics::TrackRequests;
pub use middleware::request_trace::RequestTrace;
pub use middleware::structured_logger::StructuredLogger;
pub use middleware::trace_span::TraceSpan;
pub use query::{bind, FieldTable, Pagination, PaginationFilter, QueryParams};
pub use response::{ApiResponse, SnakeJson};
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
