//! Task-local trace id for the request being served.
//!
//! `RequestTrace` runs each downstream future inside [`with_trace_id`], so
//! anything executed for that request (error responses in particular) can
//! read the id without threading the `HttpRequest` through.

use tokio::task_local;

task_local! {
    static TRACE_ID: String;
}

/// Placeholder used outside a request scope.
pub const UNKNOWN_TRACE_ID: &str = "unknown";

/// Trace id of the current request, or `"unknown"` outside of one.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(Clone::clone)
        .unwrap_or_else(|_| UNKNOWN_TRACE_ID.to_string())
}

/// Run `future` with `trace_id` as the current request's trace id.
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}
