//! Process-wide request counters and the `/metrics` route.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use actix_web::http::StatusCode;
use actix_web::web;
use serde::Serialize;

use crate::error::AppError;
use crate::response::{ApiResponse, SnakeJson};
use crate::state::app_state::AppState;

/// Counters for completed requests. Updated by
/// [`TrackRequests`](crate::middleware::request_metrics::TrackRequests).
#[derive(Debug)]
pub struct RequestMetrics {
    started_at: Instant,
    requests: AtomicU64,
    client_errors: AtomicU64,
    server_errors: AtomicU64,
}

impl Default for RequestMetrics {
    fn default() -> Self {
        Self {
            started_at: Instant::now(),
            requests: AtomicU64::new(0),
            client_errors: AtomicU64::new(0),
            server_errors: AtomicU64::new(0),
        }
    }
}

impl RequestMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one completed request with its final status.
    pub fn record(&self, status: StatusCode) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        if status.is_client_error() {
            self.client_errors.fetch_add(1, Ordering::Relaxed);
        } else if status.is_server_error() {
            self.server_errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime_seconds: self.started_at.elapsed().as_secs(),
            requests_total: self.requests.load(Ordering::Relaxed),
            client_errors: self.client_errors.load(Ordering::Relaxed),
            server_errors: self.server_errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of [`RequestMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub uptime_seconds: u64,
    pub requests_total: u64,
    pub client_errors: u64,
    pub server_errors: u64,
}

async fn metrics(
    app_state: web::Data<AppState>,
) -> Result<SnakeJson<ApiResponse<MetricsSnapshot>>, AppError> {
    Ok(SnakeJson::ok(ApiResponse::success(
        app_state.metrics.snapshot(),
    )))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/metrics", web::get().to(metrics));
}
