use actix_web::{web, HttpResponse};
use serde::Serialize;
use tracing::warn;

use crate::error::AppError;
use crate::infra::db::check_connection;
use crate::response::{ApiResponse, SnakeJson};
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DbHealth {
    database: &'static str,
    app_version: &'static str,
}

async fn health() -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().body("ok"))
}

/// Round-trips the database; 503 when it is missing or unreachable.
async fn health_db(
    app_state: web::Data<AppState>,
) -> Result<SnakeJson<ApiResponse<DbHealth>>, AppError> {
    let db = app_state
        .db()
        .ok_or_else(|| AppError::db_unavailable("database not configured"))?;

    check_connection(db).await.map_err(|e| {
        warn!(error = %e, "database health check failed");
        AppError::db_unavailable(e.to_string())
    })?;

    Ok(SnakeJson::ok(ApiResponse::success(DbHealth {
        database: "ok",
        app_version: env!("CARGO_PKG_VERSION"),
    })))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/health/db", web::get().to(health_db));
}
