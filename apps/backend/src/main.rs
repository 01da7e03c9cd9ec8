use std::sync::Arc;

use actix_extensible_rate_limit::RateLimiter;
use actix_web::middleware::Condition;
use actix_web::{web, App, HttpServer};
use skeleton_api::config::AppConfig;
use skeleton_api::infra::db;
use skeleton_api::infra::state::build_state;
use skeleton_api::middleware::cors::cors_middleware;
use skeleton_api::middleware::rate_limit::{api_rate_limit_config, rate_limit_backend};
use skeleton_api::middleware::request_metrics::TrackRequests;
use skeleton_api::middleware::request_trace::RequestTrace;
use skeleton_api::middleware::structured_logger::StructuredLogger;
use skeleton_api::middleware::trace_span::TraceSpan;
use skeleton_api::routes;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./app.env; set +a)
    let config = match AppConfig::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let _log_guard = telemetry::init_tracing(config.server.log_file.as_deref())?;

    info!(env = %config.env, "starting skeleton-api");

    let builder = match build_state().with_config(config.clone()) {
        Ok(builder) => builder,
        Err(e) => {
            error!(error = %e, "invalid JWT configuration");
            std::process::exit(1);
        }
    };
    let app_state = match builder.with_db().build().await {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };

    let db_handle = app_state.db.clone();
    let data = web::Data::new(app_state);
    let server_config = config.server.clone();
    let limiter_backend = rate_limit_backend();

    info!(
        host = %server_config.host,
        port = server_config.port,
        "application is running in {} and listening on port {}",
        config.env,
        server_config.port
    );

    let factory_config = server_config.clone();
    HttpServer::new(move || {
        let rate_limiter =
            RateLimiter::builder(limiter_backend.clone(), api_rate_limit_config().build())
                .add_headers()
                .build();

        App::new()
            .wrap(Condition::new(factory_config.rate_limit, rate_limiter))
            .wrap(cors_middleware(&factory_config.cors_allowed_origins))
            .wrap(Condition::new(factory_config.log_request, StructuredLogger))
            .wrap(TrackRequests)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .shutdown_timeout(server_config.default_timeout.as_secs())
    .bind((server_config.host.as_str(), server_config.port))?
    .run()
    .await?;

    info!("shutting down skeleton-api");
    if let Some(conn) = db_handle {
        db::close(conn).await;
    }
    info!("shutdown complete, bye!");

    Ok(())
}
