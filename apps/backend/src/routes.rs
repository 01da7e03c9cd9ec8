use actix_web::{web, HttpResponse};

use crate::middleware::jwt_extract::JwtExtract;
use crate::state::app_state::AppState;

async fn welcome(app_state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().body(format!(
        "Welcome to skeleton-api service {}",
        app_state.env_name()
    ))
}

async fn check_health() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}

/// Register public routes and the JWT-guarded ones.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(welcome))
        .configure(crate::health::configure_routes)
        .configure(crate::metrics::configure_routes)
        .service(
            web::resource("/check-health")
                .wrap(JwtExtract)
                .route(web::get().to(check_health)),
        );
}
