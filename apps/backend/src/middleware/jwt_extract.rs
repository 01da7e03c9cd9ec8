//! JWT extraction middleware
//!
//! Verifies the Bearer token on guarded scopes and stores the decoded
//! [`Claims`] in request extensions. Requests without a valid token are
//! rejected with 401 before reaching the handler.

use std::collections::HashMap;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::Span;

use crate::auth::identity::customer_id_from_claims;
use crate::auth::jwt::{verify_access_token, Claims};
use crate::error::AppError;
use crate::state::app_state::AppState;

pub struct JwtExtract;

impl<S, B> Transform<S, ServiceRequest> for JwtExtract
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtExtractMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtExtractMiddleware { service }))
    }
}

pub struct JwtExtractMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for JwtExtractMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let claims = match authenticate(&req) {
            Ok(claims) => claims,
            Err(err) => return Box::pin(async move { Err(err.into()) }),
        };

        if let Some(span) = req.extensions().get::<Span>() {
            if let Ok(user_id) = customer_id_from_claims(&claims) {
                span.record("user_id", user_id);
            }
            span.record("jwt_id", claims.jti.as_str());
        }

        // Store claims in request extensions BEFORE calling the service
        req.extensions_mut().insert(claims);

        Box::pin(self.service.call(req))
    }
}

fn authenticate(req: &ServiceRequest) -> Result<Claims, AppError> {
    // Header first, then the query string fallback
    let token = match extract_bearer_from_header(req.headers().get(header::AUTHORIZATION))? {
        Some(token) => token,
        None => extract_token_from_query(req.uri().query())
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?,
    };

    let app_state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::internal("AppState not available"))?;

    verify_access_token(&token, &app_state.security)
}

fn extract_bearer_from_header(
    header_value: Option<&header::HeaderValue>,
) -> Result<Option<String>, AppError> {
    let auth_value = match header_value {
        Some(value) => value,
        None => return Ok(None),
    };

    let auth_str = auth_value
        .to_str()
        .map_err(|_| AppError::unauthorized("Missing or invalid Authorization header"))?;

    let parts: Vec<&str> = auth_str.split_whitespace().collect();
    if parts.len() != 2 || parts[0] != "Bearer" || parts[1].is_empty() {
        return Err(AppError::unauthorized("Missing or invalid Bearer token"));
    }

    Ok(Some(parts[1].to_string()))
}

fn extract_token_from_query(query: Option<&str>) -> Option<String> {
    let query_str = query?;
    let params = web::Query::<HashMap<String, String>>::from_query(query_str).ok()?;
    params
        .get("token")
        .cloned()
        .filter(|value| !value.is_empty())
}
