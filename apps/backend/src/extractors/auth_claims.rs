use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::auth::identity::customer_id_from_claims;
use crate::auth::jwt::Claims;
use crate::error::AppError;

/// Verified claims stored by the `JwtExtract` middleware.
///
/// Only available on guarded routes; elsewhere extraction fails with 401.
#[derive(Debug, Clone)]
pub struct AuthClaims(pub Claims);

impl FromRequest for AuthClaims {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Claims>()
                .cloned()
                .map(AuthClaims)
                .ok_or_else(|| AppError::unauthorized("Authentication required")),
        )
    }
}

/// Customer id of the authenticated caller, `0` when the token has no
/// subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomerId(pub i64);

impl FromRequest for CustomerId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.extensions().get::<Claims>() {
            Some(claims) => customer_id_from_claims(claims)
                .map(CustomerId)
                .map_err(AppError::from),
            None => Err(AppError::unauthorized("Authentication required")),
        };
        ready(result)
    }
}
