use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};
use tracing::debug;

use crate::auth::identity::ClaimsIdentity;
use crate::auth::jwt::Claims;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::query::{bind_new, QueryParams};

/// Query-string extractor driven by the destination's field table.
///
/// The customer id comes from claims stored by `JwtExtract`; requests
/// without claims bind as anonymous.
#[derive(Debug)]
pub struct BoundQuery<T>(pub T);

impl<T> BoundQuery<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for BoundQuery<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for BoundQuery<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> FromRequest for BoundQuery<T>
where
    T: QueryParams + Default,
{
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}

fn extract<T: QueryParams + Default>(req: &HttpRequest) -> Result<BoundQuery<T>, AppError> {
    let query = web::Query::<HashMap<String, String>>::from_query(req.query_string())
        .map_err(|e| {
            debug!(error = %e, "malformed query string");
            AppError::bad_request(ErrorCode::WrongArgs, "Malformed query string")
        })?
        .into_inner();

    let extensions = req.extensions();
    let identity = ClaimsIdentity(extensions.get::<Claims>());

    bind_new::<T>(&query, &identity)
        .map(BoundQuery)
        .map_err(AppError::from)
}
