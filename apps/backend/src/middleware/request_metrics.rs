use std::future::{ready, Ready};
use std::sync::Arc;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error as ActixError};
use futures_util::future::LocalBoxFuture;

use crate::metrics::RequestMetrics;
use crate::state::app_state::AppState;

/// Feeds every completed request into the [`RequestMetrics`] held by
/// `AppState`. Requests are passed through untouched when no state is
/// registered.
pub struct TrackRequests;

impl<S, B> Transform<S, ServiceRequest> for TrackRequests
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = TrackRequestsMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TrackRequestsMiddleware { service }))
    }
}

pub struct TrackRequestsMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TrackRequestsMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let metrics: Option<Arc<RequestMetrics>> = req
            .app_data::<web::Data<AppState>>()
            .map(|state| state.metrics.clone());

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            if let Some(metrics) = metrics {
                let status = match &result {
                    Ok(res) => res.status(),
                    Err(err) => err.as_response_error().status_code(),
                };
                metrics.record(status);
            }

            result
        })
    }
}
