use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;
use futures_util::future::LocalBoxFuture;

use crate::metrics::AppMetrics;

/// Records request counts, durations and the in-flight gauge for every
/// request passing through the app.
pub struct MetricsMiddleware {
    metrics: AppMetrics,
}

impl MetricsMiddleware {
    pub fn new(metrics: AppMetrics) -> Self {
        Self { metrics }
    }
}

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddlewareService {
            service,
            metrics: self.metrics.clone(),
        }))
    }
}

pub struct MetricsMiddlewareService<S> {
    service: S,
    metrics: AppMetrics,
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
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
        let start = Instant::now();
        let method = req.method().to_string();
        let metrics = self.metrics.clone();

        metrics.http_request_start();

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            metrics.http_request_end();

            match result {
                Ok(res) => {
                    // The matched route pattern keeps the path label
                    // cardinality bounded; unmatched requests fall back
                    // to the raw path.
                    let path = res
                        .request()
                        .match_pattern()
                        .unwrap_or_else(|| res.request().path().to_string());

                    metrics.record_http_request(
                        &method,
                        &path,
                        res.status().as_u16(),
                        start.elapsed().as_secs_f64(),
                    );

                    Ok(res)
                }
                Err(e) => {
                    let status = e.as_response_error().status_code().as_u16();
                    metrics.record_http_request(
                        &method,
                        "error",
                        status,
                        start.elapsed().as_secs_f64(),
                    );

                    Err(e)
                }
            }
        })
    }
}
