//! Security headers middleware.
//!
//! Stamps every response with the usual protective headers (CSP, HSTS,
//! X-Frame-Options and friends). Values come from
//! [`SecurityHeadersConfig`](crate::config::SecurityHeadersConfig); the
//! middleware is a no-op when disabled, which keeps test setups quiet.

use std::future::{Ready, ready};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::LocalBoxFuture;

use crate::config::SecurityHeadersConfig;

pub struct SecurityHeadersMiddleware {
    config: SecurityHeadersConfig,
}

impl SecurityHeadersMiddleware {
    pub fn new(config: SecurityHeadersConfig) -> Self {
        Self { config }
    }
}

/// Header list for a config, as (name, value) pairs. Invalid or empty
/// configured values drop the header rather than failing the response.
fn headers_for(config: &SecurityHeadersConfig) -> Vec<(HeaderName, HeaderValue)> {
    let mut headers = Vec::with_capacity(7);

    let mut push = |name: &'static str, value: &str| {
        if value.is_empty() {
            return;
        }
        if let Ok(value) = HeaderValue::from_str(value) {
            headers.push((HeaderName::from_static(name), value));
        }
    };

    push("content-security-policy", &config.csp);
    push(
        "strict-transport-security",
        &format!("max-age={}; includeSubDomains", config.hsts_max_age),
    );
    push("x-frame-options", &config.x_frame_options);
    push("x-content-type-options", &config.x_content_type_options);
    push("referrer-policy", &config.referrer_policy);
    push("x-xss-protection", "1; mode=block");
    push("x-permitted-cross-domain-policies", "none");

    headers
}

impl<S, B> Transform<S, ServiceRequest> for SecurityHeadersMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityHeadersMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityHeadersMiddlewareService {
            service,
            config: self.config.clone(),
        }))
    }
}

pub struct SecurityHeadersMiddlewareService<S> {
    service: S,
    config: SecurityHeadersConfig,
}

impl<S, B> Service<ServiceRequest> for SecurityHeadersMiddlewareService<S>
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
        let config = self.config.clone();

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;

            if !config.enabled {
                return Ok(res);
            }

            let headers = res.headers_mut();

            for (name, value) in headers_for(&config) {
                headers.insert(name, value);
            }

            Ok(res)
        })
    }
}
