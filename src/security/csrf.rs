//! Double-submit CSRF protection.
//!
//! Pages that render a form receive a random token twice: once in a
//! cookie and once in a hidden `csrf_token` input. A form post is
//! accepted only when the two values agree. Nothing is stored server
//! side, so the check works across restarts and workers.

use actix_web::HttpRequest;
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use rand::Rng;
use rand::distributions::Alphanumeric;

use crate::config::CsrfConfig;
use crate::errors::HttpError;

/// CSRF cookie max age in seconds (52 weeks)
const COOKIE_MAX_AGE: i64 = 31_449_600;

/// Generate a random alphanumeric token.
pub fn generate_token(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// The token tied to this request: the cookie value when the client
/// already has one, otherwise a fresh token.
pub fn request_token(req: &HttpRequest, config: &CsrfConfig) -> String {
    match req.cookie(&config.cookie_name) {
        Some(cookie) if !cookie.value().is_empty() => cookie.value().to_string(),
        _ => generate_token(config.token_length),
    }
}

/// The cookie carrying the token.
pub fn cookie(config: &CsrfConfig, token: &str) -> Cookie<'static> {
    Cookie::build(config.cookie_name.clone(), token.to_string())
        .path("/")
        .same_site(SameSite::Lax)
        // page scripts read this cookie; the session cookie is the HttpOnly one
        .http_only(false)
        .max_age(Duration::seconds(COOKIE_MAX_AGE))
        .finish()
}

/// Check a submitted form token against the request cookie.
pub fn verify(req: &HttpRequest, submitted: &str, config: &CsrfConfig) -> Result<(), HttpError> {
    if !config.enforce {
        return Ok(());
    }

    let cookie = match req.cookie(&config.cookie_name) {
        Some(cookie) => cookie,
        None => {
            tracing::warn!(path = %req.path(), "form post without CSRF cookie");
            metrics::counter!("csrf_rejections_total").increment(1);
            return Err(HttpError::CsrfRejected);
        }
    };

    if submitted.is_empty() || !tokens_match(cookie.value(), submitted) {
        tracing::warn!(path = %req.path(), "CSRF token mismatch");
        metrics::counter!("csrf_rejections_total").increment(1);
        return Err(HttpError::CsrfRejected);
    }

    Ok(())
}

/// Constant-time token comparison.
fn tokens_match(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
