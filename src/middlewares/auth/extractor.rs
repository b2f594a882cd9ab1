use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

use actix_web::dev::Payload;
use actix_web::error::ErrorInternalServerError;
use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;
use actix_web::web::Data;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError};
use sea_orm::DatabaseConnection;
use sea_orm::EntityTrait;
use sea_orm::prelude::Uuid;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppConfig;
use crate::entities::{sessions, users};
use crate::models;
use crate::router::paths;

use super::SessionCache;

/// Resolved authentication state: the session row's id plus the account
/// it belongs to. Serializable so the session cache can hold it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionUser {
    pub session_id: Uuid,
    pub user: users::Model,
}

/// Rejection raised when a protected view is hit anonymously.
///
/// Answers 302 to the login form with the originally requested path in
/// `next`, so a successful login can land back where the user started.
#[derive(Clone, Debug, Error)]
#[error("authentication required")]
pub struct LoginRequired {
    next: String,
}

impl LoginRequired {
    pub fn new<P: Into<String>>(next: P) -> Self {
        Self { next: next.into() }
    }

    pub fn location(&self) -> String {
        format!("{}?next={}", paths::LOGIN, encode_next(&self.next))
    }
}

impl ResponseError for LoginRequired {
    fn status_code(&self) -> StatusCode {
        StatusCode::FOUND
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::Found()
            .insert_header((LOCATION, self.location()))
            .finish()
    }
}

/// Percent-encode a path for the `next` parameter, keeping `/` literal.
fn encode_next(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Extractor for views that demand an authenticated session.
///
/// Resolution is cookie, then cache, then database. Anonymous or
/// expired requests get the login redirect instead of an error page.
pub struct CurrentUser(pub SessionUser);

impl CurrentUser {
    pub fn user(&self) -> &users::Model {
        &self.0.user
    }

    pub fn session_id(&self) -> Uuid {
        self.0.session_id
    }
}

impl FromRequest for CurrentUser {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let start = Instant::now();
        let next = req.path().to_string();

        let db = match req.app_data::<Data<DatabaseConnection>>().cloned() {
            Some(db) => db,
            None => {
                return Box::pin(async move {
                    tracing::error!("Failed to get database connection");

                    Err(ErrorInternalServerError("database connection missing"))
                });
            }
        };

        let cache = match req.app_data::<Data<SessionCache>>().cloned() {
            Some(cache) => cache,
            None => {
                return Box::pin(async move {
                    tracing::error!("Failed to get session cache");

                    Err(ErrorInternalServerError("session cache missing"))
                });
            }
        };

        let config = match req.app_data::<Data<AppConfig>>().cloned() {
            Some(config) => config,
            None => {
                return Box::pin(async move {
                    tracing::error!("Failed to get application config");

                    Err(ErrorInternalServerError("application config missing"))
                });
            }
        };

        let cookie = match req.cookie(&config.auth.session.cookie_name) {
            Some(cookie) => cookie,
            None => {
                return Box::pin(async move { Err(LoginRequired::new(next).into()) });
            }
        };

        let id = match Uuid::parse_str(cookie.value()) {
            Ok(id) => id,
            Err(e) => {
                return Box::pin(async move {
                    tracing::debug!("Malformed session cookie: {}", e);

                    Err(LoginRequired::new(next).into())
                });
            }
        };

        Box::pin(async move {
            if let Some(session_user) = cache.get(id).await {
                tracing::debug!("Authentication took: {:?}", start.elapsed());

                return Ok(Self(session_user));
            }

            let rows = sessions::Entity::find_by_id(id)
                .find_with_related(users::Entity)
                .all(db.get_ref())
                .await
                .map_err(|e| {
                    tracing::error!("Failed to load session");
                    tracing::error!("Error: {}", e);

                    ErrorInternalServerError("session lookup failed")
                })?;

            let (session, user_rows) = match rows.into_iter().next() {
                Some(pair) => pair,
                None => return Err(LoginRequired::new(next).into()),
            };

            if session.expires_at <= models::now() {
                return Err(LoginRequired::new(next).into());
            }

            let user = match user_rows.into_iter().next() {
                Some(user) => user,
                None => {
                    tracing::error!("Session points at a missing user");

                    return Err(LoginRequired::new(next).into());
                }
            };

            let session_user = SessionUser {
                session_id: session.id,
                user,
            };

            cache.set(id, &session_user).await;
            cache.remove_delay(id, cache.ttl()).await;

            tracing::debug!("Authentication took: {:?}", start.elapsed());

            Ok(Self(session_user))
        })
    }
}

/// Never-failing variant for views that only display authentication
/// state. Anything short of a resolved session reads as anonymous.
pub struct MaybeUser(pub Option<SessionUser>);

impl MaybeUser {
    pub fn user(&self) -> Option<&users::Model> {
        self.0.as_ref().map(|session_user| &session_user.user)
    }
}

impl FromRequest for MaybeUser {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = CurrentUser::from_request(req, payload);

        Box::pin(async move { Ok(Self(fut.await.ok().map(|current| current.0))) })
    }
}
