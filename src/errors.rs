use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::templates;

/// Failures a request handler can surface to the client.
///
/// Validation problems never end up here; forms re-render with field
/// errors instead. This type covers the unrecoverable paths (database,
/// hashing) plus CSRF rejection, which gets its own 403 page.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("CSRF verification failed")]
    CsrfRejected,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ResponseError for HttpError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::CsrfRejected => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::CsrfRejected => HttpResponse::Forbidden()
                .content_type(ContentType::html())
                .body(templates::forbidden_page()),
            other => {
                tracing::error!(error = %other, "request failed");

                HttpResponse::InternalServerError()
                    .content_type(ContentType::html())
                    .body(templates::server_error_page())
            }
        }
    }
}
