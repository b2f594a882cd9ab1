use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header;
use actix_web::web::{Data, Form, Query};
use actix_web::{HttpRequest, HttpResponse, Responder, get, post};
use sea_orm::DatabaseConnection;
use sea_orm::prelude::Uuid;
use serde::Deserialize;

use crate::config::{AppConfig, SessionConfig};
use crate::errors::HttpError;
use crate::forms::FormErrors;
use crate::forms::login::LoginForm;
use crate::forms::password_change::PasswordChangeForm;
use crate::forms::signup::SignUpForm;
use crate::middlewares::auth::{CurrentUser, MaybeUser, SessionCache};
use crate::router::paths;
use crate::security::{PasswordHasher, csrf};
use crate::services;
use crate::templates;

/// Query string accepted by the login form.
#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    #[serde(default)]
    pub next: String,
}

/// The logout form carries nothing but the CSRF token.
#[derive(Debug, Default, Deserialize)]
pub struct LogoutForm {
    #[serde(default)]
    pub csrf_token: String,
}

fn session_cookie(config: &SessionConfig, session_id: Uuid) -> Cookie<'static> {
    Cookie::build(config.cookie_name.clone(), session_id.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(config.lifetime as i64))
        .finish()
}

fn clear_session_cookie(config: &SessionConfig) -> Cookie<'static> {
    Cookie::build(config.cookie_name.clone(), "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::ZERO)
        .finish()
}

/// Render a page that carries a form, re-issuing the CSRF cookie with
/// the same token the form embeds.
fn page(config: &AppConfig, token: &str, html: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .cookie(csrf::cookie(&config.auth.csrf, token))
        .body(html)
}

#[get("/signup")]
pub async fn signup_form(req: HttpRequest, config: Data<AppConfig>) -> impl Responder {
    let token = csrf::request_token(&req, &config.auth.csrf);
    let form = SignUpForm::default();
    let html = templates::pages::signup(&form.render(&token, &FormErrors::new()));

    page(&config, &token, html)
}

#[post("/signup")]
pub async fn signup(
    req: HttpRequest,
    db: Data<DatabaseConnection>,
    cache: Data<SessionCache>,
    hasher: Data<PasswordHasher>,
    config: Data<AppConfig>,
    form: Form<SignUpForm>,
) -> Result<impl Responder, HttpError> {
    csrf::verify(&req, &form.csrf_token, &config.auth.csrf)?;

    let outcome = services::signup(
        db.get_ref(),
        cache.get_ref(),
        hasher.get_ref(),
        &config.auth,
        &form,
    )
    .await?;

    match outcome {
        services::SignupOutcome::Created(session_user) => Ok(HttpResponse::Found()
            .insert_header((header::LOCATION, paths::HOME))
            .cookie(session_cookie(&config.auth.session, session_user.session_id))
            .finish()),
        services::SignupOutcome::Invalid(errors) => {
            let token = csrf::request_token(&req, &config.auth.csrf);
            let html = templates::pages::signup(&form.render(&token, &errors));

            Ok(page(&config, &token, html))
        }
    }
}

#[get("/login")]
pub async fn login_form(
    req: HttpRequest,
    config: Data<AppConfig>,
    query: Query<NextQuery>,
) -> impl Responder {
    let token = csrf::request_token(&req, &config.auth.csrf);
    let form = LoginForm {
        next: query.next.clone(),
        ..LoginForm::default()
    };
    let html = templates::pages::login(&form.render(&token, &FormErrors::new()));

    page(&config, &token, html)
}

#[post("/login")]
pub async fn login(
    req: HttpRequest,
    db: Data<DatabaseConnection>,
    cache: Data<SessionCache>,
    hasher: Data<PasswordHasher>,
    config: Data<AppConfig>,
    form: Form<LoginForm>,
) -> Result<impl Responder, HttpError> {
    csrf::verify(&req, &form.csrf_token, &config.auth.csrf)?;

    let outcome = services::login(
        db.get_ref(),
        cache.get_ref(),
        hasher.get_ref(),
        &config.auth,
        &form,
    )
    .await?;

    match outcome {
        services::LoginOutcome::LoggedIn(session_user) => Ok(HttpResponse::Found()
            .insert_header((header::LOCATION, services::safe_next(&form.next)))
            .cookie(session_cookie(&config.auth.session, session_user.session_id))
            .finish()),
        services::LoginOutcome::Invalid(errors) => {
            let token = csrf::request_token(&req, &config.auth.csrf);
            let html = templates::pages::login(&form.render(&token, &errors));

            Ok(page(&config, &token, html))
        }
    }
}

#[post("/logout")]
pub async fn logout(
    req: HttpRequest,
    db: Data<DatabaseConnection>,
    cache: Data<SessionCache>,
    config: Data<AppConfig>,
    user: MaybeUser,
    form: Form<LogoutForm>,
) -> Result<impl Responder, HttpError> {
    csrf::verify(&req, &form.csrf_token, &config.auth.csrf)?;

    // An anonymous logout post is a no-op redirect.
    if let Some(session_user) = user.0.as_ref() {
        services::logout(db.get_ref(), cache.get_ref(), session_user.session_id).await?;
    }

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, paths::HOME))
        .cookie(clear_session_cookie(&config.auth.session))
        .finish())
}

#[get("/password/change")]
pub async fn password_change_form(
    req: HttpRequest,
    config: Data<AppConfig>,
    _user: CurrentUser,
) -> impl Responder {
    let token = csrf::request_token(&req, &config.auth.csrf);
    let form = PasswordChangeForm::default();
    let html = templates::pages::password_change(&form.render(&token, &FormErrors::new()));

    page(&config, &token, html)
}

#[post("/password/change")]
pub async fn password_change(
    req: HttpRequest,
    db: Data<DatabaseConnection>,
    cache: Data<SessionCache>,
    hasher: Data<PasswordHasher>,
    config: Data<AppConfig>,
    user: CurrentUser,
    form: Form<PasswordChangeForm>,
) -> Result<impl Responder, HttpError> {
    csrf::verify(&req, &form.csrf_token, &config.auth.csrf)?;

    let outcome = services::change_password(
        db.get_ref(),
        cache.get_ref(),
        hasher.get_ref(),
        &config.auth,
        &user.0,
        &form,
    )
    .await?;

    match outcome {
        services::PasswordChangeOutcome::Changed => Ok(HttpResponse::Found()
            .insert_header((header::LOCATION, paths::PASSWORD_CHANGE_DONE))
            .finish()),
        services::PasswordChangeOutcome::Invalid(errors) => {
            let token = csrf::request_token(&req, &config.auth.csrf);
            let html = templates::pages::password_change(&form.render(&token, &errors));

            Ok(page(&config, &token, html))
        }
    }
}

#[get("/password/change/done")]
pub async fn password_change_done(
    req: HttpRequest,
    config: Data<AppConfig>,
    _user: CurrentUser,
) -> impl Responder {
    let token = csrf::request_token(&req, &config.auth.csrf);

    page(&config, &token, templates::pages::password_change_done())
}
