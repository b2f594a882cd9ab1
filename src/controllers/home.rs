use actix_web::web::Data;
use actix_web::{HttpRequest, HttpResponse, Responder, get};

use crate::config::AppConfig;
use crate::middlewares::auth::MaybeUser;
use crate::security::csrf;
use crate::templates;

/// Landing page. Shows who is signed in; visitors get pointers to the
/// login and signup forms.
#[get("/")]
pub async fn index(req: HttpRequest, config: Data<AppConfig>, user: MaybeUser) -> impl Responder {
    let token = csrf::request_token(&req, &config.auth.csrf);
    let username = user.user().map(|model| model.username.as_str());
    let html = templates::pages::home(username, &token);

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .cookie(csrf::cookie(&config.auth.csrf, &token))
        .body(html)
}
