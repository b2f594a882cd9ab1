//! CSRF protection tests
//!
//! These run with enforcement switched on, unlike the view tests. The
//! client has to do what a browser would: fetch a form, keep the
//! cookie, and post the embedded token back with it.

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test::{TestRequest, call_service, read_body};
use sea_orm::EntityTrait;

use hearth_accounts::entities::{sessions, users};
use hearth_accounts::service;
use hearth_accounts::testing::setup;

/// Fetch the signup page and return the CSRF token from its cookie.
async fn fetch_csrf_token<S>(service: &S) -> String
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = TestRequest::get().uri("/signup").to_request();
    let resp = call_service(service, req).await;

    resp.response()
        .cookies()
        .find(|cookie| cookie.name() == "csrftoken")
        .map(|cookie| cookie.value().to_string())
        .expect("form page should set the CSRF cookie")
}

// ===== REJECTION =====

/// Test that a bare post with no cookie and no token is rejected
#[actix_web::test]
async fn test_signup_post_without_token_is_forbidden() {
    let (service, db) = service!(setup::config_with_csrf());

    let req = TestRequest::post()
        .uri("/signup")
        .set_form([
            ("username", "john"),
            ("email", "john@doe.com"),
            ("password1", "abcdef123456"),
            ("password2", "abcdef123456"),
        ])
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body = read_body(resp).await;
    let html = std::str::from_utf8(&body).expect("body is utf-8");

    assert!(html.contains("CSRF verification failed. Request aborted."));

    let users = users::Entity::find().all(&db).await.unwrap();
    assert!(users.is_empty(), "a rejected post must not create anything");
}

/// Test that a cookie alone is not enough: the form token must match
#[actix_web::test]
async fn test_signup_post_with_mismatched_token_is_forbidden() {
    let (service, db) = service!(setup::config_with_csrf());
    let token = fetch_csrf_token(&service).await;

    let req = TestRequest::post()
        .uri("/signup")
        .cookie(Cookie::new("csrftoken", token))
        .set_form([
            ("csrf_token", "not-the-right-token"),
            ("username", "john"),
            ("email", "john@doe.com"),
            ("password1", "abcdef123456"),
            ("password2", "abcdef123456"),
        ])
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let users = users::Entity::find().all(&db).await.unwrap();
    assert!(users.is_empty());
}

/// Test that an empty token field is rejected even with the cookie
#[actix_web::test]
async fn test_signup_post_with_empty_token_is_forbidden() {
    let (service, _db) = service!(setup::config_with_csrf());
    let token = fetch_csrf_token(&service).await;

    let req = TestRequest::post()
        .uri("/signup")
        .cookie(Cookie::new("csrftoken", token))
        .set_form([("csrf_token", ""), ("username", "john")])
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

/// Test that login and logout posts are guarded the same way
#[actix_web::test]
async fn test_login_and_logout_posts_without_token_are_forbidden() {
    let (service, _db) = service!(setup::config_with_csrf());

    let req = TestRequest::post()
        .uri("/login")
        .set_form([("username", "john"), ("password", "old_password")])
        .to_request();
    let resp = call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = TestRequest::post()
        .uri("/logout")
        .set_form([("csrf_token", "")])
        .to_request();
    let resp = call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

/// Test that a rejection shows up in the metrics
#[actix_web::test]
async fn test_csrf_rejection_is_counted() {
    let (service, _db) = service!(setup::config_with_csrf());

    let req = TestRequest::post()
        .uri("/login")
        .set_form([("username", "john"), ("password", "old_password")])
        .to_request();
    let resp = call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = TestRequest::get().uri("/metrics").to_request();
    let resp = call_service(&service, req).await;
    let body = read_body(resp).await;
    let text = std::str::from_utf8(&body).expect("exposition is utf-8");

    assert!(text.contains("csrf_rejections_total"));
}

// ===== ACCEPTANCE =====

/// Test that the browser dance works: fetch, keep cookie, post token
#[actix_web::test]
async fn test_signup_post_with_matching_token_is_accepted() {
    let (service, db) = service!(setup::config_with_csrf());
    let token = fetch_csrf_token(&service).await;

    let req = TestRequest::post()
        .uri("/signup")
        .cookie(Cookie::new("csrftoken", token.clone()))
        .set_form([
            ("csrf_token", token.as_str()),
            ("username", "john"),
            ("email", "john@doe.com"),
            ("password1", "abcdef123456"),
            ("password2", "abcdef123456"),
        ])
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(users::Model::find_by_username(&db, "john").await.is_some());
}

/// Test the full login round trip under enforcement
#[actix_web::test]
async fn test_login_with_matching_token_is_accepted() {
    let (service, db) = service!(setup::config_with_csrf());
    let hasher = setup::password_hasher().unwrap();
    setup::create_user(&db, &hasher, "john", "old_password")
        .await
        .unwrap();

    let token = fetch_csrf_token(&service).await;

    let req = TestRequest::post()
        .uri("/login")
        .cookie(Cookie::new("csrftoken", token.clone()))
        .set_form([
            ("csrf_token", token.as_str()),
            ("username", "john"),
            ("password", "old_password"),
        ])
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);

    let sessions = sessions::Entity::find().all(&db).await.unwrap();
    assert_eq!(sessions.len(), 1);
}
