//! Login and logout view tests
//!
//! This test suite covers:
//! - Login form rendering and the `next` hidden input
//! - Session establishment and the session cookie attributes
//! - The deliberately vague rejection for bad credentials
//! - Redirect handling for `next`, including offsite values
//! - Logout clearing the cookie and the server-side session

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::test::{TestRequest, call_service, read_body};
use sea_orm::EntityTrait;
use sea_orm::prelude::Uuid;

use hearth_accounts::entities::sessions;
use hearth_accounts::testing::setup;
use hearth_accounts::{login, service};

const REJECTION: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

// ===== RENDERING =====

/// Test that the login page renders the form
#[actix_web::test]
async fn test_login_page_renders_form() {
    let (service, _db) = service!();

    let req = TestRequest::get().uri("/login").to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::OK);

    let body = read_body(resp).await;
    let html = std::str::from_utf8(&body).expect("body is utf-8");

    assert!(html.contains("action=\"/login\""));
    assert_eq!(
        html.matches("<input").count(),
        3,
        "csrf token, username and password"
    );
    assert!(html.contains("Username:"));
    assert!(html.contains("Password:"));
}

/// Test that a `next` query parameter becomes a hidden input
#[actix_web::test]
async fn test_login_page_carries_next_from_query() {
    let (service, _db) = service!();

    let req = TestRequest::get()
        .uri("/login?next=/password/change")
        .to_request();
    let resp = call_service(&service, req).await;

    let body = read_body(resp).await;
    let html = std::str::from_utf8(&body).expect("body is utf-8");

    assert!(html.contains("name=\"next\" value=\"/password/change\""));
}

/// Test that the hidden input is absent without a `next` parameter
#[actix_web::test]
async fn test_login_page_omits_next_by_default() {
    let (service, _db) = service!();

    let req = TestRequest::get().uri("/login").to_request();
    let resp = call_service(&service, req).await;

    let body = read_body(resp).await;
    let html = std::str::from_utf8(&body).expect("body is utf-8");

    assert!(!html.contains("name=\"next\""));
}

// ===== SESSION ESTABLISHMENT =====

/// Test that valid credentials land a session and redirect home
#[actix_web::test]
async fn test_login_success_redirects_home_with_session() {
    let (service, db) = service!();
    let hasher = setup::password_hasher().unwrap();
    setup::create_user(&db, &hasher, "john", "old_password")
        .await
        .unwrap();

    let req = TestRequest::post()
        .uri("/login")
        .set_form([("username", "john"), ("password", "old_password")])
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");

    let cookie = resp
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "sessionid")
        .expect("login must set the session cookie");

    let session_id = Uuid::parse_str(cookie.value()).expect("session id is a uuid");
    let session = sessions::Entity::find_by_id(session_id)
        .one(&db)
        .await
        .unwrap();
    assert!(session.is_some(), "session row should exist");
}

/// Test the attributes on the session cookie
#[actix_web::test]
async fn test_login_session_cookie_attributes() {
    let (service, db) = service!();
    let hasher = setup::password_hasher().unwrap();
    setup::create_user(&db, &hasher, "john", "old_password")
        .await
        .unwrap();

    let cookie = login!(&service, "john", "old_password");

    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.http_only(), Some(true), "not readable from scripts");
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    assert_eq!(
        cookie.max_age(),
        Some(Duration::seconds(1_209_600)),
        "two week session lifetime"
    );
}

/// Test that logging in records the login time
#[actix_web::test]
async fn test_login_records_last_login() {
    let (service, db) = service!();
    let hasher = setup::password_hasher().unwrap();
    let user = setup::create_user(&db, &hasher, "john", "old_password")
        .await
        .unwrap();
    assert!(user.last_login.is_none());

    login!(&service, "john", "old_password");

    let user = hearth_accounts::entities::users::Model::find_by_username(&db, "john")
        .await
        .unwrap();
    assert!(user.last_login.is_some());
}

// ===== REJECTION =====

/// Test that a wrong password re-renders with the generic message
#[actix_web::test]
async fn test_login_wrong_password_rejected() {
    let (service, db) = service!();
    let hasher = setup::password_hasher().unwrap();
    setup::create_user(&db, &hasher, "john", "old_password")
        .await
        .unwrap();

    let req = TestRequest::post()
        .uri("/login")
        .set_form([("username", "john"), ("password", "wrong_password")])
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::OK, "rejections re-render");
    assert!(
        !resp
            .response()
            .cookies()
            .any(|cookie| cookie.name() == "sessionid"),
        "no session for bad credentials"
    );

    let body = read_body(resp).await;
    let html = std::str::from_utf8(&body).expect("body is utf-8");

    assert!(html.contains(REJECTION));

    let sessions = sessions::Entity::find().all(&db).await.unwrap();
    assert!(sessions.is_empty());
}

/// Test that an unknown username gets the same message as a wrong
/// password, so the form does not leak which accounts exist
#[actix_web::test]
async fn test_login_unknown_username_gets_same_rejection() {
    let (service, _db) = service!();

    let req = TestRequest::post()
        .uri("/login")
        .set_form([("username", "nobody"), ("password", "whatever123")])
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::OK);

    let body = read_body(resp).await;
    let html = std::str::from_utf8(&body).expect("body is utf-8");

    assert!(html.contains(REJECTION));
    assert!(html.contains("value=\"nobody\""), "username echoed back");
    assert!(!html.contains("whatever123"), "password never echoed");
}

/// Test that empty credentials get per-field errors, not the rejection
#[actix_web::test]
async fn test_login_empty_fields() {
    let (service, _db) = service!();

    let req = TestRequest::post()
        .uri("/login")
        .set_form([("username", ""), ("password", "")])
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::OK);

    let body = read_body(resp).await;
    let html = std::str::from_utf8(&body).expect("body is utf-8");

    assert_eq!(html.matches("This field is required.").count(), 2);
    assert!(!html.contains(REJECTION));
}

// ===== NEXT REDIRECT =====

/// Test that login follows a relative `next` target
#[actix_web::test]
async fn test_login_redirects_to_next() {
    let (service, db) = service!();
    let hasher = setup::password_hasher().unwrap();
    setup::create_user(&db, &hasher, "john", "old_password")
        .await
        .unwrap();

    let req = TestRequest::post()
        .uri("/login")
        .set_form([
            ("username", "john"),
            ("password", "old_password"),
            ("next", "/password/change"),
        ])
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/password/change"
    );
}

/// Test that offsite `next` targets fall back to the home page
#[actix_web::test]
async fn test_login_ignores_offsite_next() {
    for next in ["https://evil.example/", "//evil.example/", "evil.example"] {
        let (service, db) = service!();
        let hasher = setup::password_hasher().unwrap();
        setup::create_user(&db, &hasher, "john", "old_password")
            .await
            .unwrap();

        let req = TestRequest::post()
            .uri("/login")
            .set_form([
                ("username", "john"),
                ("password", "old_password"),
                ("next", next),
            ])
            .to_request();
        let resp = call_service(&service, req).await;

        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/",
            "offsite next {next} must not be followed"
        );
    }
}

// ===== LOGOUT =====

/// Test that logout drops the session and clears the cookie
#[actix_web::test]
async fn test_logout_clears_session() {
    let (service, db) = service!();
    let hasher = setup::password_hasher().unwrap();
    setup::create_user(&db, &hasher, "john", "old_password")
        .await
        .unwrap();

    let session = login!(&service, "john", "old_password");

    let req = TestRequest::post()
        .uri("/logout")
        .cookie(session.clone())
        .set_form([("csrf_token", "")])
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");

    let cleared = resp
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "sessionid")
        .expect("logout should rewrite the session cookie");
    assert!(cleared.value().is_empty());
    assert_eq!(cleared.max_age(), Some(Duration::ZERO));

    let sessions = sessions::Entity::find().all(&db).await.unwrap();
    assert!(sessions.is_empty(), "session row should be gone");

    // The old cookie no longer authenticates.
    let req = TestRequest::get().uri("/").cookie(session).to_request();
    let resp = call_service(&service, req).await;
    let body = read_body(resp).await;
    let html = std::str::from_utf8(&body).expect("body is utf-8");

    assert!(!html.contains("logged in as"));
}

/// Test that an anonymous logout post is a harmless redirect
#[actix_web::test]
async fn test_logout_anonymous_still_redirects() {
    let (service, _db) = service!();

    let req = TestRequest::post()
        .uri("/logout")
        .set_form([("csrf_token", "")])
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");
}

/// Test that logging out one session leaves another alone
#[actix_web::test]
async fn test_logout_only_ends_the_presented_session() {
    let (service, db) = service!();
    let hasher = setup::password_hasher().unwrap();
    setup::create_user(&db, &hasher, "john", "old_password")
        .await
        .unwrap();

    let first = login!(&service, "john", "old_password");
    let second = login!(&service, "john", "old_password");
    assert_ne!(first.value(), second.value());

    let req = TestRequest::post()
        .uri("/logout")
        .cookie(first)
        .set_form([("csrf_token", "")])
        .to_request();
    call_service(&service, req).await;

    let req = TestRequest::get().uri("/").cookie(second).to_request();
    let resp = call_service(&service, req).await;
    let body = read_body(resp).await;
    let html = std::str::from_utf8(&body).expect("body is utf-8");

    assert!(
        html.contains("logged in as"),
        "the other session must survive"
    );
}

/// Test that a stale session cookie on the login page does no harm
#[actix_web::test]
async fn test_login_with_garbage_session_cookie() {
    let (service, _db) = service!();

    let req = TestRequest::get()
        .uri("/login")
        .cookie(Cookie::new("sessionid", "not-a-uuid"))
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}
