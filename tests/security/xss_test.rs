//! XSS (Cross-Site Scripting) prevention tests
//!
//! Every page here is server-rendered HTML, so the defense is output
//! escaping: whatever a form echoes back must come out entity-encoded.
//! The username whitelist blocks markup at the validation layer too,
//! but these tests hold even for fields that accept more characters.
//!
//! Each test verifies that:
//! 1. The payload never appears verbatim in the response body
//! 2. The escaped form of the payload is what the page carries
//! 3. The attempt does not crash the request

use actix_web::http::StatusCode;
use actix_web::test::{TestRequest, call_service, read_body};
use sea_orm::EntityTrait;

use hearth_accounts::entities::users;
use hearth_accounts::service;

// =============================================================================
// REFLECTED XSS - SIGNUP FORM
// =============================================================================

/// Test XSS in the signup username field
///
/// Attack vector: Classic script tag in the echoed username
/// Expected: Validation rejects the charset, and the re-rendered page
/// carries the payload entity-encoded only
#[actix_web::test]
async fn test_xss_in_signup_username_is_escaped() {
    let (service, db) = service!();
    let payload = "<script>alert('XSS')</script>";

    let req = TestRequest::post()
        .uri("/signup")
        .set_form([
            ("username", payload),
            ("email", "john@doe.com"),
            ("password1", "abcdef123456"),
            ("password2", "abcdef123456"),
        ])
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::OK, "re-render, not a crash");

    let body = read_body(resp).await;
    let html = std::str::from_utf8(&body).expect("body is utf-8");

    assert!(
        !html.contains(payload),
        "payload must not appear verbatim in the page"
    );
    assert!(
        html.contains("&lt;script&gt;"),
        "echoed username should be entity-encoded"
    );
    assert!(html.contains("Enter a valid username."));

    let users = users::Entity::find().all(&db).await.unwrap();
    assert!(users.is_empty(), "no account for the attempt");
}

/// Test XSS in the signup email field
///
/// Attack vector: Attribute breakout inside the echoed email value
/// Expected: Quotes and angle brackets come back entity-encoded, so the
/// value cannot escape its attribute
#[actix_web::test]
async fn test_xss_in_signup_email_is_escaped() {
    let (service, _db) = service!();
    let payload = "\"><script>alert(1)</script>@doe";

    let req = TestRequest::post()
        .uri("/signup")
        .set_form([
            ("username", "john"),
            ("email", payload),
            ("password1", "abcdef123456"),
            ("password2", "abcdef123456"),
        ])
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::OK);

    let body = read_body(resp).await;
    let html = std::str::from_utf8(&body).expect("body is utf-8");

    assert!(!html.contains("<script>alert(1)</script>"));
    assert!(!html.contains("\"><script>"));
    assert!(html.contains("&quot;&gt;&lt;script&gt;"));
}

/// Test a spread of XSS vectors through the username field
///
/// Attack vector: img onerror, svg onload, iframe, event handlers
/// Expected: Every vector is rejected by validation and echoed escaped
#[actix_web::test]
async fn test_xss_vectors_in_signup_are_neutralized() {
    let vectors = [
        "<img src=x onerror=alert(1)>",
        "<svg onload=alert(1)>",
        "<iframe src=\"javascript:alert(1)\">",
        "<body onload=alert(1)>",
        "\"><script>alert(1)</script>",
        "<ScRiPt>alert('XSS')</ScRiPt>",
    ];

    for payload in vectors {
        let (service, _db) = service!();

        let req = TestRequest::post()
            .uri("/signup")
            .set_form([
                ("username", payload),
                ("email", "john@doe.com"),
                ("password1", "abcdef123456"),
                ("password2", "abcdef123456"),
            ])
            .to_request();
        let resp = call_service(&service, req).await;

        assert_eq!(
            resp.status(),
            StatusCode::OK,
            "vector {payload} should re-render"
        );

        let body = read_body(resp).await;
        let html = std::str::from_utf8(&body).expect("body is utf-8");

        assert!(
            !html.contains(payload),
            "vector {payload} must not appear verbatim"
        );
        assert!(
            !html.to_lowercase().contains("<script>"),
            "vector {payload} must not introduce a script tag"
        );
    }
}

// =============================================================================
// REFLECTED XSS - LOGIN FORM
// =============================================================================

/// Test XSS in the login username field
///
/// Attack vector: Markup in the echoed username on a failed login
/// Expected: The rejection page carries the payload escaped
#[actix_web::test]
async fn test_xss_in_login_username_is_escaped() {
    let (service, _db) = service!();
    let payload = "<b onmouseover=alert(1)>john</b>";

    let req = TestRequest::post()
        .uri("/login")
        .set_form([("username", payload), ("password", "whatever123")])
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::OK);

    let body = read_body(resp).await;
    let html = std::str::from_utf8(&body).expect("body is utf-8");

    assert!(!html.contains(payload));
    assert!(html.contains("&lt;b onmouseover=alert(1)&gt;"));
}

/// Test XSS through the login `next` parameter
///
/// Attack vector: Attribute breakout via the hidden `next` input
/// Expected: The query value is escaped inside the rendered attribute
#[actix_web::test]
async fn test_xss_in_next_parameter_is_escaped() {
    let (service, _db) = service!();

    let req = TestRequest::get()
        .uri("/login?next=/x%22%3E%3Cscript%3Ealert(1)%3C/script%3E")
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::OK);

    let body = read_body(resp).await;
    let html = std::str::from_utf8(&body).expect("body is utf-8");

    assert!(!html.contains("<script>alert(1)</script>"));
    assert!(!html.contains("\"><script>"));
}
