//! SQL injection security tests
//!
//! SeaORM binds every value, so hostile form input must land in the
//! database as literal text or be turned away by validation. Nothing a
//! form can carry should reach the SQL layer as syntax.
//!
//! Each test verifies that:
//! 1. The request completes without a server error
//! 2. Malicious SQL is treated as literal string data
//! 3. The tables remain intact afterwards
//! 4. No session is handed out that credentials did not earn

use actix_web::http::StatusCode;
use actix_web::test::{TestRequest, call_service};
use sea_orm::EntityTrait;

use hearth_accounts::entities::{sessions, users};
use hearth_accounts::service;
use hearth_accounts::testing::setup;

// =============================================================================
// SQL INJECTION - LOGIN
// =============================================================================

/// Test injection through the login username
///
/// Attack vector: Boolean-based bypass (OR 1=1) and comment tails
/// Expected: The lookup treats the value literally, finds no account,
/// and answers with the ordinary rejection
#[actix_web::test]
async fn test_sql_injection_in_login_username() {
    let (service, db) = service!();
    let hasher = setup::password_hasher().unwrap();
    setup::create_user(&db, &hasher, "john", "old_password")
        .await
        .unwrap();

    let attempts = [
        "john' OR '1'='1",
        "john'; --",
        "john' UNION SELECT * FROM users --",
        "'; DROP TABLE users; --",
    ];

    for username in attempts {
        let req = TestRequest::post()
            .uri("/login")
            .set_form([("username", username), ("password", "anything123")])
            .to_request();
        let resp = call_service(&service, req).await;

        assert_eq!(
            resp.status(),
            StatusCode::OK,
            "attempt {username} should get the rejection page"
        );
        assert!(
            !resp
                .response()
                .cookies()
                .any(|cookie| cookie.name() == "sessionid"),
            "attempt {username} must not earn a session"
        );
    }

    // The tables survived and hold exactly what they held before.
    let users = users::Entity::find().all(&db).await.unwrap();
    assert_eq!(users.len(), 1);

    let sessions = sessions::Entity::find().all(&db).await.unwrap();
    assert!(sessions.is_empty());
}

/// Test injection through the login password
///
/// Attack vector: SQL in the password of a real account
/// Expected: The password is only ever fed to the hash verifier
#[actix_web::test]
async fn test_sql_injection_in_login_password() {
    let (service, db) = service!();
    let hasher = setup::password_hasher().unwrap();
    setup::create_user(&db, &hasher, "john", "old_password")
        .await
        .unwrap();

    let req = TestRequest::post()
        .uri("/login")
        .set_form([("username", "john"), ("password", "' OR '1'='1")])
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        !resp
            .response()
            .cookies()
            .any(|cookie| cookie.name() == "sessionid")
    );
}

// =============================================================================
// SQL INJECTION - SIGNUP
// =============================================================================

/// Test injection through the signup fields
///
/// Attack vector: DROP TABLE through username and email
/// Expected: The username whitelist rejects the quote characters; the
/// tables are still there afterwards
#[actix_web::test]
async fn test_sql_injection_in_signup_fields() {
    let (service, db) = service!();

    let req = TestRequest::post()
        .uri("/signup")
        .set_form([
            ("username", "x'; DROP TABLE users; --"),
            ("email", "x@doe.com"),
            ("password1", "abcdef123456"),
            ("password2", "abcdef123456"),
        ])
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::OK, "validation re-render");

    let intact = users::Entity::find().all(&db).await;
    assert!(intact.is_ok(), "users table must survive");
    assert!(intact.unwrap().is_empty());
}

/// Test that an account whose username passes validation but contains
/// lookup-relevant characters round-trips literally
///
/// Expected: `@` and `.` are legal username characters and must be
/// stored and matched as plain text
#[actix_web::test]
async fn test_username_with_legal_punctuation_round_trips() {
    let (service, db) = service!();

    let req = TestRequest::post()
        .uri("/signup")
        .set_form([
            ("username", "john.doe@corp"),
            ("email", "john@doe.com"),
            ("password1", "abcdef123456"),
            ("password2", "abcdef123456"),
        ])
        .to_request();
    let resp = call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);

    let user = users::Model::find_by_username(&db, "john.doe@corp")
        .await
        .expect("account should exist under the literal username");
    assert_eq!(user.username, "john.doe@corp");
}
