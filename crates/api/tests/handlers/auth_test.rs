use axum::http::StatusCode;
use folio_api::handlers::auth::LOGIN_FAILED;
use folio_core::models::auth::SessionInfoResponse;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use test_log::test;

use crate::test_utils::{ADMIN_EMAIL, ADMIN_PASSWORD, TestContext, bearer, sign_in};

#[rstest]
#[case::wrong_password(ADMIN_EMAIL, "hunter2")]
#[case::unknown_email("someone@example.com", ADMIN_PASSWORD)]
#[case::empty("", "")]
#[tokio::test]
async fn failed_sign_in_says_login_failed(#[case] email: &str, #[case] password: &str) {
    let server = TestContext::new().server();

    let response = server
        .post("/api/auth/sign-in")
        .json(&json!({ "email": email, "password": password }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>(), json!({ "error": LOGIN_FAILED }));
}

#[test(tokio::test)]
async fn sign_in_issues_a_session_token() {
    let server = TestContext::new().server();

    let response = server
        .post("/api/auth/sign-in")
        .json(&json!({ "email": "Owner@Example.com", "password": ADMIN_PASSWORD }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["email"], ADMIN_EMAIL);
    assert_eq!(body["token"].as_str().map(str::len), Some(48));
    assert!(body["expiresAt"].is_string());
}

#[test(tokio::test)]
async fn session_endpoint_describes_the_current_session() {
    let server = TestContext::new().server();
    let token = sign_in(&server).await;

    let (name, value) = bearer(&token);
    let session: SessionInfoResponse = server
        .get("/api/auth/session")
        .add_header(name, value)
        .await
        .json();

    assert_eq!(session.email, ADMIN_EMAIL);
    assert!(session.expires_at > session.created_at);
}

#[test(tokio::test)]
async fn signed_out_token_is_no_longer_accepted() {
    let server = TestContext::new().server();
    let token = sign_in(&server).await;

    let (name, value) = bearer(&token);
    let response = server
        .post("/api/auth/sign-out")
        .add_header(name.clone(), value.clone())
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "signedOut": true }));

    server
        .get("/api/auth/session")
        .add_header(name, value)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[test(tokio::test)]
async fn expired_session_is_rejected() {
    let server = TestContext::new()
        .with_session_ttl(chrono::Duration::zero())
        .server();
    let token = sign_in(&server).await;

    let (name, value) = bearer(&token);
    server
        .get("/api/auth/session")
        .add_header(name, value)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[test(tokio::test)]
async fn missing_token_is_rejected() {
    let server = TestContext::new().server();

    server
        .get("/api/auth/session")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
