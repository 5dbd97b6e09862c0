use axum::http::StatusCode;
use fake::{
    Fake,
    faker::{internet::en::SafeEmail, lorem::en::Sentence, name::en::Name},
};
use rstest::rstest;
use serde_json::{Value, json};
use test_log::test;

use crate::test_utils::{TestContext, bearer};

fn message() -> Value {
    json!({
        "name": Name().fake::<String>(),
        "email": SafeEmail().fake::<String>(),
        "subject": Sentence(2..4).fake::<String>(),
        "message": Sentence(5..12).fake::<String>(),
    })
}

#[rstest]
#[case::blank_name("name", json!("   "))]
#[case::no_at_sign("email", json!("visitor.example.com"))]
#[case::blank_subject("subject", json!(""))]
#[case::blank_message("message", json!("\n"))]
#[tokio::test]
async fn invalid_submission_is_rejected_before_storage(#[case] field: &str, #[case] bad: Value) {
    let server = TestContext::new().server();
    let mut body = message();
    body[field] = bad;

    let response = server.post("/api/contact").json(&body).await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test(tokio::test)]
async fn listing_messages_requires_a_session() {
    let server = TestContext::new().server();

    server
        .get("/api/contact/messages")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[test(tokio::test)]
async fn marking_read_requires_a_session() {
    let server = TestContext::new().server();

    let (name, value) = bearer("stale-token");
    server
        .put("/api/contact/messages/6f1c1f5e-8f51-4f0e-9a65-0cfe1c7a9b1d/read")
        .add_header(name, value)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
