use axum::http::StatusCode;
use folio_core::{errors::FolioError, models::content::ContentKey, store::ContentStore};
use folio_db::mock::repositories::{InMemoryContentStore, MockStore};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use test_log::test;

use crate::test_utils::{TestContext, bearer, sign_in};

fn seeded_home() -> InMemoryContentStore {
    InMemoryContentStore::with_documents([(
        ContentKey::Home,
        json!({
            "title": "Jane Doe",
            "stats": [{ "value": "10+", "label": "Years" }]
        }),
    )])
}

#[test(tokio::test)]
async fn unknown_document_is_not_found() {
    let server = TestContext::new().server();

    let response = server.get("/api/content/blog").await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[test(tokio::test)]
async fn missing_document_reads_as_empty() {
    let server = TestContext::new().server();

    let body: Value = server.get("/api/content/contact").await.json();

    assert_eq!(
        body,
        json!({ "email": "", "phone": "", "location": "", "mapEmbedUrl": "" })
    );
}

#[test(tokio::test)]
async fn stored_document_is_returned_with_defaults_filled() {
    let server = TestContext::new().with_content(seeded_home()).server();

    let body: Value = server.get("/api/content/home").await.json();

    assert_eq!(body["title"], "Jane Doe");
    assert_eq!(body["subtitle"], "");
    assert_eq!(body["socialLinks"], json!([]));
}

#[test(tokio::test)]
async fn writes_require_a_session() {
    let server = TestContext::new().server();

    server
        .put("/api/content/home")
        .json(&json!({ "title": "Hijacked" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let (name, value) = bearer("made-up-token");
    server
        .patch("/api/content/home")
        .add_header(name, value)
        .json(&json!({ "edits": [] }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[test(tokio::test)]
async fn admin_can_replace_a_document() {
    let store = InMemoryContentStore::default();
    let server = TestContext::new().with_content(store.clone()).server();
    let token = sign_in(&server).await;

    let (name, value) = bearer(&token);
    let response = server
        .put("/api/content/contact")
        .add_header(name, value)
        .json(&json!({ "email": "hello@example.com", "phone": "555-0100" }))
        .await;
    response.assert_status_ok();

    let stored = store.get(ContentKey::Contact).await.unwrap().unwrap();
    assert_eq!(stored["email"], "hello@example.com");
    assert_eq!(stored["mapEmbedUrl"], "");
}

#[test(tokio::test)]
async fn replacement_must_match_the_document_shape() {
    let store = seeded_home();
    let server = TestContext::new().with_content(store.clone()).server();
    let token = sign_in(&server).await;

    let (name, value) = bearer(&token);
    server
        .put("/api/content/home")
        .add_header(name, value)
        .json(&json!({ "stats": "lots" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let stored = store.get(ContentKey::Home).await.unwrap().unwrap();
    assert_eq!(stored["title"], "Jane Doe");
}

#[test(tokio::test)]
async fn admin_can_apply_structured_edits() {
    let store = seeded_home();
    let server = TestContext::new().with_content(store.clone()).server();
    let token = sign_in(&server).await;

    let (name, value) = bearer(&token);
    let response = server
        .patch("/api/content/home")
        .add_header(name, value)
        .json(&json!({
            "edits": [
                { "target": "field", "edit": { "field": "subtitle", "value": "Growth marketer" } },
                { "target": "stats", "edit": { "op": "add", "value": { "value": "40%", "label": "Retention" } } },
                { "target": "social_links", "edit": { "op": "add", "value": { "icon": "github", "url": "https://github.com/janedoe" } } }
            ]
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["subtitle"], "Growth marketer");
    assert_eq!(body["stats"][1], json!({ "value": "40%", "label": "Retention" }));
    assert_eq!(body["socialLinks"][0]["icon"], "github");

    let stored = store.get(ContentKey::Home).await.unwrap().unwrap();
    assert_eq!(stored, body);
}

#[test(tokio::test)]
async fn failing_edit_rejects_the_whole_batch() {
    let store = seeded_home();
    let server = TestContext::new().with_content(store.clone()).server();
    let token = sign_in(&server).await;
    let before = store.get(ContentKey::Home).await.unwrap();

    let (name, value) = bearer(&token);
    server
        .patch("/api/content/home")
        .add_header(name, value)
        .json(&json!({
            "edits": [
                { "target": "field", "edit": { "field": "title", "value": "Changed" } },
                { "target": "stats", "edit": { "op": "remove", "index": 5 } }
            ]
        }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    assert_eq!(store.get(ContentKey::Home).await.unwrap(), before);
}

#[test(tokio::test)]
async fn resume_achievements_are_edited_per_experience() {
    let store = InMemoryContentStore::with_documents([(
        ContentKey::Resume,
        json!({
            "experience": [
                { "role": "Lead", "company": "Acme", "achievements": ["Grew revenue"] }
            ]
        }),
    )]);
    let server = TestContext::new().with_content(store.clone()).server();
    let token = sign_in(&server).await;

    let (name, value) = bearer(&token);
    let body: Value = server
        .patch("/api/content/resume")
        .add_header(name, value)
        .json(&json!({
            "edits": [
                { "target": "achievements", "edit": { "index": 0, "edit": { "op": "update", "index": 0, "value": "Grew revenue 3x" } } }
            ]
        }))
        .await
        .json();

    assert_eq!(body["experience"][0]["achievements"], json!(["Grew revenue 3x"]));
}

#[test(tokio::test)]
async fn store_read_failure_is_a_generic_server_error() {
    let mut store = MockStore::new();
    store
        .expect_get()
        .returning(|_| Err(FolioError::Database(eyre::eyre!("connection reset by peer"))));
    let server = TestContext::new().with_content(store).server();

    let response = server.get("/api/content/home").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>(), json!({ "error": "Internal server error" }));
}

#[test(tokio::test)]
async fn malformed_stored_document_is_a_server_error() {
    let mut store = MockStore::new();
    store
        .expect_get()
        .withf(|key| *key == ContentKey::Contact)
        .returning(|_| Ok(Some(json!({ "email": ["not", "a", "string"] }))));
    let server = TestContext::new().with_content(store).server();

    server
        .get("/api/content/contact")
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[test(tokio::test)]
async fn store_write_failure_is_reported_after_edits_apply() {
    let mut store = MockStore::new();
    store
        .expect_get()
        .withf(|key| *key == ContentKey::Home)
        .returning(|_| Ok(Some(json!({ "title": "Jane Doe" }))));
    store
        .expect_put()
        .withf(|key, document| *key == ContentKey::Home && document["title"] == "Changed")
        .times(1)
        .returning(|_, _| Err(FolioError::Database(eyre::eyre!("disk full"))));
    let server = TestContext::new().with_content(store).server();
    let token = sign_in(&server).await;

    let (name, value) = bearer(&token);
    let response = server
        .patch("/api/content/home")
        .add_header(name, value)
        .json(&json!({
            "edits": [{ "target": "field", "edit": { "field": "title", "value": "Changed" } }]
        }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>(), json!({ "error": "Internal server error" }));
}
