use argon2::PasswordVerifier;
use axum::{body::to_bytes, http::StatusCode};
use folio_api::middleware::{auth, error_handling::map_error};
use folio_core::errors::FolioError;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

async fn body_of(error: FolioError) -> (StatusCode, Value) {
    let response = map_error(error);
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[rstest]
#[case::not_found(FolioError::NotFound("No such page".into()), StatusCode::NOT_FOUND)]
#[case::validation(FolioError::Validation("Name is required".into()), StatusCode::BAD_REQUEST)]
#[case::authentication(FolioError::Authentication("Login failed".into()), StatusCode::UNAUTHORIZED)]
#[case::authorization(FolioError::Authorization("Not allowed".into()), StatusCode::FORBIDDEN)]
#[case::conflict(FolioError::Conflict("Slot taken".into()), StatusCode::CONFLICT)]
#[case::upstream(FolioError::Upstream("Calendar down".into()), StatusCode::BAD_GATEWAY)]
#[tokio::test]
async fn client_facing_errors_keep_their_message(#[case] error: FolioError, #[case] expected: StatusCode) {
    let message = match &error {
        FolioError::NotFound(m)
        | FolioError::Validation(m)
        | FolioError::Authentication(m)
        | FolioError::Authorization(m)
        | FolioError::Conflict(m)
        | FolioError::Upstream(m) => m.clone(),
        _ => unreachable!(),
    };

    let (status, body) = body_of(error).await;

    assert_eq!(status, expected);
    assert_eq!(body, json!({ "error": message }));
}

#[tokio::test]
async fn test_error_handling_database() {
    let (status, body) = body_of(FolioError::Database(eyre::eyre!("relation \"site_content\" does not exist"))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Internal server error" }));
}

#[tokio::test]
async fn test_error_handling_internal() {
    let error = FolioError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "disk on fire",
    )));

    let (status, body) = body_of(error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body["error"].as_str().unwrap().contains("disk"));
}

#[test]
fn test_hash_password() {
    let password = "test_password";
    let hashed = auth::hash_password(password).unwrap();

    assert_ne!(hashed, password);
    assert!(hashed.starts_with("$argon2"));

    // The hash must be readable by argon2 itself, not just by our helper
    let parsed_hash = argon2::PasswordHash::new(&hashed).unwrap();
    let argon2 = argon2::Argon2::default();
    assert!(argon2.verify_password(password.as_bytes(), &parsed_hash).is_ok());
    assert!(argon2.verify_password(b"wrong_password", &parsed_hash).is_err());
}

#[test]
fn test_verify_password() {
    let hashed = auth::hash_password("test_password").unwrap();

    assert!(auth::verify_password(&hashed, "test_password").unwrap());
    assert!(!auth::verify_password(&hashed, "wrong_password").unwrap());
}
