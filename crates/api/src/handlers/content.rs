use axum::{
    Json,
    extract::{Path, State},
};
use folio_core::{
    editor::Editable,
    errors::FolioError,
    models::content::{ContactContent, ContentKey, HomeContent, ResumeContent},
    store::{ContentStore, load_document, save_document},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::{ApiState, middleware::auth::AdminSession, middleware::error_handling::AppError};

/// Body of a `PATCH` on a content document.
#[derive(Debug, Deserialize)]
pub struct EditContentRequest {
    pub edits: Vec<Value>,
}

fn to_json<D: Serialize>(document: &D) -> Result<Value, AppError> {
    serde_json::to_value(document).map_err(|e| AppError(FolioError::Internal(Box::new(e))))
}

async fn read<D>(store: &dyn ContentStore, key: ContentKey) -> Result<Value, AppError>
where
    D: DeserializeOwned + Serialize + Default,
{
    let document: D = load_document(store, key).await?;
    to_json(&document)
}

async fn replace<D>(store: &dyn ContentStore, key: ContentKey, body: Value) -> Result<Value, AppError>
where
    D: DeserializeOwned + Serialize + Sync,
{
    let document: D = serde_json::from_value(body)
        .map_err(|e| FolioError::Validation(format!("Invalid {} document: {}", key, e)))?;
    save_document(store, key, &document).await?;
    to_json(&document)
}

async fn edit<D>(store: &dyn ContentStore, key: ContentKey, edits: Vec<Value>) -> Result<Value, AppError>
where
    D: Editable + DeserializeOwned + Serialize + Default + Sync,
    D::Edit: DeserializeOwned,
{
    let edits = edits
        .into_iter()
        .enumerate()
        .map(|(position, raw)| {
            serde_json::from_value::<D::Edit>(raw).map_err(|e| {
                FolioError::Validation(format!("Edit {} for {} is invalid: {}", position, key, e))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let document: D = load_document(store, key).await?;
    let updated = document.apply_all(edits)?;
    save_document(store, key, &updated).await?;
    to_json(&updated)
}

#[axum::debug_handler]
pub async fn get_content(
    State(state): State<Arc<ApiState>>,
    Path(key): Path<String>,
) -> Result<Json<Value>, AppError> {
    let key: ContentKey = key.parse()?;
    let store = state.content.as_ref();

    let document = match key {
        ContentKey::Home => read::<HomeContent>(store, key).await?,
        ContentKey::Resume => read::<ResumeContent>(store, key).await?,
        ContentKey::Contact => read::<ContactContent>(store, key).await?,
    };

    Ok(Json(document))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn put_content(
    AdminSession(session): AdminSession,
    State(state): State<Arc<ApiState>>,
    Path(key): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let key: ContentKey = key.parse()?;
    let store = state.content.as_ref();

    let document = match key {
        ContentKey::Home => replace::<HomeContent>(store, key, body).await?,
        ContentKey::Resume => replace::<ResumeContent>(store, key, body).await?,
        ContentKey::Contact => replace::<ContactContent>(store, key, body).await?,
    };

    info!("{} replaced the {} document", session.email, key);
    Ok(Json(document))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn patch_content(
    AdminSession(session): AdminSession,
    State(state): State<Arc<ApiState>>,
    Path(key): Path<String>,
    Json(body): Json<EditContentRequest>,
) -> Result<Json<Value>, AppError> {
    let key: ContentKey = key.parse()?;
    let store = state.content.as_ref();
    let count = body.edits.len();

    let document = match key {
        ContentKey::Home => edit::<HomeContent>(store, key, body.edits).await?,
        ContentKey::Resume => edit::<ResumeContent>(store, key, body.edits).await?,
        ContentKey::Contact => edit::<ContactContent>(store, key, body.edits).await?,
    };

    info!("{} applied {} edits to the {} document", session.email, count, key);
    Ok(Json(document))
}
