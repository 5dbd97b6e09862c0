use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use folio_core::{
    errors::FolioError,
    models::contact::{ContactMessage, ContactMessageRequest, ContactMessageResponse},
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{ApiState, middleware::auth::AdminSession, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn submit_message(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<ContactMessageRequest>,
) -> Result<(StatusCode, Json<ContactMessageResponse>), AppError> {
    payload.validate()?;
    let payload = payload.trimmed();

    let row = folio_db::repositories::contact::create_contact_message(
        &state.db_pool,
        &payload.name,
        &payload.email,
        &payload.subject,
        &payload.message,
    )
    .await
    .map_err(FolioError::Database)?;

    info!("Contact message {} received from {}", row.id, row.email);

    Ok((
        StatusCode::CREATED,
        Json(ContactMessageResponse {
            id: row.id,
            success: true,
        }),
    ))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn list_messages(
    _admin: AdminSession,
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<ContactMessage>>, AppError> {
    let rows = folio_db::repositories::contact::list_contact_messages(&state.db_pool)
        .await
        .map_err(FolioError::Database)?;

    Ok(Json(rows.into_iter().map(ContactMessage::from).collect()))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn mark_read(
    _admin: AdminSession,
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ContactMessage>, AppError> {
    let row = folio_db::repositories::contact::mark_contact_message_read(&state.db_pool, id)
        .await
        .map_err(FolioError::Database)?
        .ok_or_else(|| FolioError::NotFound(format!("Contact message {} not found", id)))?;

    Ok(Json(row.into()))
}
