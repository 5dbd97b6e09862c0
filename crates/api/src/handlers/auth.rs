use axum::{Json, extract::State};
use folio_core::{
    errors::FolioError,
    models::auth::{SessionInfoResponse, SessionResponse, SignInRequest, SignOutResponse},
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    ApiState,
    middleware::{
        auth::{AdminSession, verify_admin},
        error_handling::AppError,
    },
};

/// Message for every failed sign-in, whatever the cause.
pub const LOGIN_FAILED: &str = "Login failed";

#[axum::debug_handler]
pub async fn sign_in(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<SignInRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let verified = verify_admin(&state.admin, &payload.email, &payload.password)
        .map_err(|e| AppError(FolioError::Internal(e.into())))?;
    if !verified {
        warn!("Failed sign-in attempt for {}", payload.email);
        return Err(FolioError::Authentication(LOGIN_FAILED.to_string()).into());
    }

    let session = state.sessions.sign_in(&state.admin.email).await;
    info!("{} signed in", session.email);

    Ok(Json(SessionResponse {
        token: session.token,
        email: session.email,
        expires_at: session.expires_at,
    }))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn sign_out(
    AdminSession(session): AdminSession,
    State(state): State<Arc<ApiState>>,
) -> Json<SignOutResponse> {
    let signed_out = state.sessions.sign_out(&session.token).await;
    Json(SignOutResponse { signed_out })
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn current_session(AdminSession(session): AdminSession) -> Json<SessionInfoResponse> {
    Json(SessionInfoResponse {
        email: session.email,
        created_at: session.created_at,
        expires_at: session.expires_at,
    })
}
