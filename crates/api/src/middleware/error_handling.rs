//! # Error Handling Module
//!
//! Converts domain errors into HTTP responses. Every error body has the same
//! shape, `{"error": "<message>"}`.
//!
//! | Error            | Status |
//! |------------------|--------|
//! | `NotFound`       | 404    |
//! | `Validation`     | 400    |
//! | `Authentication` | 401    |
//! | `Authorization`  | 403    |
//! | `Conflict`       | 409    |
//! | `Upstream`       | 502    |
//! | `Database`       | 500    |
//! | `Internal`       | 500    |
//!
//! Client-facing variants carry a message written for the visitor, which is
//! returned as is. Server-side failures are logged in full and answered with a
//! generic message so driver or upstream details never reach the browser.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use folio_core::errors::FolioError;
use serde_json::json;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// ```
/// use axum::Json;
/// use folio_api::middleware::error_handling::AppError;
/// use folio_core::errors::FolioError;
///
/// async fn handler(found: bool) -> Result<Json<&'static str>, AppError> {
///     if !found {
///         return Err(FolioError::NotFound("No such page".into()).into());
///     }
///     Ok(Json("ok"))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub FolioError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            FolioError::NotFound(_) => StatusCode::NOT_FOUND,
            FolioError::Validation(_) => StatusCode::BAD_REQUEST,
            FolioError::Authentication(_) => StatusCode::UNAUTHORIZED,
            FolioError::Authorization(_) => StatusCode::FORBIDDEN,
            FolioError::Conflict(_) => StatusCode::CONFLICT,
            FolioError::Upstream(_) => StatusCode::BAD_GATEWAY,
            FolioError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            FolioError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The text shown to the client.
    pub fn message(&self) -> String {
        match &self.0 {
            FolioError::NotFound(msg)
            | FolioError::Validation(msg)
            | FolioError::Authentication(msg)
            | FolioError::Authorization(msg)
            | FolioError::Conflict(msg)
            | FolioError::Upstream(msg) => msg.clone(),
            FolioError::Database(_) | FolioError::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        let body = Json(json!({ "error": self.message() }));
        (status, body).into_response()
    }
}

/// Allows `?` on `FolioResult` inside handlers.
impl From<FolioError> for AppError {
    fn from(err: FolioError) -> Self {
        AppError(err)
    }
}

/// Repository functions return `eyre::Result`; their failures are database errors.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(FolioError::Database(err))
    }
}

/// Maps a FolioError to an HTTP response
pub fn map_error(err: FolioError) -> Response {
    AppError(err).into_response()
}
