//! # Authentication Module
//!
//! Admin sign-in and request authorization.
//!
//! The site has a single admin account whose email and Argon2 password hash
//! come from configuration. A successful sign-in opens a session in the
//! [`SessionStore`](crate::session::SessionStore); admin-only handlers take an
//! [`AdminSession`] argument, which reads the `Authorization: Bearer <token>`
//! header and rejects the request with 401 when the token is missing, unknown
//! or expired.

use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use eyre::Result;
use folio_core::errors::FolioError;
use tracing::warn;

use crate::{
    ApiState, config::AdminCredentials, middleware::error_handling::AppError, session::Session,
};

/// Hashes a password using the Argon2 algorithm
///
/// Returns the hash in PHC string format, which embeds the algorithm,
/// parameters and a freshly generated salt. This is the value expected in
/// `ADMIN_PASSWORD_HASH`.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Checks `password` against a PHC hash string.
///
/// A malformed hash is an error rather than a mismatch so a broken
/// configuration does not look like a wrong password.
pub fn verify_password(password_hash: &str, password: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| eyre::eyre!("Stored password hash is malformed: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Checks a sign-in attempt against the configured admin account.
///
/// Emails compare case-insensitively.
pub fn verify_admin(admin: &AdminCredentials, email: &str, password: &str) -> Result<bool> {
    if !admin.email.trim().eq_ignore_ascii_case(email.trim()) {
        return Ok(false);
    }
    verify_password(&admin.password_hash, password)
}

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Extractor for requests made by the signed-in admin.
#[derive(Debug, Clone)]
pub struct AdminSession(pub Session);

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| FolioError::Authentication("Sign in required".to_string()))?;

        match state.sessions.validate(token).await {
            Some(session) => Ok(AdminSession(session)),
            None => {
                warn!("Rejected request with an unknown or expired session token");
                Err(FolioError::Authentication("Session expired, please sign in again".to_string()).into())
            }
        }
    }
}
