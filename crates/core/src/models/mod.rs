pub mod auth;
pub mod contact;
pub mod content;
pub mod schedule;

use crate::errors::{FolioError, FolioResult};

/// Rejects blank values for required form fields.
pub(crate) fn require_text(field: &str, value: &str) -> FolioResult<()> {
    if value.trim().is_empty() {
        return Err(FolioError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Loose email check: one `@` with something on each side.
pub(crate) fn require_email(value: &str) -> FolioResult<()> {
    require_text("email", value)?;
    match value.trim().split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(FolioError::Validation(format!(
            "'{}' is not a valid email address",
            value
        ))),
    }
}
