use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::FolioResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessageRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactMessageRequest {
    /// The request with surrounding whitespace removed from every field.
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }

    pub fn validate(&self) -> FolioResult<()> {
        super::require_text("name", &self.name)?;
        super::require_email(&self.email)?;
        super::require_text("subject", &self.subject)?;
        super::require_text("message", &self.message)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessageResponse {
    pub id: Uuid,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
