use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{FromRow, types::Json};
use uuid::Uuid;

use folio_core::models::{contact::ContactMessage, schedule::Interval};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSiteContent {
    pub key: String,
    pub data: Json<Value>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DbContactMessage> for ContactMessage {
    fn from(row: DbContactMessage) -> Self {
        ContactMessage {
            id: row.id,
            name: row.name,
            email: row.email,
            subject: row.subject,
            message: row.message,
            status: row.status,
            read: row.read,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub summary: String,
    pub attendee_email: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbAppointment {
    pub fn interval(&self) -> Interval {
        Interval::new(self.start_time, self.end_time)
    }
}
