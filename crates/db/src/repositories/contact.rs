use crate::models::DbContactMessage;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_contact_message(
    pool: &Pool<Postgres>,
    name: &str,
    email: &str,
    subject: &str,
    message: &str,
) -> Result<DbContactMessage> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating contact message: id={}, email={}", id, email);

    let row = sqlx::query_as::<_, DbContactMessage>(
        r#"
        INSERT INTO contact_messages (id, name, email, subject, message, status, read, created_at)
        VALUES ($1, $2, $3, $4, $5, 'new', FALSE, $6)
        RETURNING id, name, email, subject, message, status, read, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(subject)
    .bind(message)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn list_contact_messages(pool: &Pool<Postgres>) -> Result<Vec<DbContactMessage>> {
    let rows = sqlx::query_as::<_, DbContactMessage>(
        r#"
        SELECT id, name, email, subject, message, status, read, created_at
        FROM contact_messages
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Marks a message as read; `None` when no message has that id.
pub async fn mark_contact_message_read(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbContactMessage>> {
    let row = sqlx::query_as::<_, DbContactMessage>(
        r#"
        UPDATE contact_messages
        SET read = TRUE
        WHERE id = $1
        RETURNING id, name, email, subject, message, status, read, created_at
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
