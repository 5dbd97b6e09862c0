use async_trait::async_trait;
use chrono::Utc;
use eyre::Result;
use serde_json::Value;
use sqlx::{Pool, Postgres, types::Json};

use folio_core::{errors::FolioResult, models::content::ContentKey, store::ContentStore};

use crate::models::DbSiteContent;

pub async fn get_content(pool: &Pool<Postgres>, key: &str) -> Result<Option<DbSiteContent>> {
    tracing::debug!("Getting site content: key={}", key);

    let content = sqlx::query_as::<_, DbSiteContent>(
        r#"
        SELECT key, data, updated_at
        FROM site_content
        WHERE key = $1
        "#,
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    Ok(content)
}

pub async fn put_content(pool: &Pool<Postgres>, key: &str, data: &Value) -> Result<DbSiteContent> {
    tracing::debug!("Saving site content: key={}", key);

    let content = sqlx::query_as::<_, DbSiteContent>(
        r#"
        INSERT INTO site_content (key, data, updated_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (key) DO UPDATE SET data = EXCLUDED.data, updated_at = EXCLUDED.updated_at
        RETURNING key, data, updated_at
        "#,
    )
    .bind(key)
    .bind(Json(data))
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(content)
}

/// Content store backed by the `site_content` table.
#[derive(Debug, Clone)]
pub struct PgContentStore {
    pool: Pool<Postgres>,
}

impl PgContentStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn get(&self, key: ContentKey) -> FolioResult<Option<Value>> {
        let row = get_content(&self.pool, key.as_str()).await?;
        Ok(row.map(|row| row.data.0))
    }

    async fn put(&self, key: ContentKey, document: Value) -> FolioResult<()> {
        put_content(&self.pool, key.as_str(), &document).await?;
        Ok(())
    }
}
