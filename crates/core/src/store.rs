//! Key-value document store holding the site content.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    errors::{FolioError, FolioResult},
    models::content::ContentKey,
};

#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn get(&self, key: ContentKey) -> FolioResult<Option<Value>>;

    async fn put(&self, key: ContentKey, document: Value) -> FolioResult<()>;
}

/// Reads a typed document, falling back to the empty document when absent.
pub async fn load_document<T>(store: &dyn ContentStore, key: ContentKey) -> FolioResult<T>
where
    T: DeserializeOwned + Default,
{
    match store.get(key).await? {
        Some(value) => serde_json::from_value(value).map_err(|e| {
            FolioError::Internal(format!("Stored '{}' document is malformed: {}", key, e).into())
        }),
        None => Ok(T::default()),
    }
}

/// Serializes and stores a typed document.
pub async fn save_document<T>(store: &dyn ContentStore, key: ContentKey, document: &T) -> FolioResult<()>
where
    T: Serialize + Sync,
{
    let value = serde_json::to_value(document)
        .map_err(|e| FolioError::Internal(Box::new(e)))?;
    store.put(key, value).await
}
