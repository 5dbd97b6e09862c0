use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;
use serde_json::Value;
use tokio::sync::RwLock;

use folio_core::{
    calendar::CalendarBackend,
    errors::FolioResult,
    models::{
        content::ContentKey,
        schedule::{EventId, EventRequest, Interval},
    },
    store::ContentStore,
};

// Mock backends for testing
mock! {
    pub Calendar {}

    #[async_trait]
    impl CalendarBackend for Calendar {
        async fn list_busy_intervals(
            &self,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> FolioResult<Vec<Interval>>;

        async fn create_event(&self, request: EventRequest) -> FolioResult<EventId>;
    }
}

mock! {
    pub Store {}

    #[async_trait]
    impl ContentStore for Store {
        async fn get(&self, key: ContentKey) -> FolioResult<Option<Value>>;

        async fn put(&self, key: ContentKey, document: Value) -> FolioResult<()>;
    }
}

/// Content store kept in memory, for tests and local experiments.
#[derive(Debug, Clone, Default)]
pub struct InMemoryContentStore {
    documents: Arc<RwLock<HashMap<ContentKey, Value>>>,
}

impl InMemoryContentStore {
    pub fn with_documents(documents: impl IntoIterator<Item = (ContentKey, Value)>) -> Self {
        Self {
            documents: Arc::new(RwLock::new(documents.into_iter().collect())),
        }
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn get(&self, key: ContentKey) -> FolioResult<Option<Value>> {
        Ok(self.documents.read().await.get(&key).cloned())
    }

    async fn put(&self, key: ContentKey, document: Value) -> FolioResult<()> {
        self.documents.write().await.insert(key, document);
        Ok(())
    }
}
