//! Loading default site content from JSON files.
//!
//! A seed directory holds `home.json`, `resume.json` and `contact.json`. Each
//! file present is checked against its document type before anything is
//! written, so a typo in one file does not leave the store half seeded.

use std::path::Path;

use eyre::{Result, WrapErr};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::info;

use folio_core::{
    models::content::{ContactContent, ContentKey, HomeContent, ResumeContent},
    store::ContentStore,
};

/// Parses `value` as the document type stored under `key` and re-serializes
/// it, dropping unknown fields and filling missing ones.
pub fn normalize_document(key: ContentKey, value: Value) -> Result<Value> {
    fn roundtrip<T: DeserializeOwned + Serialize>(value: Value) -> Result<Value> {
        let typed: T = serde_json::from_value(value)?;
        Ok(serde_json::to_value(typed)?)
    }

    match key {
        ContentKey::Home => roundtrip::<HomeContent>(value),
        ContentKey::Resume => roundtrip::<ResumeContent>(value),
        ContentKey::Contact => roundtrip::<ContactContent>(value),
    }
    .wrap_err_with(|| format!("Invalid '{}' document", key))
}

/// Reads every seed file present in `dir`.
pub fn read_seed_documents(dir: &Path) -> Result<Vec<(ContentKey, Value)>> {
    let mut documents = Vec::new();

    for key in ContentKey::ALL {
        let path = dir.join(format!("{}.json", key));
        if !path.exists() {
            info!("No seed file for '{}' at {}", key, path.display());
            continue;
        }

        let raw = std::fs::read_to_string(&path)
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
        let value: Value = serde_json::from_str(&raw)
            .wrap_err_with(|| format!("{} is not valid JSON", path.display()))?;

        documents.push((key, normalize_document(key, value)?));
    }

    Ok(documents)
}

/// Writes the documents to the store, returning how many were written.
pub async fn seed_content(store: &dyn ContentStore, documents: Vec<(ContentKey, Value)>) -> Result<usize> {
    let count = documents.len();
    for (key, document) in documents {
        store
            .put(key, document)
            .await
            .map_err(|e| eyre::eyre!("Failed to store '{}' document: {}", key, e))?;
        info!("Seeded '{}' document", key);
    }
    Ok(count)
}
