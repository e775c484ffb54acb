//! Store config and uploaded-document cache.
//!
//! One JSON document, `store_config.json`, holds both maps that make
//! ingestion idempotent across runs:
//!
//! - `stores`: store key → remote store id, so the same channel reuses
//!   the same File Search store instead of creating a new one.
//! - `documents`: video id → remote document resource id. Presence means
//!   "already uploaded, do not re-upload". At most one resource id per
//!   video id.
//!
//! The document is read fully at startup and rewritten fully after each
//! successful mutation (never batched), so a crash mid-run leaves every
//! completed upload durable.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::client::FileSearchClient;
use crate::error::{GeminiError, Result};

/// A remembered File Search store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreEntry {
    /// Remote store resource id, e.g. `fileSearchStores/abc123`
    pub store_id: String,

    /// Display name the store was created with
    pub display_name: String,

    /// When the store was first created
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    stores: BTreeMap<String, StoreEntry>,

    #[serde(default)]
    documents: BTreeMap<String, String>,
}

/// The persistent store config, held in memory and rewritten per mutation.
#[derive(Debug)]
pub struct StoreConfig {
    path: PathBuf,
    doc: StoreDocument,
}

impl StoreConfig {
    /// Load the store config from `path`.
    ///
    /// A missing file is an empty config. A malformed file is a fatal
    /// [`GeminiError::Document`]: discarding the upload cache would cause
    /// every video to be re-uploaded and re-billed.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let doc = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str(&raw).map_err(|e| GeminiError::Document {
                path: path.clone(),
                message: e.to_string(),
            })?
        } else {
            debug!(path = %path.display(), "no store config yet, starting empty");
            StoreDocument::default()
        };

        info!(
            path = %path.display(),
            stores = doc.stores.len(),
            documents = doc.documents.len(),
            "store config loaded"
        );
        Ok(Self { path, doc })
    }

    fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.doc)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Remote store id recorded for a store key, if any.
    pub fn store_id(&self, key: &str) -> Option<&str> {
        self.doc.stores.get(key).map(|e| e.store_id.as_str())
    }

    /// Record a newly created store and persist.
    pub fn record_store(&mut self, key: &str, store_id: &str, display_name: &str) -> Result<()> {
        self.doc.stores.insert(
            key.to_string(),
            StoreEntry {
                store_id: store_id.to_string(),
                display_name: display_name.to_string(),
                created_at: Utc::now(),
            },
        );
        self.save()
    }

    /// Whether a video has already been uploaded.
    pub fn is_indexed(&self, video_id: &str) -> bool {
        self.doc.documents.contains_key(video_id)
    }

    /// Remote document resource for a video, if uploaded.
    pub fn document_resource(&self, video_id: &str) -> Option<&str> {
        self.doc.documents.get(video_id).map(String::as_str)
    }

    /// Record a successful upload and persist immediately.
    ///
    /// First write wins: a video id is never remapped to a second
    /// resource, preserving the at-most-one invariant.
    pub fn record_document(&mut self, video_id: &str, resource_id: &str) -> Result<()> {
        if let Some(existing) = self.doc.documents.get(video_id) {
            debug!(video_id, existing = %existing, "video already recorded, keeping first mapping");
            return Ok(());
        }
        self.doc
            .documents
            .insert(video_id.to_string(), resource_id.to_string());
        self.save()
    }

    /// Number of uploaded documents.
    pub fn indexed_count(&self) -> usize {
        self.doc.documents.len()
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Get the remembered store for `key`, creating one remotely when absent.
///
/// Idempotent across runs: the created store id is persisted before this
/// returns, so a re-run reuses it.
pub async fn ensure_store(
    client: &FileSearchClient,
    config: &mut StoreConfig,
    key: &str,
) -> Result<String> {
    if let Some(store_id) = config.store_id(key) {
        debug!(key, store_id, "using existing file search store");
        return Ok(store_id.to_string());
    }

    info!(key, "creating new file search store");
    let store = client.create_store(key).await?;
    config.record_store(key, &store.name, key)?;
    Ok(store.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_config() {
        let tmp = TempDir::new().unwrap();
        let config = StoreConfig::load(tmp.path().join("store_config.json")).unwrap();
        assert_eq!(config.indexed_count(), 0);
        assert!(config.store_id("youtube_transcripts").is_none());
    }

    #[test]
    fn test_document_cache_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("store_config.json");

        {
            let mut config = StoreConfig::load(&path).unwrap();
            config
                .record_store("youtube_transcripts", "fileSearchStores/abc", "youtube_transcripts")
                .unwrap();
            config
                .record_document("vid-1", "fileSearchStores/abc/documents/d1")
                .unwrap();
        }

        let config = StoreConfig::load(&path).unwrap();
        assert_eq!(config.store_id("youtube_transcripts"), Some("fileSearchStores/abc"));
        assert!(config.is_indexed("vid-1"));
        assert_eq!(
            config.document_resource("vid-1"),
            Some("fileSearchStores/abc/documents/d1")
        );
        assert!(!config.is_indexed("vid-2"));
    }

    #[test]
    fn test_at_most_one_resource_per_video() {
        let tmp = TempDir::new().unwrap();
        let mut config = StoreConfig::load(tmp.path().join("store_config.json")).unwrap();

        config.record_document("vid-1", "documents/first").unwrap();
        config.record_document("vid-1", "documents/second").unwrap();

        assert_eq!(config.document_resource("vid-1"), Some("documents/first"));
        assert_eq!(config.indexed_count(), 1);
    }

    #[test]
    fn test_malformed_config_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("store_config.json");
        std::fs::write(&path, "][").unwrap();

        let err = StoreConfig::load(&path).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, GeminiError::Document { .. }));
    }
}
