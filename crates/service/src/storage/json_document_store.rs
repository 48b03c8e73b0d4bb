use std::{io::ErrorKind, path::{Path, PathBuf}};

use async_trait::async_trait;
use tokio::fs;
use tracing::warn;

use crate::data::{domain::Document, repository::DocumentRepository};
use crate::errors::ServiceError;

/// JSON file holding the whole document.
///
/// Reads and writes go straight to disk on every call. There is no in-memory
/// copy, no lock and no atomic rename: a save simply overwrites the file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    file_path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into() }
    }

    pub fn path(&self) -> &Path { &self.file_path }

    /// Missing or unparsable file yields the empty document; other read errors propagate.
    /// A file lacking one collection keeps the other.
    pub async fn load(&self) -> Result<Document, ServiceError> {
        let bytes = match fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Document::default()),
            Err(e) => {
                return Err(ServiceError::Io(format!("read {}: {e}", self.file_path.display())))
            }
        };
        match Document::from_stored(&bytes) {
            Ok(doc) => Ok(doc),
            Err(e) => {
                warn!(path = %self.file_path.display(), error = %e, "data file unparsable; starting empty");
                Ok(Document::default())
            }
        }
    }

    /// Pretty-print and overwrite the file.
    pub async fn save(&self, doc: &Document) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(doc)?;
        fs::write(&self.file_path, data)
            .await
            .map_err(|e| ServiceError::Io(format!("write {}: {e}", self.file_path.display())))?;
        Ok(())
    }
}

#[async_trait]
impl DocumentRepository for JsonFileStore {
    async fn load(&self) -> Result<Document, ServiceError> { self.load().await }
    async fn save(&self, doc: &Document) -> Result<(), ServiceError> { self.save(doc).await }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn tmp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("json_document_store_{tag}_{}.json", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn missing_file_loads_empty() -> Result<(), anyhow::Error> {
        let store = JsonFileStore::new(tmp_path("missing"));
        let doc = store.load().await?;
        assert_eq!(serde_json::to_value(&doc)?, json!({"users": [], "parts": []}));
        // loading never creates the file
        assert!(fs::metadata(store.path()).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_or_misshapen_file_loads_empty() -> Result<(), anyhow::Error> {
        for content in ["{not json", "", "[]", "{\"users\": {}, \"parts\": []}"] {
            let tmp = tmp_path("corrupt");
            fs::write(&tmp, content).await?;
            let doc = JsonFileStore::new(&tmp).load().await?;
            assert_eq!(doc, Document::default(), "content: {content:?}");
            let _ = fs::remove_file(&tmp).await;
        }
        Ok(())
    }

    #[tokio::test]
    async fn file_missing_a_collection_keeps_the_other() -> Result<(), anyhow::Error> {
        let tmp = tmp_path("partial");
        fs::write(&tmp, r#"{"users": [{"id": 1, "birthdate": "x"}]}"#).await?;
        let store = JsonFileStore::new(&tmp);

        let doc = store.load().await?;
        assert_eq!(doc.users, vec![json!({"id": 1, "birthdate": "x"})]);
        assert!(doc.parts.is_empty());

        // saving back writes both collections and loses nothing
        store.save(&doc).await?;
        let on_disk: serde_json::Value = serde_json::from_slice(&fs::read(&tmp).await?)?;
        assert_eq!(on_disk, json!({"users": [{"id": 1, "birthdate": "x"}], "parts": []}));

        let _ = fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn save_then_load_round_trips() -> Result<(), anyhow::Error> {
        let tmp = tmp_path("roundtrip");
        let store = JsonFileStore::new(&tmp);
        let doc = Document::from_value(json!({
            "users": [{"id": 1, "birthdate": "2000-01-01", "tags": ["a", {"b": null}]}],
            "parts": [{"id": "p1", "userId": 1, "qty": 2.5}],
            "note": "kept"
        }))?;

        store.save(&doc).await?;
        let reloaded = JsonFileStore::new(&tmp).load().await?;
        assert_eq!(reloaded, doc);

        // pretty-printed with two-space indentation
        let text = fs::read_to_string(&tmp).await?;
        assert!(text.starts_with("{\n  \"users\": ["));

        let _ = fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn save_overwrites_previous_content() -> Result<(), anyhow::Error> {
        let tmp = tmp_path("overwrite");
        let store = JsonFileStore::new(&tmp);
        let big = Document::from_value(json!({"users": [{"id": 1, "birthdate": "x", "pad": "y".repeat(512)}], "parts": []}))?;
        store.save(&big).await?;
        store.save(&Document::default()).await?;
        assert_eq!(store.load().await?, Document::default());
        let _ = fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn directory_path_is_an_io_error() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir().join(format!("json_document_store_dir_{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).await?;
        let store = JsonFileStore::new(&dir);

        assert!(matches!(store.load().await, Err(ServiceError::Io(_))));
        assert!(matches!(store.save(&Document::default()).await, Err(ServiceError::Io(_))));

        let _ = fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
