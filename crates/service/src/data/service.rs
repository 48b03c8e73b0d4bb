use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument};

use super::domain::{classify, Document, RecordKind, UpsertOutcome};
use super::repository::DocumentRepository;
use crate::errors::ServiceError;

/// Result of a merge-upsert: which collection was touched and the full document after saving.
#[derive(Debug, Clone)]
pub struct UpsertResult {
    pub kind: RecordKind,
    pub outcome: UpsertOutcome,
    pub document: Document,
}

/// Read / merge-upsert / full-replace over a [`DocumentRepository`].
///
/// Every call goes back to the repository; nothing is cached between calls.
#[derive(Clone)]
pub struct DataService {
    repo: Arc<dyn DocumentRepository>,
}

impl DataService {
    pub fn new(repo: Arc<dyn DocumentRepository>) -> Self { Self { repo } }

    pub async fn read(&self) -> Result<Document, ServiceError> {
        self.repo.load().await
    }

    /// Classify `body` as a user or part and upsert it by `id`.
    ///
    /// # Examples
    /// ```
    /// use service::data::{repository::mock::InMemoryRepository, service::DataService};
    /// use std::sync::Arc;
    /// let repo = Arc::new(InMemoryRepository::default());
    /// let svc = DataService::new(repo.clone());
    /// let body = serde_json::json!({"id": 1, "birthdate": "2000-01-01"});
    /// let res = tokio_test::block_on(svc.upsert(body)).unwrap();
    /// assert_eq!(res.document.users.len(), 1);
    /// assert!(repo.snapshot().parts.is_empty());
    /// ```
    #[instrument(skip(self, body))]
    pub async fn upsert(&self, body: Value) -> Result<UpsertResult, ServiceError> {
        let record = classify(body)?;
        let kind = record.kind;
        // Re-read right before mutating; no lock is held across load and save.
        let mut document = self.repo.load().await?;
        let outcome = document.upsert(record);
        self.repo.save(&document).await?;
        info!(kind = kind.as_str(), ?outcome, "record_upserted");
        Ok(UpsertResult { kind, outcome, document })
    }

    /// Replace the stored document with `body` after the users/parts shape check.
    #[instrument(skip(self, body))]
    pub async fn replace(&self, body: Value) -> Result<Document, ServiceError> {
        let document = Document::from_value(body)?;
        self.repo.save(&document).await?;
        debug!(users = document.users.len(), parts = document.parts.len(), "document_replaced");
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::repository::mock::InMemoryRepository;
    use serde_json::json;
    use std::time::Duration;

    fn service(repo: &Arc<InMemoryRepository>) -> DataService {
        DataService::new(repo.clone())
    }

    #[tokio::test]
    async fn user_then_part_with_colliding_id() -> anyhow::Result<()> {
        let repo = Arc::new(InMemoryRepository::default());
        let svc = service(&repo);

        svc.upsert(json!({"id": 1, "birthdate": "2000-01-01"})).await?;
        let res = svc.upsert(json!({"id": 1, "userId": 1, "partName": "bolt"})).await?;

        assert_eq!(res.kind, RecordKind::Part);
        assert_eq!(res.outcome, UpsertOutcome::Inserted(0));
        let stored = repo.snapshot();
        assert_eq!(stored.users, vec![json!({"id": 1, "birthdate": "2000-01-01"})]);
        assert_eq!(stored.parts, vec![json!({"id": 1, "userId": 1, "partName": "bolt"})]);
        Ok(())
    }

    #[tokio::test]
    async fn rejected_record_does_not_touch_storage() -> anyhow::Result<()> {
        let repo = Arc::new(InMemoryRepository::default());
        let svc = service(&repo);
        svc.upsert(json!({"id": 1, "birthdate": "x"})).await?;
        let before = repo.snapshot();

        let err = svc.upsert(json!({"id": 1, "name": "nobody"})).await.unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(repo.save_count(), 1);
        assert_eq!(repo.snapshot(), before);
        Ok(())
    }

    #[tokio::test]
    async fn rejected_record_wins_over_read_failure() {
        let repo = Arc::new(InMemoryRepository::default());
        repo.fail_loads(true);
        let err = service(&repo).upsert(json!({"id": 1})).await.unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn replace_discards_previous_content() -> anyhow::Result<()> {
        let repo = Arc::new(InMemoryRepository::default());
        let svc = service(&repo);
        svc.upsert(json!({"id": 1, "birthdate": "x"})).await?;
        svc.upsert(json!({"id": 2, "userId": 1})).await?;

        let doc = svc.replace(json!({"users": [{"id": 9, "birthdate": "1999-01-01"}], "parts": []})).await?;
        assert_eq!(doc.users.len(), 1);
        assert_eq!(svc.read().await?, doc);
        assert!(repo.snapshot().parts.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn invalid_replace_keeps_previous_content() -> anyhow::Result<()> {
        let repo = Arc::new(InMemoryRepository::default());
        let svc = service(&repo);
        svc.upsert(json!({"id": 1, "birthdate": "x"})).await?;
        let before = repo.snapshot();

        let err = svc.replace(json!({"users": "not-an-array", "parts": []})).await.unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(repo.snapshot(), before);
        Ok(())
    }

    #[tokio::test]
    async fn storage_failures_surface_as_io() {
        let repo = Arc::new(InMemoryRepository::default());
        let svc = service(&repo);

        repo.fail_loads(true);
        assert!(matches!(svc.read().await, Err(ServiceError::Io(_))));
        repo.fail_loads(false);

        repo.fail_saves(true);
        let err = svc.upsert(json!({"id": 1, "birthdate": "x"})).await.unwrap_err();
        assert!(matches!(err, ServiceError::Io(_)));
        let err = svc.replace(json!({"users": [], "parts": []})).await.unwrap_err();
        assert!(matches!(err, ServiceError::Io(_)));
    }

    // Two overlapping upserts both read the empty document; the later save wins.
    #[tokio::test]
    async fn concurrent_upserts_lose_an_update() -> anyhow::Result<()> {
        let repo = Arc::new(InMemoryRepository::default().with_load_delay(Duration::from_millis(50)));
        let svc = service(&repo);

        let (a, b) = tokio::join!(
            svc.upsert(json!({"id": 1, "birthdate": "a"})),
            svc.upsert(json!({"id": 2, "birthdate": "b"})),
        );
        a?;
        b?;

        assert_eq!(repo.save_count(), 2);
        assert_eq!(repo.snapshot().users.len(), 1);
        Ok(())
    }
}
