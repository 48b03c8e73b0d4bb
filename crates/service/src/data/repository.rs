use async_trait::async_trait;

use super::domain::Document;
use crate::errors::ServiceError;

/// Storage capability for the single document.
///
/// Implementations hold no lock across `load`/`save`; callers that
/// read-modify-write can lose updates under concurrency.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Current document, or the empty default when nothing usable is stored.
    async fn load(&self) -> Result<Document, ServiceError>;
    /// Overwrite the stored document.
    async fn save(&self, doc: &Document) -> Result<(), ServiceError>;
}

/// In-memory repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    pub struct InMemoryRepository {
        doc: Mutex<Document>,
        load_delay: Duration,
        fail_load: AtomicBool,
        fail_save: AtomicBool,
        saves: AtomicUsize,
    }

    impl InMemoryRepository {
        pub fn with_document(doc: Document) -> Self {
            Self { doc: Mutex::new(doc), ..Default::default() }
        }

        /// Sleep after taking the snapshot in `load`, widening the read-modify-write window.
        pub fn with_load_delay(mut self, delay: Duration) -> Self {
            self.load_delay = delay;
            self
        }

        pub fn fail_loads(&self, on: bool) { self.fail_load.store(on, Ordering::SeqCst); }

        pub fn fail_saves(&self, on: bool) { self.fail_save.store(on, Ordering::SeqCst); }

        pub fn snapshot(&self) -> Document { self.doc.lock().unwrap().clone() }

        pub fn save_count(&self) -> usize { self.saves.load(Ordering::SeqCst) }
    }

    #[async_trait]
    impl DocumentRepository for InMemoryRepository {
        async fn load(&self) -> Result<Document, ServiceError> {
            if self.fail_load.load(Ordering::SeqCst) {
                return Err(ServiceError::Io("injected read failure".into()));
            }
            let doc = self.snapshot();
            if !self.load_delay.is_zero() {
                tokio::time::sleep(self.load_delay).await;
            }
            Ok(doc)
        }

        async fn save(&self, doc: &Document) -> Result<(), ServiceError> {
            if self.fail_save.load(Ordering::SeqCst) {
                return Err(ServiceError::Io("injected write failure".into()));
            }
            *self.doc.lock().unwrap() = doc.clone();
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}
