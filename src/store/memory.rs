use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::DocumentStore;
use crate::error::StoreError;
use crate::models::{document_status, DocumentRecord};

/// In-memory [`DocumentStore`] used by tests and database-less deployments.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    documents: HashMap<String, DocumentRecord>,
    collaborators: HashSet<(String, i64)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document with the given owner and content.
    pub async fn insert_document(&self, doc_id: &str, owner_id: i64, content: &str) {
        let now = Utc::now();
        let record = DocumentRecord {
            doc_id: doc_id.to_string(),
            title: doc_id.to_string(),
            owner_id,
            content: content.to_string(),
            status: document_status::ACTIVE,
            created_at: now,
            updated_at: now,
        };
        self.inner
            .write()
            .await
            .documents
            .insert(doc_id.to_string(), record);
    }

    /// Grant `user_id` collaborator access to `doc_id`.
    pub async fn add_collaborator(&self, doc_id: &str, user_id: i64) {
        self.inner
            .write()
            .await
            .collaborators
            .insert((doc_id.to_string(), user_id));
    }

    /// Current durable content of `doc_id`, if any.
    pub async fn content(&self, doc_id: &str) -> Option<String> {
        self.inner
            .read()
            .await
            .documents
            .get(doc_id)
            .map(|doc| doc.content.clone())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn fetch_document(&self, doc_id: &str) -> Result<Option<DocumentRecord>, StoreError> {
        Ok(self.inner.read().await.documents.get(doc_id).cloned())
    }

    async fn is_collaborator(&self, doc_id: &str, user_id: i64) -> Result<bool, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .collaborators
            .contains(&(doc_id.to_string(), user_id)))
    }

    async fn save_content(&self, doc_id: &str, content: &str) -> Result<(), StoreError> {
        let mut state = self.inner.write().await;
        match state.documents.get_mut(doc_id) {
            Some(doc) => {
                doc.content = content.to_string();
                doc.updated_at = Utc::now();
                Ok(())
            }
            None => Err(StoreError(format!("unknown document '{doc_id}'"))),
        }
    }
}
