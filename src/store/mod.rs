use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::DocumentRecord;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

/// Durable document metadata and content, owned by the external CRUD service.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document by id.
    async fn fetch_document(&self, doc_id: &str) -> Result<Option<DocumentRecord>, StoreError>;

    /// Whether `user_id` was granted collaborator access to `doc_id`.
    async fn is_collaborator(&self, doc_id: &str, user_id: i64) -> Result<bool, StoreError>;

    /// Overwrite the durable content of `doc_id`.
    async fn save_content(&self, doc_id: &str, content: &str) -> Result<(), StoreError>;
}

pub type SharedStore = Arc<dyn DocumentStore>;
