use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Document status values as stored by the metadata service.
pub mod document_status {
    pub const DELETED: i16 = 0;
    pub const ACTIVE: i16 = 1;
}

/// A document row from the metadata store.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DocumentRecord {
    pub doc_id: String,
    pub title: String,
    pub owner_id: i64,
    pub content: String,
    pub status: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentRecord {
    pub fn is_deleted(&self) -> bool {
        self.status == document_status::DELETED
    }
}
