use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use super::DocumentStore;
use crate::error::StoreError;
use crate::models::DocumentRecord;

/// PostgreSQL-backed [`DocumentStore`].
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Connect to the database behind the metadata service.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;
        info!("Connected to document database");
        Ok(Self { pool })
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn fetch_document(&self, doc_id: &str) -> Result<Option<DocumentRecord>, StoreError> {
        let row = sqlx::query_as::<_, DocumentRecord>(
            r#"
            SELECT doc_id, title, owner_id, COALESCE(content, '') AS content,
                   status, created_at, updated_at
            FROM documents
            WHERE doc_id = $1
            "#,
        )
        .bind(doc_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn is_collaborator(&self, doc_id: &str, user_id: i64) -> Result<bool, StoreError> {
        let row: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM collaborators WHERE doc_id = $1 AND user_id = $2")
                .bind(doc_id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.is_some())
    }

    async fn save_content(&self, doc_id: &str, content: &str) -> Result<(), StoreError> {
        sqlx::query("UPDATE documents SET content = $2, updated_at = now() WHERE doc_id = $1")
            .bind(doc_id)
            .bind(content)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
