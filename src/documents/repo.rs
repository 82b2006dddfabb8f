use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use crate::db::PgStore;
use crate::documents::repo_types::{Document, NewDocument};

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, new: NewDocument<'_>) -> anyhow::Result<Document>;

    /// Newest upload first.
    async fn list_by_user(&self, username: &str) -> anyhow::Result<Vec<Document>>;

    /// Returns false when no document has this id.
    async fn set_summary(&self, id: Uuid, summary: &str) -> anyhow::Result<bool>;
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn insert(&self, new: NewDocument<'_>) -> anyhow::Result<Document> {
        let doc = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (id, username, filename, extracted_text, summary)
            VALUES ($1, $2, $3, $4, NULL)
            RETURNING id, username, filename, extracted_text, uploaded_at, summary
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.username)
        .bind(new.filename)
        .bind(new.extracted_text)
        .fetch_one(&self.pool)
        .await
        .context("insert document")?;
        Ok(doc)
    }

    async fn list_by_user(&self, username: &str) -> anyhow::Result<Vec<Document>> {
        let rows = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, username, filename, extracted_text, uploaded_at, summary
              FROM documents
             WHERE username = $1
             ORDER BY uploaded_at DESC
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await
        .context("list documents by user")?;
        Ok(rows)
    }

    async fn set_summary(&self, id: Uuid, summary: &str) -> anyhow::Result<bool> {
        let res = sqlx::query(r#"UPDATE documents SET summary = $2 WHERE id = $1"#)
            .bind(id)
            .bind(summary)
            .execute(&self.pool)
            .await
            .context("set document summary")?;
        Ok(res.rows_affected() > 0)
    }
}
