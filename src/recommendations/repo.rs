use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::PgStore;

/// Crop advice produced for a user.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Recommendation {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[async_trait]
pub trait RecommendationStore: Send + Sync {
    async fn insert(&self, username: &str, content: &str) -> anyhow::Result<Recommendation>;

    /// Newest first.
    async fn list_by_user(&self, username: &str) -> anyhow::Result<Vec<Recommendation>>;
}

#[async_trait]
impl RecommendationStore for PgStore {
    async fn insert(&self, username: &str, content: &str) -> anyhow::Result<Recommendation> {
        let rec = sqlx::query_as::<_, Recommendation>(
            r#"
            INSERT INTO recommendations (id, username, content)
            VALUES ($1, $2, $3)
            RETURNING id, username, content, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(content)
        .fetch_one(&self.pool)
        .await
        .context("insert recommendation")?;
        Ok(rec)
    }

    async fn list_by_user(&self, username: &str) -> anyhow::Result<Vec<Recommendation>> {
        let rows = sqlx::query_as::<_, Recommendation>(
            r#"
            SELECT id, username, content, created_at
              FROM recommendations
             WHERE username = $1
             ORDER BY created_at DESC
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await
        .context("list recommendations by user")?;
        Ok(rows)
    }
}
