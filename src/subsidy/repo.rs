use anyhow::Context;
use async_trait::async_trait;
use time::Date;
use uuid::Uuid;

use crate::db::PgStore;
use crate::subsidy::repo_types::Deadline;

#[async_trait]
pub trait DeadlineStore: Send + Sync {
    async fn insert(&self, username: &str, subsidy_name: &str, deadline: Date)
        -> anyhow::Result<Deadline>;

    /// Soonest first.
    async fn list_by_user(&self, username: &str) -> anyhow::Result<Vec<Deadline>>;

    /// Deletes one record matching all three fields (the oldest duplicate);
    /// returns how many went.
    async fn delete_matching(
        &self,
        username: &str,
        subsidy_name: &str,
        deadline: Date,
    ) -> anyhow::Result<u64>;

    async fn delete_by_id(&self, id: Uuid) -> anyhow::Result<u64>;
}

#[async_trait]
impl DeadlineStore for PgStore {
    async fn insert(
        &self,
        username: &str,
        subsidy_name: &str,
        deadline: Date,
    ) -> anyhow::Result<Deadline> {
        let row = sqlx::query_as::<_, Deadline>(
            r#"
            INSERT INTO deadlines (id, username, subsidy_name, deadline)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, subsidy_name, deadline, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(subsidy_name)
        .bind(deadline)
        .fetch_one(&self.pool)
        .await
        .context("insert deadline")?;
        Ok(row)
    }

    async fn list_by_user(&self, username: &str) -> anyhow::Result<Vec<Deadline>> {
        let rows = sqlx::query_as::<_, Deadline>(
            r#"
            SELECT id, username, subsidy_name, deadline, created_at
              FROM deadlines
             WHERE username = $1
             ORDER BY deadline ASC, created_at ASC
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await
        .context("list deadlines by user")?;
        Ok(rows)
    }

    async fn delete_matching(
        &self,
        username: &str,
        subsidy_name: &str,
        deadline: Date,
    ) -> anyhow::Result<u64> {
        let res = sqlx::query(
            r#"
            DELETE FROM deadlines
             WHERE id = (
                 SELECT id FROM deadlines
                  WHERE username = $1 AND subsidy_name = $2 AND deadline = $3
                  ORDER BY created_at ASC
                  LIMIT 1
             )
            "#,
        )
        .bind(username)
        .bind(subsidy_name)
        .bind(deadline)
        .execute(&self.pool)
        .await
        .context("delete deadline by fields")?;
        Ok(res.rows_affected())
    }

    async fn delete_by_id(&self, id: Uuid) -> anyhow::Result<u64> {
        let res = sqlx::query(r#"DELETE FROM deadlines WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("delete deadline by id")?;
        Ok(res.rows_affected())
    }
}
