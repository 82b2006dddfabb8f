use async_trait::async_trait;

use crate::auth::repo_types::{NewUser, User, UserRow};
use crate::db::{is_unique_violation, PgStore};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;

    /// Inserts a user. Returns `None` when the username is already taken.
    async fn create(&self, new: NewUser<'_>) -> anyhow::Result<Option<User>>;
}

#[async_trait]
impl UserStore for PgStore {
    /// Find a user by username.
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT username, password_hash, preferred_language, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    async fn create(&self, new: NewUser<'_>) -> anyhow::Result<Option<User>> {
        let res = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, password_hash, preferred_language)
            VALUES ($1, $2, $3)
            RETURNING username, password_hash, preferred_language, created_at
            "#,
        )
        .bind(new.username)
        .bind(new.password_hash.as_bytes())
        .bind(new.preferred_language)
        .fetch_one(&self.pool)
        .await;

        match res {
            Ok(row) => Ok(Some(row.into())),
            Err(e) if is_unique_violation(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
