use sqlx::FromRow;
use time::OffsetDateTime;

use super::password::StoredHash;

/// Row as read from the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub username: String,
    pub password_hash: Vec<u8>,
    pub preferred_language: String,
    pub created_at: OffsetDateTime,
}

/// User record. The hash is never serialized.
#[derive(Debug, Clone)]
pub struct User {
    pub username: String,
    pub password_hash: StoredHash,
    pub preferred_language: String,
    pub created_at: OffsetDateTime,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        Self {
            username: r.username,
            password_hash: r.password_hash.into(),
            preferred_language: r.preferred_language,
            created_at: r.created_at,
        }
    }
}

/// Fields supplied when creating a user.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub preferred_language: &'a str,
}
