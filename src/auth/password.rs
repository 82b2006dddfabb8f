use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use bytes::Bytes;
use rand::rngs::OsRng;
use tracing::error;

/// A password digest as it comes back from storage. Depending on how the row
/// was written the digest may be raw bytes, text, or a shared byte buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredHash {
    Raw(Vec<u8>),
    Text(String),
    Binary(Bytes),
}

impl StoredHash {
    /// Normalizes every representation to the same byte sequence.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            StoredHash::Raw(v) => v,
            StoredHash::Text(s) => s.as_bytes(),
            StoredHash::Binary(b) => b,
        }
    }
}

impl From<Vec<u8>> for StoredHash {
    fn from(v: Vec<u8>) -> Self {
        StoredHash::Raw(v)
    }
}

impl From<String> for StoredHash {
    fn from(s: String) -> Self {
        StoredHash::Text(s)
    }
}

impl From<Bytes> for StoredHash {
    fn from(b: Bytes) -> Self {
        StoredHash::Binary(b)
    }
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Verifies `plain` against a stored digest of any representation. The digest
/// comparison itself is constant-time inside argon2.
pub fn verify_password(plain: &str, stored: &StoredHash) -> anyhow::Result<bool> {
    let encoded = std::str::from_utf8(stored.as_bytes()).map_err(|e| {
        error!(error = %e, "stored hash is not utf-8");
        anyhow::anyhow!("stored hash is not utf-8")
    })?;
    let parsed = PasswordHash::new(encoded).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}
