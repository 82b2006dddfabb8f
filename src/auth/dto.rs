use serde::{Deserialize, Serialize};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default = "default_language")]
    pub preferred_language: String,
}

fn default_language() -> String {
    "english".into()
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response returned after a successful login. No token is issued; clients
/// send the username along with later calls.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub username: String,
}
