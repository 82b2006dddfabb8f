use axum::{extract::State, routing::post, Json, Router};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, RegisterRequest},
        password::{hash_password, verify_password},
        repo_types::NewUser,
    },
    dto::MessageResponse,
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let username = payload.username.trim();

    if username.is_empty() || payload.password.is_empty() {
        warn!("username or password missing");
        return Err(AppError::Validation(
            "Username and password are required".into(),
        ));
    }

    // Ensure username is not taken
    if state.users.find_by_username(username).await?.is_some() {
        warn!("username already registered");
        return Err(AppError::Conflict("Username already exists".into()));
    }

    let hash = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        AppError::Internal(e.to_string())
    })?;

    let created = state
        .users
        .create(NewUser {
            username,
            password_hash: &hash,
            preferred_language: payload.preferred_language.trim(),
        })
        .await?;

    match created {
        Some(user) => {
            info!(language = %user.preferred_language, "user registered");
            Ok(Json(MessageResponse::new("User registered")))
        }
        // lost a race with a concurrent registration
        None => {
            warn!("username already registered");
            Err(AppError::Conflict("Username already exists".into()))
        }
    }
}

#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let invalid = || AppError::Unauthorized("Invalid username or password".into());

    let user = match state.users.find_by_username(payload.username.trim()).await? {
        Some(u) => u,
        None => {
            warn!("login unknown username");
            return Err(invalid());
        }
    };

    let ok = match verify_password(&payload.password, &user.password_hash) {
        Ok(v) => v,
        Err(e) => {
            // an unreadable stored digest can never match
            error!(error = %e, "verify_password failed");
            false
        }
    };

    if !ok {
        warn!("login invalid password");
        return Err(invalid());
    }

    info!("user logged in");
    Ok(Json(LoginResponse {
        message: "Login successful".into(),
        username: user.username,
    }))
}
