use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{debug, instrument};

use crate::{dashboard::dto::DashboardResponse, error::AppError, state::AppState};

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/dashboard/:username", get(dashboard))
}

#[instrument(skip(state))]
pub async fn dashboard(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<DashboardResponse>, AppError> {
    let user = state
        .users
        .find_by_username(username.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let (documents, recommendations, deadlines) = tokio::try_join!(
        state.documents.list_by_user(&user.username),
        state.recommendations.list_by_user(&user.username),
        state.deadlines.list_by_user(&user.username),
    )?;
    debug!(
        documents = documents.len(),
        recommendations = recommendations.len(),
        deadlines = deadlines.len(),
        "dashboard loaded"
    );

    Ok(Json(DashboardResponse {
        username: user.username,
        documents,
        recommendations,
        deadlines,
    }))
}
