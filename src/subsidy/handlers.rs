use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    dto::MessageResponse,
    error::AppError,
    state::AppState,
    subsidy::{
        dates::parse_deadline,
        dto::{
            AnalyzeRequest, AnalyzeResponse, DeadlinesResponse, DeleteDeadlineRequest,
            SaveDeadlineRequest,
        },
        extract::analyze,
    },
};

const DELETED: &str = "Deadline deleted";
const NOTHING_DELETED: &str = "No deadline found to delete";

pub fn subsidy_routes() -> Router<AppState> {
    Router::new()
        .route("/subsidy/analyze", post(analyze_subsidy))
        .route("/subsidy/save-deadline", post(save_deadline))
        .route("/subsidy/deadlines/:username", get(list_deadlines))
        .route("/subsidy/all-deadlines/:username", get(list_deadlines))
        .route("/subsidy/delete-deadline", post(delete_deadline))
        .route("/subsidy/delete/:deadline_id", delete(delete_deadline_by_id))
}

#[instrument(skip(state, body), fields(language = %body.language))]
pub async fn analyze_subsidy(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeRequest>,
) -> Json<AnalyzeResponse> {
    if body.text.trim().is_empty() {
        return Json(AnalyzeResponse::Error {
            error: "No text received".into(),
        });
    }
    let fields = analyze(state.genai.as_ref(), &body.text, &body.language).await;
    Json(AnalyzeResponse::Fields(fields))
}

#[instrument(skip(state, body), fields(username = %body.username))]
pub async fn save_deadline(
    State(state): State<AppState>,
    Json(body): Json<SaveDeadlineRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let username = body.username.trim();
    let subsidy_name = body.subsidy_name.trim();
    if username.is_empty() || subsidy_name.is_empty() {
        return Err(AppError::Validation("Missing fields".into()));
    }
    let date = parse_deadline(&body.deadline)
        .ok_or_else(|| AppError::Validation("Invalid date".into()))?;

    let saved = state.deadlines.insert(username, subsidy_name, date).await?;
    info!(deadline_id = %saved.id, deadline = %saved.deadline, "deadline saved");

    Ok(Json(MessageResponse::new("Deadline saved")))
}

pub async fn list_deadlines(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<DeadlinesResponse>, AppError> {
    let deadlines = state.deadlines.list_by_user(&username).await?;
    Ok(Json(DeadlinesResponse { deadlines }))
}

#[instrument(skip(state, body))]
pub async fn delete_deadline(
    State(state): State<AppState>,
    Json(body): Json<DeleteDeadlineRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let present = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let (Some(username), Some(subsidy_name), Some(raw)) = (
        present(&body.username),
        present(&body.subsidy_name),
        present(&body.deadline),
    ) else {
        return Err(AppError::Validation("Missing fields".into()));
    };
    let date = parse_deadline(&raw).ok_or_else(|| AppError::Validation("Invalid date".into()))?;

    let removed = state
        .deadlines
        .delete_matching(&username, &subsidy_name, date)
        .await?;
    Ok(Json(MessageResponse::new(if removed > 0 {
        DELETED
    } else {
        NOTHING_DELETED
    })))
}

pub async fn delete_deadline_by_id(
    State(state): State<AppState>,
    Path(deadline_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = Uuid::parse_str(&deadline_id).map_err(|_| AppError::Validation("Invalid ID".into()))?;
    let removed = state.deadlines.delete_by_id(id).await?;
    Ok(Json(MessageResponse::new(if removed > 0 {
        DELETED
    } else {
        NOTHING_DELETED
    })))
}
