use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Query, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    documents::{
        dto::{SummarizeRequest, SummarizeResponse, UploadParams, UploadResponse},
        services::{ingest_upload, summarize, UploadItem},
    },
    error::AppError,
    state::AppState,
};

pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn upload_routes() -> Router<AppState> {
    upload_router(MAX_UPLOAD_BYTES)
}

fn upload_router(limit: usize) -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload))
        .layer(DefaultBodyLimit::max(limit))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge("Upload exceeds 20MB".into());
    }
    warn!(error = %e, "malformed multipart body");
    AppError::Validation(format!("Invalid upload: {}", e))
}

pub fn summarize_routes() -> Router<AppState> {
    Router::new().route("/summarize", post(summarize_text))
}

/// POST /upload?username=… (multipart, field `file`)
#[instrument(skip(state, mp))]
pub async fn upload(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    mut mp: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut item = None;
    while let Some(field) = mp.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().map(|s| s.to_string());
        let body = field.bytes().await.map_err(multipart_error)?;
        item = Some(UploadItem { filename, body });
        break;
    }

    let item = item.ok_or_else(|| AppError::Validation("file is required".into()))?;
    let doc = ingest_upload(&state, params.username.as_deref(), item).await?;

    Ok(Json(UploadResponse {
        document_id: doc.id,
        extracted_text: doc.extracted_text,
    }))
}

#[instrument(skip(state, body), fields(language = %body.language))]
pub async fn summarize_text(
    State(state): State<AppState>,
    Json(body): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, AppError> {
    let summary = summarize(
        &state,
        &body.text,
        &body.language,
        body.document_id.as_deref(),
    )
    .await?;
    Ok(Json(SummarizeResponse { summary }))
}
