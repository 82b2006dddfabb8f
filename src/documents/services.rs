use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use crate::documents::repo_types::{Document, NewDocument};
use crate::error::AppError;
use crate::genai::{Language, Prompt};
use crate::state::AppState;

/// Owner recorded for uploads that carry no username.
pub const ANONYMOUS: &str = "anonymous";

pub struct UploadItem {
    pub filename: Option<String>,
    pub body: Bytes,
}

/// OCRs the image and stores the text as a new document.
pub async fn ingest_upload(
    st: &AppState,
    username: Option<&str>,
    item: UploadItem,
) -> Result<Document, AppError> {
    let owner = username
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .unwrap_or(ANONYMOUS);

    let raw = st
        .ocr
        .extract_text(&item.body)
        .await
        .map_err(|e| AppError::Internal(format!("OCR failure: {}", e)))?;
    let text = raw.trim();

    let doc = st
        .documents
        .insert(NewDocument {
            username: owner,
            filename: item.filename.as_deref(),
            extracted_text: text,
        })
        .await
        .map_err(|e| AppError::Internal(format!("OCR failure: {:#}", e)))?;

    info!(document_id = %doc.id, username = %owner, chars = text.len(), "document ingested");
    Ok(doc)
}

/// Summarizes `text` in the requested language. Model failures are surfaced.
/// When `document_id` names a stored document the summary is saved on it.
pub async fn summarize(
    st: &AppState,
    text: &str,
    language: &str,
    document_id: Option<&str>,
) -> Result<String, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation("Empty text".into()));
    }

    let document_id = document_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            Uuid::parse_str(id).map_err(|_| AppError::Validation("Invalid document_id".into()))
        })
        .transpose()?;

    let language = Language::from_selector(language);
    let summary = st
        .genai
        .generate(&Prompt::Summary { text, language })
        .await
        .map_err(|e| AppError::Upstream(format!("AI error: {}", e)))?;

    if let Some(id) = document_id {
        match st.documents.set_summary(id, &summary).await {
            Ok(true) => info!(document_id = %id, "summary stored"),
            Ok(false) => warn!(document_id = %id, "summary for unknown document not stored"),
            Err(e) => warn!(document_id = %id, error = %e, "storing summary failed"),
        }
    }

    Ok(summary)
}
