use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub document_id: Uuid,
    pub extracted_text: String,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// Document to attach the summary to, as returned by `/upload`.
    #[serde(default)]
    pub document_id: Option<String>,
}

fn default_language() -> String {
    "english".into()
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
}
