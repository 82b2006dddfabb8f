use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// OCR'd document record.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub filename: Option<String>,
    pub extracted_text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub uploaded_at: OffsetDateTime,
    pub summary: Option<String>, // set once the text has been summarized
}

#[derive(Debug)]
pub struct NewDocument<'a> {
    pub username: &'a str,
    pub filename: Option<&'a str>,
    pub extracted_text: &'a str,
}
