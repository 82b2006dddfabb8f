use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

time::serde::format_description!(calendar_date, Date, "[year]-[month]-[day]");

/// Subsidy deadline tracked for a user. `deadline` is a plain calendar date,
/// rendered as `YYYY-MM-DD`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Deadline {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub subsidy_name: String,
    #[serde(with = "calendar_date")]
    pub deadline: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
