use serde::{Deserialize, Serialize};

use crate::subsidy::{extract::SubsidyFields, repo_types::Deadline};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "english".into()
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AnalyzeResponse {
    Fields(SubsidyFields),
    Error { error: String },
}

#[derive(Debug, Deserialize)]
pub struct SaveDeadlineRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub subsidy_name: String,
    #[serde(default)]
    pub deadline: String,
}

/// All fields optional so a missing one maps to "Missing fields" rather than
/// a JSON rejection.
#[derive(Debug, Deserialize)]
pub struct DeleteDeadlineRequest {
    pub username: Option<String>,
    pub subsidy_name: Option<String>,
    pub deadline: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeadlinesResponse {
    pub deadlines: Vec<Deadline>,
}
