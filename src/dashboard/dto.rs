use serde::Serialize;

use crate::{
    documents::repo_types::Document, recommendations::repo::Recommendation,
    subsidy::repo_types::Deadline,
};

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub username: String,
    pub documents: Vec<Document>,
    pub recommendations: Vec<Recommendation>,
    pub deadlines: Vec<Deadline>,
}
