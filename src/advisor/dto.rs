use serde::{Deserialize, Serialize};

use crate::genai::WeatherSnapshot;

#[derive(Debug, Deserialize)]
pub struct CropAdvisorRequest {
    #[serde(default)]
    pub soil_report: String,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub weather: Option<WeatherSnapshot>,
    /// When present, the advice is saved to this user's recommendations.
    #[serde(default)]
    pub username: Option<String>,
}

fn default_location() -> String {
    "India".into()
}

fn default_language() -> String {
    "english".into()
}

#[derive(Debug, Serialize)]
pub struct CropAdvisorResponse {
    pub recommendation: String,
}
