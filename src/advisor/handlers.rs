use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument, warn};

use crate::{
    advisor::dto::{CropAdvisorRequest, CropAdvisorResponse},
    error::AppError,
    genai::{Language, Prompt},
    state::AppState,
};

/// Returned when the model cannot be reached, so the page always shows advice.
pub const FALLBACK_RECOMMENDATION: &str = "Fallback crop suggestion: Rice or Groundnut.";

pub fn advisor_routes() -> Router<AppState> {
    Router::new().route("/crop-advisor", post(crop_advisor))
}

#[instrument(skip(state, body), fields(location = %body.location, language = %body.language))]
pub async fn crop_advisor(
    State(state): State<AppState>,
    Json(body): Json<CropAdvisorRequest>,
) -> Result<Json<CropAdvisorResponse>, AppError> {
    if body.soil_report.trim().is_empty() {
        return Err(AppError::Validation("No soil report text".into()));
    }

    let prompt = Prompt::CropAdvice {
        soil_report: &body.soil_report,
        location: &body.location,
        language: Language::from_prefix(&body.language),
        weather: body.weather.as_ref(),
    };

    let recommendation = match state.genai.generate(&prompt).await {
        Ok(text) => {
            let owner = body
                .username
                .as_deref()
                .map(str::trim)
                .filter(|u| !u.is_empty());
            if let Some(username) = owner {
                match state.recommendations.insert(username, &text).await {
                    Ok(rec) => info!(recommendation_id = %rec.id, %username, "recommendation stored"),
                    Err(e) => warn!(error = %e, %username, "storing recommendation failed"),
                }
            }
            text
        }
        Err(e) => {
            warn!(error = %e, "crop advice unavailable; returning fallback");
            FALLBACK_RECOMMENDATION.to_string()
        }
    };

    Ok(Json(CropAdvisorResponse { recommendation }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingGenerator, ScriptedGenerator};
    use axum::http::StatusCode;
    use std::sync::Arc;

    fn request(json: &str) -> CropAdvisorRequest {
        serde_json::from_str(json).unwrap()
    }

    #[tokio::test]
    async fn empty_soil_report_is_rejected() {
        let state = AppState::fake();
        let err = crop_advisor(State(state), Json(request(r#"{"soil_report": "  "}"#)))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn language_uses_prefix_match() {
        let state = AppState::fake();
        let Json(res) = crop_advisor(
            State(state),
            Json(request(r#"{"soil_report": "sandy loam", "language": "kan"}"#)),
        )
        .await
        .unwrap();
        assert_eq!(res.recommendation, "[Kannada] Grow ragi.");
    }

    #[tokio::test]
    async fn model_failure_returns_fallback() {
        let mut state = AppState::fake();
        state.genai = Arc::new(FailingGenerator);
        let Json(res) = crop_advisor(
            State(state.clone()),
            Json(request(r#"{"soil_report": "clay", "username": "ravi"}"#)),
        )
        .await
        .unwrap();
        assert_eq!(res.recommendation, FALLBACK_RECOMMENDATION);
        // fallback text is not persisted
        assert!(state
            .recommendations
            .list_by_user("ravi")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn advice_is_saved_for_named_user() {
        let state = AppState::fake();
        crop_advisor(
            State(state.clone()),
            Json(request(r#"{"soil_report": "red soil", "username": "ravi"}"#)),
        )
        .await
        .unwrap();
        let recs = state.recommendations.list_by_user("ravi").await.unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].content, "[English] Grow ragi.");
    }

    #[tokio::test]
    async fn weather_fields_reach_the_prompt() {
        let mut state = AppState::fake();
        let generator = Arc::new(ScriptedGenerator::new("Groundnut"));
        state.genai = generator.clone();
        crop_advisor(
            State(state),
            Json(request(
                r#"{"soil_report": "black soil", "weather": {"temp": 33, "desc": "haze"}}"#,
            )),
        )
        .await
        .unwrap();
        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("Temperature: 33\n"));
        assert!(prompts[0].contains("Rain: \n"));
        assert!(prompts[0].contains("Condition: haze"));
        assert!(prompts[0].contains("Location: India"));
    }
}
