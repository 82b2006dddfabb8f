use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{instrument, warn};

use crate::{
    error::AppError,
    state::AppState,
    weather::client::{WeatherError, WeatherQuery},
};

#[derive(Debug, Deserialize)]
pub struct WeatherParams {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub q: Option<String>,
}

impl WeatherParams {
    /// Coordinates win over a city name when both are given.
    fn into_query(self) -> Option<WeatherQuery> {
        match (self.lat, self.lon, self.q) {
            (Some(lat), Some(lon), _) => Some(WeatherQuery::Coords { lat, lon }),
            (_, _, Some(q)) if !q.trim().is_empty() => Some(WeatherQuery::City(q.trim().into())),
            _ => None,
        }
    }
}

pub fn weather_routes() -> Router<AppState> {
    Router::new().route("/weather", get(weather))
}

#[instrument(skip(state))]
pub async fn weather(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> Result<Json<Value>, AppError> {
    let query = params
        .into_query()
        .ok_or_else(|| AppError::Validation("lat and lon (or q) are required".into()))?;

    match state.weather.current(&query).await {
        Ok(body) => Ok(Json(body)),
        Err(e @ WeatherError::MissingKey) => Err(AppError::Internal(e.to_string())),
        Err(e) => {
            warn!(error = %e, "weather lookup failed");
            Err(AppError::Upstream(format!("Weather error: {}", e)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{DownWeather, NoKeyWeather};
    use axum::http::StatusCode;
    use std::sync::Arc;

    fn params(lat: Option<f64>, lon: Option<f64>, q: Option<&str>) -> WeatherParams {
        WeatherParams {
            lat,
            lon,
            q: q.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn proxies_provider_json() {
        let state = AppState::fake();
        let Json(body) = weather(State(state), Query(params(Some(12.97), Some(77.59), None)))
            .await
            .unwrap();
        assert_eq!(body["name"], "12.97,77.59");
        assert_eq!(body["main"]["temp"], 29.5);
    }

    #[tokio::test]
    async fn city_name_is_accepted() {
        let state = AppState::fake();
        let Json(body) = weather(State(state), Query(params(None, None, Some(" Mysuru "))))
            .await
            .unwrap();
        assert_eq!(body["name"], "Mysuru");
    }

    #[tokio::test]
    async fn missing_location_is_bad_request() {
        let state = AppState::fake();
        let err = weather(State(state), Query(params(Some(12.0), None, None)))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_key_is_internal_error() {
        let mut state = AppState::fake();
        state.weather = Arc::new(NoKeyWeather);
        let err = weather(State(state), Query(params(Some(1.0), Some(2.0), None)))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Weather API key missing");
    }

    #[tokio::test]
    async fn provider_failure_is_bad_gateway() {
        let mut state = AppState::fake();
        state.weather = Arc::new(DownWeather);
        let err = weather(State(state), Query(params(Some(1.0), Some(2.0), None)))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert!(err.to_string().starts_with("Weather error: "));
        assert!(err.to_string().contains("Invalid API key"));
    }
}
