//! OpenWeatherMap current-weather proxy.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::config::WeatherConfig;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Weather API key missing")]
    MissingKey,
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Server { status: u16, body: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    Coords { lat: f64, lon: f64 },
    City(String),
}

impl WeatherQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            WeatherQuery::Coords { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
            WeatherQuery::City(q) => vec![("q", q.clone())],
        }
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Returns the provider's JSON body untouched.
    async fn current(&self, query: &WeatherQuery) -> Result<Value, WeatherError>;
}

pub struct OpenWeatherClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenWeatherClient {
    pub fn new(cfg: &WeatherConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key: cfg.api_key.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current(&self, query: &WeatherQuery) -> Result<Value, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::MissingKey)?;
        let url = format!("{}/weather", self.base_url);

        let mut params = query.params();
        params.push(("appid", api_key.to_string()));
        params.push(("units", "metric".to_string()));

        let resp = self.client.get(&url).query(&params).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(WeatherError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = resp.json().await?;
        info!(?query, "weather fetched");
        Ok(body)
    }
}
