use std::sync::Arc;

mod advisor;
mod app;
mod auth;
mod config;
mod dashboard;
mod db;
mod documents;
mod dto;
mod error;
mod genai;
mod ocr;
mod recommendations;
mod state;
mod subsidy;
mod weather;

#[cfg(test)]
mod testing;

use crate::{config::AppConfig, db::PgStore, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "agricomply=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = Arc::new(AppConfig::from_env()?);
    if config.genai.api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set; summaries will fail and advice falls back");
    }
    if config.weather.api_key.is_none() {
        tracing::warn!("OPENWEATHER_API_KEY not set; /weather will return 500");
    }

    let store = PgStore::connect(&config).await?;

    if let Err(e) = store.migrate().await {
        tracing::warn!(error = %format_args!("{:#}", e), "migration failed; continuing");
    }

    let state = AppState::init(config, store)?;
    app::serve(app::build_app(state)).await
}
