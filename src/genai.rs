//! Generative-text adapter.
//!
//! Prompt construction lives in [`Prompt`], one variant per use case, so
//! handlers never build prompt strings themselves and the provider behind
//! [`TextGenerator`] can be swapped without touching them.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::GenAiConfig;

#[derive(Error, Debug)]
pub enum GenAiError {
    #[error("Gemini missing")]
    MissingKey,
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("model returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("model returned no text")]
    Empty,
}

/// Output language for generated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Hindi,
    Kannada,
}

impl Language {
    /// Exact, case-insensitive match on the language name. Unknown → English.
    pub fn from_selector(selector: &str) -> Self {
        match selector.trim().to_lowercase().as_str() {
            "kannada" => Language::Kannada,
            "hindi" => Language::Hindi,
            _ => Language::English,
        }
    }

    /// Prefix match on "kan" / "hin". Anything else → English.
    pub fn from_prefix(selector: &str) -> Self {
        let key = selector.trim().to_lowercase();
        if key.starts_with("kan") {
            Language::Kannada
        } else if key.starts_with("hin") {
            Language::Hindi
        } else {
            Language::English
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Kannada => "Kannada",
        }
    }

    pub fn script_rule(self) -> &'static str {
        match self {
            Language::Kannada => "Write ONLY in Kannada script (ಕನ್ನಡ). No transliteration.",
            Language::Hindi => "Write ONLY in Hindi Devanagari (हिन्दी). No transliteration.",
            Language::English => "Write ONLY in simple English.",
        }
    }
}

/// Weather observations a client may attach to a crop-advice request. Every
/// field is optional and free-form (numbers or strings).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WeatherSnapshot {
    #[serde(default)]
    pub temp: Option<Value>,
    #[serde(default)]
    pub humidity: Option<Value>,
    #[serde(default)]
    pub wind: Option<Value>,
    #[serde(default)]
    pub rain: Option<Value>,
    #[serde(default)]
    pub desc: Option<Value>,
}

fn blank_or(v: &Option<Value>) -> String {
    match v {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[derive(Debug, Clone)]
pub enum Prompt<'a> {
    Summary {
        text: &'a str,
        language: Language,
    },
    CropAdvice {
        soil_report: &'a str,
        location: &'a str,
        language: Language,
        weather: Option<&'a WeatherSnapshot>,
    },
    SubsidyFields {
        text: &'a str,
        language: &'a str,
    },
}

impl Prompt<'_> {
    pub fn purpose(&self) -> &'static str {
        match self {
            Prompt::Summary { .. } => "summary",
            Prompt::CropAdvice { .. } => "crop_advice",
            Prompt::SubsidyFields { .. } => "subsidy_fields",
        }
    }

    pub fn render(&self) -> String {
        match self {
            Prompt::Summary { text, language } => format!(
                "Summarize the following text.\n\
                 Language: {lang}\n\
                 Rule: {rule}\n\n\
                 Text:\n{text}\n\n\
                 Write final answer only in {lang}.\n",
                lang = language.name(),
                rule = language.script_rule(),
            ),
            Prompt::CropAdvice {
                soil_report,
                location,
                language,
                weather,
            } => {
                let weather_block = weather
                    .map(|w| {
                        format!(
                            "Temperature: {}\nHumidity: {}\nWind: {}\nRain: {}\nCondition: {}\n",
                            blank_or(&w.temp),
                            blank_or(&w.humidity),
                            blank_or(&w.wind),
                            blank_or(&w.rain),
                            blank_or(&w.desc),
                        )
                    })
                    .unwrap_or_default();
                format!(
                    "You are an agriculture expert.\n\n\
                     Language: {lang}\n\
                     Rule: {rule}\n\n\
                     Location: {location}\n\n\
                     Soil Report:\n{soil_report}\n\n\
                     Weather:\n{weather_block}\n\
                     Recommend ONE best crop for the farmer.\n\
                     Explain why, and give 4-6 simple steps.\n",
                    lang = language.name(),
                    rule = language.script_rule(),
                )
            }
            Prompt::SubsidyFields { text, language } => format!(
                "Extract the following fields from this subsidy form text:\n\n\
                 Text:\n{text}\n\n\
                 Return JSON ONLY with fields:\n\
                 subsidy_name\n\
                 eligibility (short list)\n\
                 required_documents (list)\n\
                 deadline (yyyy-mm-dd if detected)\n\n\
                 Language required: {language}\n"
            ),
        }
    }
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the model's answer, trimmed.
    async fn generate(&self, prompt: &Prompt<'_>) -> Result<String, GenAiError>;
}

/// Google Gemini `generateContent` client.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn text(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

impl GeminiClient {
    pub fn new(cfg: &GenAiConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key: cfg.api_key.clone(),
            model: cfg.model.trim_start_matches("models/").to_string(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &Prompt<'_>) -> Result<String, GenAiError> {
        let api_key = self.api_key.as_deref().ok_or(GenAiError::MissingKey)?;
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let rendered = prompt.render();
        let body = GenerateRequest {
            contents: [Content {
                role: "user",
                parts: [RequestPart { text: &rendered }],
            }],
        };

        debug!(purpose = prompt.purpose(), model = %self.model, "calling model");
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GenAiError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = resp.json().await?;
        let text = parsed.text().ok_or(GenAiError::Empty)?;
        info!(purpose = prompt.purpose(), chars = text.len(), "model answered");
        Ok(text)
    }
}
