use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct GenAiConfig {
    /// Absent key keeps the service up; AI-backed routes degrade per endpoint.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    pub command: String,
    pub lang: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub genai: GenAiConfig,
    pub weather: WeatherConfig,
    pub ocr: OcrConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let database_max_connections = parse_or("DATABASE_MAX_CONNECTIONS", 10);

        let genai = GenAiConfig {
            api_key: non_empty("GEMINI_API_KEY"),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".into()),
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".into()),
            timeout_secs: parse_or("AI_TIMEOUT_SECS", 60),
        };

        let weather = WeatherConfig {
            api_key: non_empty("OPENWEATHER_API_KEY"),
            base_url: std::env::var("OPENWEATHER_BASE_URL")
                .unwrap_or_else(|_| "https://api.openweathermap.org/data/2.5".into()),
            timeout_secs: parse_or("WEATHER_TIMEOUT_SECS", 10),
        };

        let ocr = OcrConfig {
            command: std::env::var("TESSERACT_CMD").unwrap_or_else(|_| "tesseract".into()),
            lang: std::env::var("OCR_LANG").unwrap_or_else(|_| "eng".into()),
            timeout_secs: parse_or("OCR_TIMEOUT_SECS", 60),
        };

        Ok(Self {
            database_url,
            database_max_connections,
            genai,
            weather,
            ocr,
        })
    }
}

fn non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
