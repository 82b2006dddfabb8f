//! In-memory stores and scripted adapters for handler tests.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use serde_json::{json, Value};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::auth::password::StoredHash;
use crate::auth::repo::UserStore;
use crate::auth::repo_types::{NewUser, User};
use crate::documents::repo::DocumentStore;
use crate::documents::repo_types::{Document, NewDocument};
use crate::genai::{GenAiError, Prompt, TextGenerator};
use crate::ocr::{OcrEngine, OcrError};
use crate::recommendations::repo::{Recommendation, RecommendationStore};
use crate::subsidy::repo::DeadlineStore;
use crate::subsidy::repo_types::Deadline;
use crate::weather::client::{WeatherError, WeatherProvider, WeatherQuery};

#[derive(Default)]
struct Tables {
    users: HashMap<String, User>,
    documents: Vec<Document>,
    recommendations: Vec<Recommendation>,
    deadlines: Vec<Deadline>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("memory store poisoned")
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        Ok(self.lock().users.get(username).cloned())
    }

    async fn create(&self, new: NewUser<'_>) -> anyhow::Result<Option<User>> {
        let mut t = self.lock();
        if t.users.contains_key(new.username) {
            return Ok(None);
        }
        // kept as text here, while Postgres hands back raw bytes
        let user = User {
            username: new.username.to_string(),
            password_hash: StoredHash::Text(new.password_hash.to_string()),
            preferred_language: new.preferred_language.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.insert(user.username.clone(), user.clone());
        Ok(Some(user))
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, new: NewDocument<'_>) -> anyhow::Result<Document> {
        let doc = Document {
            id: Uuid::new_v4(),
            username: new.username.to_string(),
            filename: new.filename.map(str::to_string),
            extracted_text: new.extracted_text.to_string(),
            uploaded_at: OffsetDateTime::now_utc(),
            summary: None,
        };
        self.lock().documents.push(doc.clone());
        Ok(doc)
    }

    async fn list_by_user(&self, username: &str) -> anyhow::Result<Vec<Document>> {
        let mut docs: Vec<Document> = self
            .lock()
            .documents
            .iter()
            .rev()
            .filter(|d| d.username == username)
            .cloned()
            .collect();
        docs.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(docs)
    }

    async fn set_summary(&self, id: Uuid, summary: &str) -> anyhow::Result<bool> {
        let mut t = self.lock();
        match t.documents.iter_mut().find(|d| d.id == id) {
            Some(d) => {
                d.summary = Some(summary.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl RecommendationStore for MemoryStore {
    async fn insert(&self, username: &str, content: &str) -> anyhow::Result<Recommendation> {
        let rec = Recommendation {
            id: Uuid::new_v4(),
            username: username.to_string(),
            content: content.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        self.lock().recommendations.push(rec.clone());
        Ok(rec)
    }

    async fn list_by_user(&self, username: &str) -> anyhow::Result<Vec<Recommendation>> {
        let mut recs: Vec<Recommendation> = self
            .lock()
            .recommendations
            .iter()
            .rev()
            .filter(|r| r.username == username)
            .cloned()
            .collect();
        recs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(recs)
    }
}

#[async_trait]
impl DeadlineStore for MemoryStore {
    async fn insert(
        &self,
        username: &str,
        subsidy_name: &str,
        deadline: Date,
    ) -> anyhow::Result<Deadline> {
        let row = Deadline {
            id: Uuid::new_v4(),
            username: username.to_string(),
            subsidy_name: subsidy_name.to_string(),
            deadline,
            created_at: OffsetDateTime::now_utc(),
        };
        self.lock().deadlines.push(row.clone());
        Ok(row)
    }

    async fn list_by_user(&self, username: &str) -> anyhow::Result<Vec<Deadline>> {
        let mut rows: Vec<Deadline> = self
            .lock()
            .deadlines
            .iter()
            .filter(|d| d.username == username)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.deadline.cmp(&b.deadline));
        Ok(rows)
    }

    async fn delete_matching(
        &self,
        username: &str,
        subsidy_name: &str,
        deadline: Date,
    ) -> anyhow::Result<u64> {
        let mut t = self.lock();
        let pos = t.deadlines.iter().position(|d| {
            d.username == username && d.subsidy_name == subsidy_name && d.deadline == deadline
        });
        Ok(match pos {
            Some(i) => {
                t.deadlines.remove(i);
                1
            }
            None => 0,
        })
    }

    async fn delete_by_id(&self, id: Uuid) -> anyhow::Result<u64> {
        let mut t = self.lock();
        let before = t.deadlines.len();
        t.deadlines.retain(|d| d.id != id);
        Ok((before - t.deadlines.len()) as u64)
    }
}

/// Reads the bytes as UTF-8 "text"; `corrupt…` payloads fail like a bad scan.
pub struct FakeOcr;

#[async_trait]
impl OcrEngine for FakeOcr {
    async fn extract_text(&self, image: &[u8]) -> Result<String, OcrError> {
        if image.is_empty() || image.starts_with(b"corrupt") {
            return Err(OcrError::Engine {
                status: "exit status: 1".into(),
                stderr: "Error in pixReadMem: Unknown format".into(),
            });
        }
        Ok(format!("\n  {}  \n", String::from_utf8_lossy(image)))
    }
}

/// Answers every prompt with a canned, purpose-specific reply.
pub struct EchoGenerator;

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(&self, prompt: &Prompt<'_>) -> Result<String, GenAiError> {
        Ok(match prompt {
            Prompt::Summary { text, language } => {
                format!("[{}] {}", language.name(), text.trim())
            }
            Prompt::CropAdvice { language, .. } => format!("[{}] Grow ragi.", language.name()),
            Prompt::SubsidyFields { .. } => json!({
                "subsidy_name": "PM-KISAN",
                "eligibility": ["small and marginal farmers"],
                "required_documents": ["Aadhaar", "land record"],
                "deadline": "2099-01-01"
            })
            .to_string(),
        })
    }
}

/// Returns one fixed answer and records every rendered prompt.
pub struct ScriptedGenerator {
    answer: String,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &Prompt<'_>) -> Result<String, GenAiError> {
        self.prompts.lock().unwrap().push(prompt.render());
        Ok(self.answer.trim().to_string())
    }
}

pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &Prompt<'_>) -> Result<String, GenAiError> {
        Err(GenAiError::Server {
            status: 503,
            body: "model overloaded".into(),
        })
    }
}

pub struct FakeWeather;

#[async_trait]
impl WeatherProvider for FakeWeather {
    async fn current(&self, query: &WeatherQuery) -> Result<Value, WeatherError> {
        let name = match query {
            WeatherQuery::Coords { lat, lon } => format!("{lat},{lon}"),
            WeatherQuery::City(q) => q.clone(),
        };
        Ok(json!({
            "name": name,
            "main": { "temp": 29.5, "humidity": 70 },
            "weather": [{ "description": "scattered clouds" }]
        }))
    }
}

pub struct NoKeyWeather;

#[async_trait]
impl WeatherProvider for NoKeyWeather {
    async fn current(&self, _query: &WeatherQuery) -> Result<Value, WeatherError> {
        Err(WeatherError::MissingKey)
    }
}

pub struct DownWeather;

#[async_trait]
impl WeatherProvider for DownWeather {
    async fn current(&self, _query: &WeatherQuery) -> Result<Value, WeatherError> {
        Err(WeatherError::Server {
            status: 401,
            body: "Invalid API key".into(),
        })
    }
}
