//! Subsidy form analysis: deadline detection by pattern plus model-based
//! field extraction.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::Date;
use tracing::{debug, warn};

use crate::genai::{Prompt, TextGenerator};
use crate::subsidy::dates::month_from_name;

lazy_static! {
    /// "March 5, 2025"
    static ref MONTH_DAY_YEAR: Regex = Regex::new(
        r"(?i)\b(January|February|March|April|May|June|July|August|September|October|November|December)\s+(\d{1,2}),\s+(\d{4})\b"
    )
    .unwrap();

    /// "31 May 2024", "1 Sept. 2024"
    static ref DAY_MONTH_YEAR: Regex = Regex::new(
        r"(?i)\b(\d{1,2})\s+(Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)\.?\s+(\d{4})\b"
    )
    .unwrap();
}

type DateBuilder = fn(&Captures) -> Option<Date>;

fn month_day_year(c: &Captures) -> Option<Date> {
    let month = month_from_name(&c[1])?;
    Date::from_calendar_date(c[3].parse().ok()?, month, c[2].parse().ok()?).ok()
}

fn day_month_year(c: &Captures) -> Option<Date> {
    let month = month_from_name(&c[2])?;
    Date::from_calendar_date(c[3].parse().ok()?, month, c[1].parse().ok()?).ok()
}

/// Finds the first valid calendar date in `text`. Patterns are tried in
/// priority order; within a pattern, matches are tried left to right and
/// impossible dates ("February 30, 2024") are skipped.
pub fn extract_deadline(text: &str) -> Option<Date> {
    let patterns: [(&Regex, DateBuilder); 2] = [
        (&*MONTH_DAY_YEAR, month_day_year as DateBuilder),
        (&*DAY_MONTH_YEAR, day_month_year as DateBuilder),
    ];
    patterns
        .iter()
        .find_map(|(re, build)| re.captures_iter(text).find_map(|c| build(&c)))
}

/// Strips markdown fences and surrounding prose, keeping the outermost `{…}`.
pub fn clean_json(text: &str) -> &str {
    let text = text.trim();
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text.trim_matches('`').trim(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubsidyFields {
    pub subsidy_name: String,
    pub eligibility: Value,
    pub required_documents: Value,
    pub deadline: String,
}

impl SubsidyFields {
    /// Used when the model is unavailable or its answer is not JSON.
    pub fn placeholder() -> Self {
        Self {
            subsidy_name: "Not found".into(),
            eligibility: Value::String(String::new()),
            required_documents: Value::String(String::new()),
            deadline: String::new(),
        }
    }
}

#[derive(Deserialize)]
struct ModelFields {
    #[serde(default)]
    subsidy_name: Option<Value>,
    #[serde(default)]
    eligibility: Option<Value>,
    #[serde(default)]
    required_documents: Option<Value>,
    #[serde(default)]
    deadline: Option<Value>,
}

fn as_text(v: Option<Value>) -> Option<String> {
    match v? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn or_empty(v: Option<Value>) -> Value {
    match v {
        None | Some(Value::Null) => Value::String(String::new()),
        Some(v) => v,
    }
}

/// Parses the model's answer; `None` when it holds no JSON object.
pub fn parse_model_fields(answer: &str) -> Option<SubsidyFields> {
    let value: Value = serde_json::from_str(clean_json(answer)).ok()?;
    if !value.is_object() {
        return None;
    }
    let raw: ModelFields = serde_json::from_value(value).ok()?;
    Some(SubsidyFields {
        subsidy_name: as_text(raw.subsidy_name).unwrap_or_else(|| "Not found".into()),
        eligibility: or_empty(raw.eligibility),
        required_documents: or_empty(raw.required_documents),
        deadline: as_text(raw.deadline).unwrap_or_default(),
    })
}

/// Extracts subsidy fields from form text. Never fails: a model error or an
/// unparseable answer yields the placeholder record. A deadline found in the
/// text by pattern always replaces whatever the model reported.
pub async fn analyze(generator: &dyn TextGenerator, text: &str, language: &str) -> SubsidyFields {
    let detected = extract_deadline(text);
    debug!(?detected, "pattern deadline");

    let mut fields = match generator
        .generate(&Prompt::SubsidyFields { text, language })
        .await
    {
        Ok(answer) => parse_model_fields(&answer).unwrap_or_else(|| {
            warn!("model answer is not JSON; using placeholder");
            SubsidyFields::placeholder()
        }),
        Err(e) => {
            warn!(error = %e, "subsidy extraction failed; using placeholder");
            SubsidyFields::placeholder()
        }
    };

    if let Some(date) = detected {
        fields.deadline = date.to_string();
    }
    fields
}
