//! Profile Extractor: researches a company from public pages and distils a
//! fixed-shape `CompanyProfile` for question generation.
//!
//! Flow: derive sources → fetch all three concurrently → truncate each →
//!       one LLM call → JSON recovery → profile (or the empty fallback).
//!
//! Never fails: fetch errors become empty sections and unusable model output
//! becomes `CompanyProfile::fallback`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::llm_client::json_recovery::{recover_json, JsonShape};
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{ChatMessage, InferenceClient};
use crate::research::fetcher::{CompanySources, PageFetcher};
use crate::research::prompts::{PROFILE_PROMPT_TEMPLATE, PROFILE_SYSTEM};
use crate::research::truncate::truncate_smart;

const REFERENCE_BUDGET: usize = 3000;
const ABOUT_BUDGET: usize = 3000;
const CAREERS_BUDGET: usize = 2000;

/// Structured summary of a company. Every field defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyProfile {
    pub name: String,
    pub summary: String,
    pub values: Vec<String>,
    pub culture: String,
    pub mission: String,
    pub headquarters: String,
    /// Year as a string.
    pub founded: String,
    pub notable_projects: Vec<String>,
    pub key_technologies: Vec<String>,
    pub recent_achievements: Vec<String>,
}

impl CompanyProfile {
    /// The profile used when extraction fails: empty apart from the name.
    pub fn fallback(company: &str) -> Self {
        Self {
            name: company.to_string(),
            ..Self::default()
        }
    }

    /// Coerces a recovered JSON object field by field. A field of the wrong
    /// type comes out empty without affecting the others.
    fn from_model_output(fields: &Map<String, Value>) -> Self {
        let text = |key: &str| fields.get(key).map(coerce_text).unwrap_or_default();
        let list = |key: &str| fields.get(key).map(coerce_list).unwrap_or_default();

        Self {
            name: text("name"),
            summary: text("summary"),
            values: list("values"),
            culture: text("culture"),
            mission: text("mission"),
            headquarters: text("headquarters"),
            founded: text("founded"),
            notable_projects: list("notable_projects"),
            key_technologies: list("key_technologies"),
            recent_achievements: list("recent_achievements"),
        }
    }
}

/// Strings pass through and numbers are stringified; anything else is empty.
fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// Keeps the usable items of an array. Objects contribute their `name` or
/// `title`, else their JSON text. A non-array is an empty list.
fn coerce_list(value: &Value) -> Vec<String> {
    let Value::Array(items) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::Object(map) => ["name", "title"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str))
                .map(str::to_string)
                .or_else(|| Some(item.to_string())),
            Value::Null | Value::Array(_) => None,
            other => Some(coerce_text(other)),
        })
        .filter(|item| !item.is_empty())
        .collect()
}

/// Builds a company profile. See module docs for the flow.
pub async fn build_company_profile(
    company: &str,
    fetcher: &dyn PageFetcher,
    llm: &dyn InferenceClient,
) -> CompanyProfile {
    let sources = CompanySources::for_company(company);

    // All three run to completion; one failing never cancels the others.
    let (reference, about, careers) = tokio::join!(
        fetch_or_empty(fetcher, &sources.reference),
        fetch_or_empty(fetcher, &sources.about),
        fetch_or_empty(fetcher, &sources.careers),
    );

    let content = assemble_source_text(&reference, &about, &careers);
    info!("Fetched research content for {company}: {} chars", content.len());

    let prompt = PROFILE_PROMPT_TEMPLATE
        .replace("{company}", company)
        .replace("{content}", &content);
    let messages = [
        ChatMessage::system(format!("{PROFILE_SYSTEM}\n\n{JSON_ONLY_INSTRUCTION}")),
        ChatMessage::user(prompt),
    ];

    match llm.run(&messages).await {
        Ok(raw) => parse_profile(&raw, company),
        Err(e) => {
            warn!("Profile extraction call failed for {company}: {e}");
            CompanyProfile::fallback(company)
        }
    }
}

async fn fetch_or_empty(fetcher: &dyn PageFetcher, url: &str) -> String {
    match fetcher.fetch_text(url).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Source fetch failed for {url}: {e}");
            String::new()
        }
    }
}

fn assemble_source_text(reference: &str, about: &str, careers: &str) -> String {
    format!(
        "Reference article:\n{}\n\nAbout page:\n{}\n\nCareers/Culture:\n{}",
        truncate_smart(reference, REFERENCE_BUDGET),
        truncate_smart(about, ABOUT_BUDGET),
        truncate_smart(careers, CAREERS_BUDGET),
    )
}

/// Recovers a profile from raw model output, falling back to the empty profile.
pub fn parse_profile(raw: &str, company: &str) -> CompanyProfile {
    match recover_json(raw, JsonShape::Object) {
        Ok(Value::Object(fields)) => {
            let mut profile = CompanyProfile::from_model_output(&fields);
            if profile.name.is_empty() {
                profile.name = company.to_string();
            }
            profile
        }
        Ok(_) => {
            warn!("Company profile for {company} is not a JSON object");
            CompanyProfile::fallback(company)
        }
        Err(e) => {
            warn!("Failed to parse company profile for {company}: {e}");
            CompanyProfile::fallback(company)
        }
    }
}
