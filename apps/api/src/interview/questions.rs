//! Question Generator: turns a company profile and a role into an ordered
//! list of interview questions, each with its own grading rubric.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::interview::prompts::{QUESTIONS_PROMPT_TEMPLATE, QUESTIONS_SYSTEM};
use crate::llm_client::json_recovery::{null_as_default, recover_json, JsonShape};
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{ChatMessage, InferenceClient};
use crate::research::profile::CompanyProfile;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    #[default]
    #[serde(alias = "Behavioral")]
    Behavioral,
    #[serde(alias = "Technical")]
    Technical,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Behavioral => "behavioral",
            QuestionType::Technical => "technical",
        }
    }
}

/// What separates an excellent answer from a good or a poor one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationCriteria {
    #[serde(default, deserialize_with = "null_as_default")]
    pub excellent: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub good: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub poor: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default, deserialize_with = "null_as_default")]
    pub question: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub question_type: QuestionType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company_alignment: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub evaluation_criteria: EvaluationCriteria,
}

impl Question {
    /// The single generic question used when generation output is unusable.
    pub fn fallback(company: &str) -> Self {
        Self {
            question: format!(
                "Tell me about a time you demonstrated one of {company}'s core values."
            ),
            question_type: QuestionType::Behavioral,
            category: "culture-fit".to_string(),
            company_alignment: "Tests alignment with company values".to_string(),
            evaluation_criteria: EvaluationCriteria {
                excellent: "Specific example with measurable impact, clearly ties to company value"
                    .to_string(),
                good: "Clear example with some detail and outcome".to_string(),
                poor: "Generic answer, no specific example or outcome".to_string(),
            },
        }
    }
}

/// Optional candidate details supplied with a prep request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrepOptions {
    pub interview_type: Option<String>,
    pub experience_level: Option<String>,
    pub focus_areas: Option<String>,
}

impl PrepOptions {
    fn candidate_context(&self) -> String {
        let lines: Vec<String> = [
            ("Interview type", &self.interview_type),
            ("Experience level", &self.experience_level),
            ("Focus areas", &self.focus_areas),
        ]
        .into_iter()
        .filter_map(|(label, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| format!("- {label}: {v}"))
        })
        .collect();

        if lines.is_empty() {
            String::new()
        } else {
            format!("\nCandidate context:\n{}\n", lines.join("\n"))
        }
    }
}

/// Generates the question list for a session. Never fails: unusable model
/// output yields the single fallback question.
pub async fn generate_questions(
    profile: &CompanyProfile,
    role: &str,
    options: &PrepOptions,
    llm: &dyn InferenceClient,
) -> Vec<Question> {
    let prompt = QUESTIONS_PROMPT_TEMPLATE
        .replace("{role}", role)
        .replace("{company}", &profile.name)
        .replace("{values}", &profile.values.join(", "))
        .replace("{culture}", &profile.culture)
        .replace("{mission}", &profile.mission)
        .replace("{technologies}", &profile.key_technologies.join(", "))
        .replace("{candidate_context}", &options.candidate_context());
    let messages = [
        ChatMessage::system(format!("{QUESTIONS_SYSTEM}\n\n{JSON_ONLY_INSTRUCTION}")),
        ChatMessage::user(prompt),
    ];

    let questions = match llm.run(&messages).await {
        Ok(raw) => parse_questions(&raw, &profile.name),
        Err(e) => {
            warn!("Question generation call failed for {}: {e}", profile.name);
            vec![Question::fallback(&profile.name)]
        }
    };

    info!(
        "Generated {} questions for {} at {}",
        questions.len(),
        role,
        profile.name
    );
    questions
}

/// Recovers a question array from raw model output. Malformed items and items
/// without question text are dropped; if nothing survives, the fallback list
/// is returned.
pub fn parse_questions(raw: &str, company: &str) -> Vec<Question> {
    let items = match recover_json(raw, JsonShape::Array) {
        Ok(Value::Array(items)) => items,
        Ok(_) => Vec::new(),
        Err(e) => {
            warn!("Failed to parse questions JSON for {company}: {e}");
            Vec::new()
        }
    };

    let total = items.len();
    let questions: Vec<Question> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<Question>(item).ok())
        .filter(|q| !q.question.trim().is_empty())
        .collect();

    if questions.len() < total {
        warn!(
            "Dropped {} malformed question records for {company}",
            total - questions.len()
        );
    }

    if questions.is_empty() {
        vec![Question::fallback(company)]
    } else {
        questions
    }
}
