//! End-of-session debrief: local rating statistics plus one LLM call that
//! looks across every recorded answer.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::interview::evaluation::Rating;
use crate::interview::prompts::{SUMMARY_PROMPT_TEMPLATE, SUMMARY_SYSTEM};
use crate::llm_client::json_recovery::{null_as_default, recover, JsonShape};
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{ChatMessage, InferenceClient};
use crate::session::models::Session;

/// Rating weights for the headline score: excellent counts fully, good 60%.
const EXCELLENT_POINTS: f64 = 100.0;
const GOOD_POINTS: f64 = 60.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingBreakdown {
    pub excellent: usize,
    pub good: usize,
    pub poor: usize,
    pub total: usize,
    /// 0 – 100
    pub score_percentage: f64,
}

impl RatingBreakdown {
    /// Counts ratings over the graded answers of a session.
    pub fn for_session(session: &Session) -> Self {
        let ratings: Vec<Rating> = session
            .answers
            .iter()
            .filter_map(|a| a.evaluation.as_ref().map(|e| e.rating))
            .collect();

        let count = |rating: Rating| ratings.iter().filter(|r| **r == rating).count();
        let excellent = count(Rating::Excellent);
        let good = count(Rating::Good);
        let poor = count(Rating::Poor);
        let total = ratings.len();

        let score_percentage = if total == 0 {
            0.0
        } else {
            // points / (total * 100) * 100
            (excellent as f64 * EXCELLENT_POINTS + good as f64 * GOOD_POINTS) / total as f64
        };

        Self {
            excellent,
            good,
            poor,
            total,
            score_percentage,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    #[serde(default, deserialize_with = "null_as_default")]
    pub overall_feedback: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key_strengths: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub areas_to_improve: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub next_steps: Vec<String>,
}

impl SessionSummary {
    pub fn fallback() -> Self {
        Self {
            overall_feedback: "You completed the practice session. A detailed debrief is not \
                available right now; review the feedback on each answer below."
                .to_string(),
            key_strengths: Vec::new(),
            areas_to_improve: Vec::new(),
            next_steps: vec![
                "Revisit answers rated good or poor and rehearse them with concrete examples"
                    .to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub stats: RatingBreakdown,
    pub summary: SessionSummary,
    pub degraded: bool,
}

/// Builds the debrief for a session that has at least one answer.
/// Never fails: unusable model output yields `SessionSummary::fallback`.
pub async fn summarise_session(session: &Session, llm: &dyn InferenceClient) -> SessionReport {
    let stats = RatingBreakdown::for_session(session);

    let prompt = SUMMARY_PROMPT_TEMPLATE
        .replace("{role}", &session.role)
        .replace("{company}", &session.company)
        .replace("{transcript}", &build_transcript(session));
    let messages = [
        ChatMessage::system(format!("{SUMMARY_SYSTEM}\n\n{JSON_ONLY_INSTRUCTION}")),
        ChatMessage::user(prompt),
    ];

    let parsed = match llm.run(&messages).await {
        Ok(raw) => recover::<SessionSummary>(&raw, JsonShape::Object)
            .map_err(|e| format!("unparseable summary: {e}")),
        Err(e) => Err(format!("summary call failed: {e}")),
    };

    match parsed {
        Ok(summary) => SessionReport {
            stats,
            summary,
            degraded: false,
        },
        Err(reason) => {
            warn!("Session {} summary degraded: {reason}", session.session_id);
            SessionReport {
                stats,
                summary: SessionSummary::fallback(),
                degraded: true,
            }
        }
    }
}

fn build_transcript(session: &Session) -> String {
    let mut answers: Vec<_> = session.answers.iter().collect();
    answers.sort_by_key(|a| a.question_index);

    answers
        .into_iter()
        .map(|answer| {
            let question = session
                .questions
                .get(answer.question_index)
                .map(|q| format!("({}) {}", q.question_type.as_str(), q.question))
                .unwrap_or_default();
            let (rating, feedback) = answer
                .evaluation
                .as_ref()
                .map(|e| (e.rating.as_str(), e.feedback.as_str()))
                .unwrap_or(("not graded", ""));
            format!(
                "Q{} {}\nAnswer: {}\nRating: {}\nFeedback: {}",
                answer.question_index + 1,
                question,
                answer.answer,
                rating,
                feedback
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
