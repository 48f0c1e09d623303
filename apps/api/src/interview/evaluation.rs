//! Answer Evaluator: grades one candidate answer against its question's rubric.
//!
//! The session must always advance, so grading never fails outright: any
//! failure yields `EvaluationOutcome::Degraded` carrying a placeholder
//! evaluation. Callers record the placeholder but can still tell the
//! difference and log it.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::interview::prompts::{EVALUATION_PROMPT_TEMPLATE, EVALUATION_SYSTEM};
use crate::interview::questions::Question;
use crate::llm_client::json_recovery::{null_as_default, recover, JsonShape};
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{ChatMessage, InferenceClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    #[serde(alias = "Excellent")]
    Excellent,
    #[serde(alias = "Good")]
    Good,
    #[serde(alias = "Poor")]
    Poor,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Excellent => "excellent",
            Rating::Good => "good",
            Rating::Poor => "poor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub rating: Rating,
    #[serde(default, deserialize_with = "null_as_default")]
    pub feedback: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub improvements: Vec<String>,
}

impl Evaluation {
    /// Placeholder recorded when grading is unavailable.
    pub fn placeholder() -> Self {
        Self {
            rating: Rating::Good,
            feedback: "Your answer has been recorded. Detailed feedback is not available right now."
                .to_string(),
            strengths: vec!["Provided a complete response".to_string()],
            improvements: vec![
                "Anchor your answer in a specific example with a measurable outcome".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationOutcome {
    Graded(Evaluation),
    Degraded { evaluation: Evaluation, reason: String },
}

impl EvaluationOutcome {
    fn degraded(reason: String) -> Self {
        EvaluationOutcome::Degraded {
            evaluation: Evaluation::placeholder(),
            reason,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, EvaluationOutcome::Degraded { .. })
    }

    pub fn evaluation(&self) -> &Evaluation {
        match self {
            EvaluationOutcome::Graded(evaluation) => evaluation,
            EvaluationOutcome::Degraded { evaluation, .. } => evaluation,
        }
    }

    pub fn into_evaluation(self) -> Evaluation {
        match self {
            EvaluationOutcome::Graded(evaluation) => evaluation,
            EvaluationOutcome::Degraded { evaluation, .. } => evaluation,
        }
    }
}

/// Grades `answer` against `question`'s evaluation criteria.
pub async fn evaluate_answer(
    question: &Question,
    answer: &str,
    llm: &dyn InferenceClient,
) -> EvaluationOutcome {
    let criteria = &question.evaluation_criteria;
    let prompt = EVALUATION_PROMPT_TEMPLATE
        .replace("{question_type}", question.question_type.as_str())
        .replace("{question}", &question.question)
        .replace("{company_alignment}", &question.company_alignment)
        .replace("{excellent}", &criteria.excellent)
        .replace("{good}", &criteria.good)
        .replace("{poor}", &criteria.poor)
        .replace("{answer}", answer);
    let messages = [
        ChatMessage::system(format!("{EVALUATION_SYSTEM}\n\n{JSON_ONLY_INSTRUCTION}")),
        ChatMessage::user(prompt),
    ];

    let raw = match llm.run(&messages).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Evaluation call failed: {e}");
            return EvaluationOutcome::degraded(format!("inference call failed: {e}"));
        }
    };

    match recover::<Evaluation>(&raw, JsonShape::Object) {
        Ok(evaluation) => EvaluationOutcome::Graded(evaluation),
        Err(e) => {
            warn!("Failed to parse evaluation: {e}");
            EvaluationOutcome::degraded(format!("unparseable evaluation: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::test_support::ScriptedLlm;

    fn question() -> Question {
        let mut q = Question::fallback("Acme");
        q.company_alignment = "Acme prizes ownership.".to_string();
        q
    }

    #[tokio::test]
    async fn test_graded_evaluation() {
        let llm = ScriptedLlm::replying([r#"```json
{"rating": "excellent", "feedback": "Strong STAR answer.", "strengths": ["metrics"], "improvements": []}
```"#]);

        let outcome = evaluate_answer(&question(), "I led the migration...", &llm).await;
        assert!(!outcome.is_degraded());
        let evaluation = outcome.into_evaluation();
        assert_eq!(evaluation.rating, Rating::Excellent);
        assert_eq!(evaluation.strengths, vec!["metrics"]);
    }

    #[tokio::test]
    async fn test_prompt_embeds_question_rubric_and_answer() {
        let llm = ScriptedLlm::replying([r#"{"rating": "good"}"#]);
        evaluate_answer(&question(), "I led the migration", &llm).await;

        let calls = llm.calls();
        assert!(calls[0][0].content.contains("\"excellent\", \"good\", \"poor\""));
        let user = &calls[0][1].content;
        assert!(user.contains("QUESTION (behavioral):"));
        assert!(user.contains("core values"));
        assert!(user.contains("Acme prizes ownership."));
        assert!(user.contains("- poor: Generic answer, no specific example or outcome"));
        assert!(user.contains("I led the migration"));
    }

    #[tokio::test]
    async fn test_missing_optional_fields_default() {
        let llm = ScriptedLlm::replying([r#"{"rating": "Poor"}"#]);
        let outcome = evaluate_answer(&question(), "dunno", &llm).await;
        let evaluation = outcome.evaluation();
        assert_eq!(evaluation.rating, Rating::Poor);
        assert!(evaluation.feedback.is_empty());
        assert!(evaluation.improvements.is_empty());
    }

    #[tokio::test]
    async fn test_null_lists_and_feedback_still_grade() {
        let llm = ScriptedLlm::replying([
            r#"{"rating": "excellent", "feedback": null, "strengths": null, "improvements": ["pace"]}"#,
        ]);
        let outcome = evaluate_answer(&question(), "answer", &llm).await;
        assert!(!outcome.is_degraded());
        let evaluation = outcome.evaluation();
        assert_eq!(evaluation.rating, Rating::Excellent);
        assert!(evaluation.feedback.is_empty());
        assert!(evaluation.strengths.is_empty());
        assert_eq!(evaluation.improvements, vec!["pace"]);
    }

    #[tokio::test]
    async fn test_unknown_rating_degrades() {
        let llm = ScriptedLlm::replying([r#"{"rating": "amazing", "feedback": "wow"}"#]);
        let outcome = evaluate_answer(&question(), "answer", &llm).await;
        assert!(outcome.is_degraded());
        assert_eq!(outcome.evaluation(), &Evaluation::placeholder());
    }

    #[tokio::test]
    async fn test_non_json_reply_degrades_to_good_placeholder() {
        let llm = ScriptedLlm::replying(["Great answer, well done!"]);
        let outcome = evaluate_answer(&question(), "answer", &llm).await;
        match outcome {
            EvaluationOutcome::Degraded { evaluation, reason } => {
                assert_eq!(evaluation.rating, Rating::Good);
                assert!(reason.contains("unparseable"));
            }
            other => panic!("expected degraded outcome, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_call_failure_degrades() {
        let llm = ScriptedLlm::new([Err(LlmError::Api {
            status: 503,
            message: "overloaded".to_string(),
        })]);
        let outcome = evaluate_answer(&question(), "answer", &llm).await;
        match outcome {
            EvaluationOutcome::Degraded { reason, .. } => assert!(reason.contains("overloaded")),
            other => panic!("expected degraded outcome, got {other:?}"),
        }
    }

    #[test]
    fn test_rating_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Rating::Excellent).unwrap(), "excellent");
    }
}
