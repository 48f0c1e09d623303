//! Axum route handlers for the interview-prep API.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::interview::evaluation::{evaluate_answer, Evaluation};
use crate::interview::prep::prepare_session;
use crate::interview::questions::PrepOptions;
use crate::interview::summary::{summarise_session, RatingBreakdown, SessionSummary};
use crate::session::models::Session;
use crate::session::store::StoreError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrepRequest {
    pub company: Option<String>,
    pub role: Option<String>,
    pub interview_type: Option<String>,
    pub experience_level: Option<String>,
    pub focus_areas: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepResponse {
    pub ok: bool,
    pub session_id: String,
    pub company: String,
    pub role: String,
    pub question_count: usize,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub ok: bool,
    pub session: Session,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnswerRequest {
    pub session_id: Option<String>,
    pub question_index: Option<i64>,
    pub answer: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    pub ok: bool,
    pub evaluation: Evaluation,
    pub answered_count: usize,
    pub total_questions: usize,
    pub is_complete: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SummariseRequest {
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummariseResponse {
    pub ok: bool,
    pub session_id: String,
    pub stats: RatingBreakdown,
    pub summary: SessionSummary,
}

/// Trimmed, non-empty value of an optional request field.
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

async fn load_session(state: &AppState, session_id: &str) -> Result<Session, AppError> {
    state
        .sessions
        .get(session_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/prep
///
/// Researches the company, generates questions and stores a new session.
pub async fn handle_prep(
    State(state): State<AppState>,
    payload: Result<Json<PrepRequest>, JsonRejection>,
) -> Result<Json<PrepResponse>, AppError> {
    let Json(request) = payload?;

    let (Some(company), Some(role)) = (present(request.company), present(request.role)) else {
        return Err(AppError::Validation(
            "Company and role are required".to_string(),
        ));
    };
    let options = PrepOptions {
        interview_type: present(request.interview_type),
        experience_level: present(request.experience_level),
        focus_areas: present(request.focus_areas),
    };

    let session = prepare_session(
        &company,
        &role,
        &options,
        state.fetcher.as_ref(),
        state.llm.as_ref(),
        &state.sessions,
    )
    .await?;

    Ok(Json(PrepResponse {
        ok: true,
        question_count: session.questions.len(),
        session_id: session.session_id,
        company: session.company,
        role: session.role,
    }))
}

/// GET /api/session/:session_id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = load_session(&state, &session_id).await?;
    Ok(Json(SessionResponse { ok: true, session }))
}

/// POST /api/answer
///
/// Grades one answer and records it. Grading problems never block the
/// submission: a placeholder evaluation is recorded instead.
pub async fn handle_answer(
    State(state): State<AppState>,
    payload: Result<Json<AnswerRequest>, JsonRejection>,
) -> Result<Json<AnswerResponse>, AppError> {
    let Json(request) = payload?;

    let (Some(session_id), Some(question_index), Some(answer)) = (
        present(request.session_id),
        request.question_index,
        present(request.answer),
    ) else {
        return Err(AppError::Validation(
            "sessionId, questionIndex, and answer are required".to_string(),
        ));
    };
    let question_index = usize::try_from(question_index).map_err(|_| {
        AppError::Validation(format!("questionIndex {question_index} must not be negative"))
    })?;

    let session = load_session(&state, &session_id).await?;
    let question = session.question(question_index).ok_or_else(|| {
        AppError::Validation(format!(
            "questionIndex {question_index} is out of range for {} questions",
            session.questions.len()
        ))
    })?;

    let outcome = evaluate_answer(question, &answer, state.llm.as_ref()).await;
    if outcome.is_degraded() {
        warn!("Recording placeholder evaluation for session {session_id} question {question_index}");
    } else {
        info!(
            "Answer for session {session_id} question {question_index} rated {}",
            outcome.evaluation().rating.as_str()
        );
    }
    let evaluation = outcome.into_evaluation();

    let updated = state
        .sessions
        .append_answer(&session_id, question_index, &answer, Some(evaluation.clone()))
        .await
        .map_err(append_error)?;

    Ok(Json(AnswerResponse {
        ok: true,
        evaluation,
        answered_count: updated.answered_count(),
        total_questions: updated.questions.len(),
        is_complete: updated.is_complete(),
    }))
}

/// Store-level rejections of an answer keep their client-facing status.
fn append_error(error: StoreError) -> AppError {
    match error {
        StoreError::NotFound(_) => AppError::NotFound(error.to_string()),
        StoreError::QuestionOutOfRange { .. } => AppError::Validation(error.to_string()),
        other => AppError::Store(other),
    }
}

/// POST /api/summarise
///
/// Aggregates every recorded answer into rating stats and a debrief.
pub async fn handle_summarise(
    State(state): State<AppState>,
    payload: Result<Json<SummariseRequest>, JsonRejection>,
) -> Result<Json<SummariseResponse>, AppError> {
    let Json(request) = payload?;
    let session_id = present(request.session_id)
        .ok_or_else(|| AppError::Validation("sessionId is required".to_string()))?;

    let session = load_session(&state, &session_id).await?;
    if session.answers.is_empty() {
        return Err(AppError::Validation(
            "No answers recorded for this session yet".to_string(),
        ));
    }

    let report = summarise_session(&session, state.llm.as_ref()).await;
    if report.degraded {
        warn!("Returning fallback summary for session {session_id}");
    }

    Ok(Json(SummariseResponse {
        ok: true,
        session_id,
        stats: report.stats,
        summary: report.summary,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_error_maps_store_rejections() {
        let err = append_error(StoreError::NotFound("session_gone".to_string()));
        assert!(matches!(err, AppError::NotFound(msg) if msg.contains("session_gone")));

        let err = append_error(StoreError::QuestionOutOfRange { index: 4, total: 2 });
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("questionIndex 4")));
    }

    #[test]
    fn test_append_error_keeps_backend_failures_as_store_errors() {
        let redis = redis::RedisError::from((redis::ErrorKind::IoError, "connection refused"));
        assert!(matches!(append_error(StoreError::Redis(redis)), AppError::Store(_)));
    }

    #[test]
    fn test_present_rejects_blank_values() {
        assert_eq!(present(Some("  ".to_string())), None);
        assert_eq!(present(None), None);
        assert_eq!(present(Some("Acme".to_string())).as_deref(), Some("Acme"));
    }
}
