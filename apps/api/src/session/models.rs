use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::interview::evaluation::Evaluation;
use crate::interview::questions::Question;
use crate::research::profile::CompanyProfile;

/// `Active` until every question has an answer, then `Completed` for good.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    /// Position of the answered question in `Session::questions`.
    pub question_index: usize,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
    pub timestamp: DateTime<Utc>,
}

/// One interview-prep attempt. The whole record is the unit of persistence.
///
/// Invariant: `status == Completed` iff `answers.len() >= questions.len()`.
/// Profile and questions are fixed at creation; only `answers` and `status`
/// change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,
    pub company: String,
    pub role: String,
    pub profile: CompanyProfile,
    pub questions: Vec<Question>,
    #[serde(default)]
    pub answers: Vec<Answer>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: SessionStatus,
}

impl Session {
    pub fn new(
        session_id: String,
        company: String,
        role: String,
        profile: CompanyProfile,
        questions: Vec<Question>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let mut session = Self {
            session_id,
            company,
            role,
            profile,
            questions,
            answers: Vec::new(),
            created_at,
            status: SessionStatus::Active,
        };
        session.refresh_status();
        session
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Records an answer. A second answer for the same question replaces the
    /// first in place, so `answers` never grows past one entry per question.
    pub fn record_answer(&mut self, answer: Answer) {
        match self
            .answers
            .iter_mut()
            .find(|a| a.question_index == answer.question_index)
        {
            Some(existing) => *existing = answer,
            None => self.answers.push(answer),
        }
        self.refresh_status();
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn is_complete(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    fn refresh_status(&mut self) {
        // Completed is terminal.
        if self.status == SessionStatus::Completed {
            return;
        }
        if self.answers.len() >= self.questions.len() {
            self.status = SessionStatus::Completed;
        }
    }
}
