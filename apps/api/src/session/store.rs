//! Session Store: sessions live as one JSON blob per key in an external
//! key-value store with a fixed 24h expiry counted from creation.
//!
//! Updates are read-modify-write with no version check: two concurrent
//! submissions for the same session race and the later write wins.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::interview::evaluation::Evaluation;
use crate::interview::questions::Question;
use crate::research::profile::CompanyProfile;
use crate::session::models::{Answer, Session};

pub const SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const SESSION_KEY_PREFIX: &str = "interview:session:";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Session serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Session {0} not found")]
    NotFound(String),

    #[error("questionIndex {index} is out of range for {total} questions")]
    QuestionOutOfRange { index: usize, total: usize },
}

/// Minimal get / put-with-expiry key-value interface.
///
/// Carried behind `Arc<dyn KvStore>` so the session logic does not care
/// which backend holds the bytes.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;
}

/// Redis-backed `KvStore`. The connection manager reconnects on its own and
/// is cloned per command.
#[derive(Clone)]
pub struct RedisKvStore {
    connection: ConnectionManager,
}

impl RedisKvStore {
    /// Connects and checks the server answers a PING before serving traffic.
    pub async fn connect(client: redis::Client) -> Result<Self, StoreError> {
        let connection = ConnectionManager::new(client).await?;

        let mut health_connection = connection.clone();
        redis::cmd("PING")
            .query_async::<_, String>(&mut health_connection)
            .await?;

        Ok(Self { connection })
    }
}

#[async_trait]
impl KvStore for RedisKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut connection = self.connection.clone();
        let value: Option<String> = connection.get(key).await?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();
        // Redis rejects a zero expiry.
        let seconds = ttl.as_secs().max(1);
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(seconds)
            .query_async::<_, ()>(&mut connection)
            .await?;
        Ok(())
    }
}

/// Generates an opaque, globally unique session identifier.
pub fn generate_session_id() -> String {
    format!("session_{}", Uuid::new_v4().simple())
}

fn session_key(session_id: &str) -> String {
    format!("{SESSION_KEY_PREFIX}{session_id}")
}

#[derive(Clone)]
pub struct SessionStore {
    kv: Arc<dyn KvStore>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self {
            kv,
            ttl: SESSION_TTL,
        }
    }

    /// Persists a brand-new session in one write. Profile and questions must
    /// already be resolved.
    pub async fn create(
        &self,
        company: &str,
        role: &str,
        profile: CompanyProfile,
        questions: Vec<Question>,
    ) -> Result<Session, StoreError> {
        let session = Session::new(
            generate_session_id(),
            company.to_string(),
            role.to_string(),
            profile,
            questions,
            Utc::now(),
        );

        let value = serde_json::to_string(&session)?;
        self.kv
            .put(&session_key(&session.session_id), &value, self.ttl)
            .await?;

        info!(
            "Created session {} for {} at {} ({} questions)",
            session.session_id,
            role,
            company,
            session.questions.len()
        );
        Ok(session)
    }

    /// Loads a session. Absent, expired and unreadable records are all `None`.
    pub async fn get(&self, session_id: &str) -> Result<Option<Session>, StoreError> {
        let Some(value) = self.kv.get(&session_key(session_id)).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<Session>(&value) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!("Failed to parse stored session {session_id}: {e}");
                Ok(None)
            }
        }
    }

    /// Records an answer and re-persists the whole session.
    ///
    /// Fails with `NotFound` for unknown or expired sessions and
    /// `QuestionOutOfRange` for a bad index; neither case writes anything.
    pub async fn append_answer(
        &self,
        session_id: &str,
        question_index: usize,
        answer: &str,
        evaluation: Option<Evaluation>,
    ) -> Result<Session, StoreError> {
        let mut session = self
            .get(session_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(session_id.to_string()))?;

        if session.question(question_index).is_none() {
            return Err(StoreError::QuestionOutOfRange {
                index: question_index,
                total: session.questions.len(),
            });
        }

        let was_complete = session.is_complete();
        session.record_answer(Answer {
            question_index,
            answer: answer.to_string(),
            evaluation,
            timestamp: Utc::now(),
        });

        // Expiry is fixed at creation; rewrites only carry the remainder.
        let remaining = self
            .remaining_ttl(&session)
            .ok_or_else(|| StoreError::NotFound(session_id.to_string()))?;
        let value = serde_json::to_string(&session)?;
        self.kv
            .put(&session_key(session_id), &value, remaining)
            .await?;

        info!(
            "Recorded answer {} for session {} ({}/{})",
            question_index,
            session_id,
            session.answered_count(),
            session.questions.len()
        );
        if session.is_complete() && !was_complete {
            info!("Session {session_id} completed");
        }

        Ok(session)
    }

    fn remaining_ttl(&self, session: &Session) -> Option<Duration> {
        let elapsed = (Utc::now() - session.created_at).to_std().unwrap_or_default();
        self.ttl
            .checked_sub(elapsed)
            .filter(|remaining| !remaining.is_zero())
    }
}
