use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{Question, QuestionId, Response, ResponseId, Session, SessionId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Read-only access to the question catalog.
///
/// Questions come back with their options attached (ordered by option id)
/// and are themselves ordered by `order_no`. The catalog is seeded once and
/// treated as immutable reference data at request time.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// List the full catalog in `order_no` order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on connection or decoding failures.
    async fn list_questions(&self) -> Result<Vec<Question>, StorageError>;

    /// Fetch a single question by its canonical order number.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on connection or decoding failures; an
    /// unknown order number is `Ok(None)`, not an error.
    async fn get_by_order_no(&self, order_no: u32) -> Result<Option<Question>, StorageError>;

    /// Number of questions in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on connection failures.
    async fn count(&self) -> Result<u64, StorageError>;
}

/// Keyed upsert store for answers: at most one row per (session, question).
#[async_trait]
pub trait ResponseRepository: Send + Sync {
    /// Fetch the stored answer for a (session, question) pair, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on connection or decoding failures.
    async fn get_response(
        &self,
        session_id: SessionId,
        question_id: QuestionId,
    ) -> Result<Option<Response>, StorageError>;

    /// Insert or overwrite the answer for a (session, question) pair.
    ///
    /// Overwrites preserve the row identity. The backing store enforces a
    /// uniqueness constraint on the pair, so concurrent submissions for the
    /// same pair serialize into a single row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` when a referenced session or
    /// question does not exist, or other storage errors.
    async fn upsert_response(
        &self,
        session_id: SessionId,
        question_id: QuestionId,
        answer_text: &str,
    ) -> Result<ResponseId, StorageError>;

    /// All stored answers for a session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on connection or decoding failures; an
    /// unknown session yields an empty list.
    async fn list_for_session(&self, session_id: SessionId)
    -> Result<Vec<Response>, StorageError>;
}

/// Session rows, created lazily by the session gate.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Whether a session row exists for the token.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on connection failures.
    async fn session_exists(&self, session_id: SessionId) -> Result<bool, StorageError>;

    /// Create the session row if absent. Idempotent: repeated or concurrent
    /// calls for the same token leave exactly one row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on connection failures.
    async fn create_session(
        &self,
        session_id: SessionId,
        started_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<Vec<Question>>>,
    responses: Arc<Mutex<HashMap<(SessionId, QuestionId), Response>>>,
    sessions: Arc<Mutex<HashMap<SessionId, Session>>>,
    next_response_id: Arc<Mutex<u64>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds one catalog question, keeping the list in `order_no` order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn insert_question(&self, question: Question) {
        let mut guard = self.questions.lock().expect("questions lock poisoned");
        guard.push(question);
        guard.sort_by_key(|q| q.order_no);
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn list_questions(&self) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn get_by_order_no(&self, order_no: u32) -> Result<Option<Question>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.iter().find(|q| q.order_no == order_no).cloned())
    }

    async fn count(&self) -> Result<u64, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.len() as u64)
    }
}

#[async_trait]
impl ResponseRepository for InMemoryRepository {
    async fn get_response(
        &self,
        session_id: SessionId,
        question_id: QuestionId,
    ) -> Result<Option<Response>, StorageError> {
        let guard = self
            .responses
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&(session_id, question_id)).cloned())
    }

    async fn upsert_response(
        &self,
        session_id: SessionId,
        question_id: QuestionId,
        answer_text: &str,
    ) -> Result<ResponseId, StorageError> {
        let mut guard = self
            .responses
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        if let Some(existing) = guard.get_mut(&(session_id, question_id)) {
            // Overwrite in place; the row identity is stable.
            existing.answer_text = answer_text.to_string();
            return Ok(existing.id);
        }

        let mut next = self
            .next_response_id
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *next += 1;
        let id = ResponseId::new(*next);
        guard.insert(
            (session_id, question_id),
            Response {
                id,
                session_id,
                question_id,
                answer_text: answer_text.to_string(),
            },
        );
        Ok(id)
    }

    async fn list_for_session(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<Response>, StorageError> {
        let guard = self
            .responses
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut responses: Vec<Response> = guard
            .values()
            .filter(|r| r.session_id == session_id)
            .cloned()
            .collect();
        responses.sort_by_key(|r| r.question_id);
        Ok(responses)
    }
}

#[async_trait]
impl SessionRepository for InMemoryRepository {
    async fn session_exists(&self, session_id: SessionId) -> Result<bool, StorageError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.contains_key(&session_id))
    }

    async fn create_session(
        &self,
        session_id: SessionId,
        started_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .entry(session_id)
            .or_insert_with(|| Session::new(session_id, started_at));
        Ok(())
    }
}

/// Aggregates the quiz repositories behind trait objects for easy backend
/// swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionRepository>,
    pub responses: Arc<dyn ResponseRepository>,
    pub sessions: Arc<dyn SessionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let responses: Arc<dyn ResponseRepository> = Arc::new(repo.clone());
        let sessions: Arc<dyn SessionRepository> = Arc::new(repo);
        Self {
            questions,
            responses,
            sessions,
        }
    }
}
