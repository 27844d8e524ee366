use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use quiz_core::model::{QuestionId, ResponseId, SessionId};
use quiz_core::validate::validate_answer;
use quiz_core::Clock;
use storage::repository::{
    QuestionRepository, ResponseRepository, SessionRepository, StorageError,
};

use crate::error::ResponseError;
use crate::sanitize::sanitize_answer;

//
// ─── SAVE OUTCOME ──────────────────────────────────────────────────────────────
//

/// Result of an answer submission.
///
/// Rejections are expected outcomes, not errors: the messages are shown to
/// the quiz taker verbatim and nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(ResponseId),
    Rejected(Vec<String>),
}

impl SaveOutcome {
    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved(_))
    }

    /// The validation messages for a rejection, empty for a save.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        match self {
            SaveOutcome::Saved(_) => &[],
            SaveOutcome::Rejected(errors) => errors,
        }
    }
}

//
// ─── RESPONSE SERVICE ──────────────────────────────────────────────────────────
//

/// The engine's only write path: sanitize → validate → session gate →
/// upsert.
///
/// Validation happens before any write, so a rejected submission leaves no
/// session row and no response row behind.
#[derive(Clone)]
pub struct ResponseService {
    clock: Clock,
    questions: Arc<dyn QuestionRepository>,
    responses: Arc<dyn ResponseRepository>,
    sessions: Arc<dyn SessionRepository>,
}

impl ResponseService {
    #[must_use]
    pub fn new(
        clock: Clock,
        questions: Arc<dyn QuestionRepository>,
        responses: Arc<dyn ResponseRepository>,
        sessions: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            clock,
            questions,
            responses,
            sessions,
        }
    }

    /// Validates and persists one answer for a (session, question) pair.
    ///
    /// A repeat submission for the same pair overwrites the stored text and
    /// keeps the row identity (last-write-wins). The session row is created
    /// lazily on the first accepted answer for an unseen token.
    ///
    /// # Errors
    ///
    /// Returns `ResponseError::Storage` for store faults; validation
    /// failures come back as `Ok(SaveOutcome::Rejected)`.
    pub async fn save(
        &self,
        session_id: SessionId,
        question_id: QuestionId,
        answer_text: &str,
    ) -> Result<SaveOutcome, ResponseError> {
        let sanitized = sanitize_answer(answer_text);

        let catalog = self.questions.list_questions().await?;
        let Some(question) = catalog.iter().find(|q| q.id == question_id) else {
            debug!(%session_id, %question_id, "submission for unknown question");
            return Ok(SaveOutcome::Rejected(vec!["Question not found.".to_string()]));
        };

        let errors = validate_answer(question, &sanitized);
        if !errors.is_empty() {
            debug!(
                %session_id,
                %question_id,
                error_count = errors.len(),
                "answer rejected"
            );
            return Ok(SaveOutcome::Rejected(errors));
        }

        self.ensure_session(session_id).await?;

        let response_id = self
            .responses
            .upsert_response(session_id, question_id, &sanitized)
            .await?;
        Ok(SaveOutcome::Saved(response_id))
    }

    /// Creates the session row iff absent.
    ///
    /// A concurrent first submission may win the insert race; the store's
    /// conflict is treated as "already exists", keeping the gate idempotent.
    ///
    /// # Errors
    ///
    /// Returns `ResponseError::Storage` for store faults other than the
    /// expected duplicate-create race.
    pub async fn ensure_session(&self, session_id: SessionId) -> Result<(), ResponseError> {
        if self.sessions.session_exists(session_id).await? {
            return Ok(());
        }

        match self
            .sessions
            .create_session(session_id, self.clock.now())
            .await
        {
            Ok(()) => {
                info!(%session_id, "session created");
                Ok(())
            }
            Err(StorageError::Conflict) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// The session's stored answers keyed by question id, for prefilling a
    /// revisited question set. Unknown sessions yield an empty map.
    ///
    /// # Errors
    ///
    /// Returns `ResponseError::Storage` on repository failures.
    pub async fn answers_for_session(
        &self,
        session_id: SessionId,
    ) -> Result<HashMap<QuestionId, String>, ResponseError> {
        let responses = self.responses.list_for_session(session_id).await?;
        Ok(responses
            .into_iter()
            .map(|r| (r.question_id, r.answer_text))
            .collect())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{OptionId, Question, QuestionOption, QuestionType};
    use quiz_core::time::fixed_clock;
    use storage::repository::InMemoryRepository;

    fn option(id: u64, question_id: u64, text: &str) -> QuestionOption {
        QuestionOption {
            id: OptionId::new(id),
            question_id: QuestionId::new(question_id),
            text: text.to_string(),
        }
    }

    fn seed_repo() -> InMemoryRepository {
        let repo = InMemoryRepository::new();
        repo.insert_question(
            Question::new(
                QuestionId::new(1),
                1,
                "What is the capital of France?",
                QuestionType::SingleChoice,
                Some("1".to_string()),
                vec![option(1, 1, "Paris"), option(2, 1, "London")],
            )
            .unwrap(),
        );
        repo.insert_question(
            Question::new(
                QuestionId::new(3),
                3,
                "What does HTML stand for?",
                QuestionType::ShortAnswer,
                None,
                Vec::new(),
            )
            .unwrap(),
        );
        repo
    }

    fn build_service(repo: &InMemoryRepository) -> ResponseService {
        ResponseService::new(
            fixed_clock(),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
        )
    }

    #[tokio::test]
    async fn valid_answer_creates_session_and_row() {
        let repo = seed_repo();
        let service = build_service(&repo);
        let session = SessionId::random();

        let outcome = service.save(session, QuestionId::new(1), "1").await.unwrap();
        assert!(outcome.is_saved());

        use storage::repository::SessionRepository;
        assert!(repo.session_exists(session).await.unwrap());

        let answers = service.answers_for_session(session).await.unwrap();
        assert_eq!(answers.get(&QuestionId::new(1)).map(String::as_str), Some("1"));
    }

    #[tokio::test]
    async fn rejected_answer_has_no_side_effects() {
        let repo = seed_repo();
        let service = build_service(&repo);
        let session = SessionId::random();

        let outcome = service
            .save(session, QuestionId::new(1), "not a number")
            .await
            .unwrap();
        assert_eq!(outcome.errors(), ["Invalid option value."]);

        use storage::repository::SessionRepository;
        assert!(!repo.session_exists(session).await.unwrap());
        assert!(service.answers_for_session(session).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_question_is_rejected_without_type_dispatch() {
        let repo = seed_repo();
        let service = build_service(&repo);

        let outcome = service
            .save(SessionId::random(), QuestionId::new(99), "1")
            .await
            .unwrap();
        assert_eq!(outcome.errors(), ["Question not found."]);
    }

    #[tokio::test]
    async fn resubmission_overwrites_in_place() {
        let repo = seed_repo();
        let service = build_service(&repo);
        let session = SessionId::random();

        let first = service.save(session, QuestionId::new(1), "1").await.unwrap();
        let second = service.save(session, QuestionId::new(1), "2").await.unwrap();

        let (SaveOutcome::Saved(first_id), SaveOutcome::Saved(second_id)) = (first, second) else {
            panic!("both submissions should be accepted");
        };
        assert_eq!(first_id, second_id);

        let answers = service.answers_for_session(session).await.unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers.get(&QuestionId::new(1)).map(String::as_str), Some("2"));
    }

    #[tokio::test]
    async fn answer_text_is_sanitized_before_storage() {
        let repo = seed_repo();
        let service = build_service(&repo);
        let session = SessionId::random();

        let outcome = service
            .save(session, QuestionId::new(3), "  <b>HyperText</b> Markup Language  ")
            .await
            .unwrap();
        assert!(outcome.is_saved());

        let answers = service.answers_for_session(session).await.unwrap();
        let stored = answers.get(&QuestionId::new(3)).unwrap();
        assert!(!stored.contains('<'));
        assert!(stored.contains("&lt;b&gt;"));
        assert!(!stored.starts_with(' '));
    }

    #[tokio::test]
    async fn session_gate_tolerates_create_conflict() {
        let repo = seed_repo();
        let service = build_service(&repo);
        let session = SessionId::random();

        // both submissions target the same fresh session
        let one = service.save(session, QuestionId::new(1), "1").await.unwrap();
        let two = service.save(session, QuestionId::new(3), "H2O").await.unwrap();
        assert!(one.is_saved());
        assert!(two.is_saved());

        let answers = service.answers_for_session(session).await.unwrap();
        assert_eq!(answers.len(), 2);
    }
}
