use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use quiz_core::model::{QuestionId, QuizSummary, SessionId};
use quiz_core::scoring::score;
use storage::repository::{QuestionRepository, ResponseRepository};

use crate::error::SummaryError;

/// Builds the end-of-session summary by reconciling stored answers against
/// the catalog.
#[derive(Clone)]
pub struct SummaryService {
    questions: Arc<dyn QuestionRepository>,
    responses: Arc<dyn ResponseRepository>,
}

impl SummaryService {
    #[must_use]
    pub fn new(
        questions: Arc<dyn QuestionRepository>,
        responses: Arc<dyn ResponseRepository>,
    ) -> Self {
        Self {
            questions,
            responses,
        }
    }

    /// Scores everything the session answered.
    ///
    /// An unknown session is not an error: it yields an empty item list and
    /// all-zero stats.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::Storage` on repository failures.
    pub async fn build_summary(&self, session_id: SessionId) -> Result<QuizSummary, SummaryError> {
        let catalog = self.questions.list_questions().await?;
        let responses = self.responses.list_for_session(session_id).await?;

        let answers: HashMap<QuestionId, String> = responses
            .into_iter()
            .map(|r| (r.question_id, r.answer_text))
            .collect();

        let summary = score(&catalog, &answers);
        debug!(
            %session_id,
            total = summary.stats.total,
            correct = summary.stats.correct,
            "summary built"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{OptionId, Question, QuestionOption, QuestionType};
    use storage::repository::{InMemoryRepository, ResponseRepository};

    fn seed_repo() -> InMemoryRepository {
        let repo = InMemoryRepository::new();
        repo.insert_question(
            Question::new(
                QuestionId::new(1),
                1,
                "What is the capital of France?",
                QuestionType::SingleChoice,
                Some("1".to_string()),
                vec![
                    QuestionOption {
                        id: OptionId::new(1),
                        question_id: QuestionId::new(1),
                        text: "Paris".to_string(),
                    },
                    QuestionOption {
                        id: OptionId::new(2),
                        question_id: QuestionId::new(1),
                        text: "London".to_string(),
                    },
                ],
            )
            .unwrap(),
        );
        repo
    }

    #[tokio::test]
    async fn unknown_session_yields_empty_summary() {
        let repo = seed_repo();
        let service = SummaryService::new(Arc::new(repo.clone()), Arc::new(repo));

        let summary = service.build_summary(SessionId::random()).await.unwrap();
        assert!(summary.items.is_empty());
        assert_eq!(summary.stats.total, 0);
        assert_eq!(summary.stats.percentage, 0.0);
    }

    #[tokio::test]
    async fn stored_answer_is_scored_and_resolved() {
        let repo = seed_repo();
        let session = SessionId::random();
        repo.upsert_response(session, QuestionId::new(1), "1")
            .await
            .unwrap();

        let service = SummaryService::new(Arc::new(repo.clone()), Arc::new(repo));
        let summary = service.build_summary(session).await.unwrap();

        assert_eq!(summary.items.len(), 1);
        let item = &summary.items[0];
        assert_eq!(item.is_correct, Some(true));
        assert_eq!(item.user_answer.as_deref(), Some("Paris"));
        assert_eq!(item.correct_answer.as_deref(), Some("Paris"));
        assert_eq!(summary.stats.percentage, 100.0);
    }
}
