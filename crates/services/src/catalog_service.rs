use std::sync::Arc;

use rand::{rng, Rng};

use storage::repository::QuestionRepository;

use crate::error::CatalogError;
use crate::select::{select_quiz_set, QUIZ_SET_SIZE};
use crate::view::{QuestionGridItem, QuizQuestion};

//
// ─── CATALOG SERVICE ───────────────────────────────────────────────────────────
//

/// Read-side catalog queries: the admin grid, the randomized quiz set, and
/// direct order-number lookup.
#[derive(Clone)]
pub struct CatalogService {
    questions: Arc<dyn QuestionRepository>,
}

impl CatalogService {
    #[must_use]
    pub fn new(questions: Arc<dyn QuestionRepository>) -> Self {
        Self { questions }
    }

    /// The full catalog in canonical order, for the grid view.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` on repository failures.
    pub async fn grid(&self) -> Result<Vec<QuestionGridItem>, CatalogError> {
        let questions = self.questions.list_questions().await?;
        Ok(questions.iter().map(QuestionGridItem::from_question).collect())
    }

    /// A fresh randomized quiz set of up to [`QUIZ_SET_SIZE`] questions.
    ///
    /// Each call draws a new ordering; two attempts are never guaranteed
    /// identical.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` on repository failures.
    pub async fn quiz_set(&self) -> Result<Vec<QuizQuestion>, CatalogError> {
        let catalog = self.questions.list_questions().await?;
        // The thread-local RNG is drawn after the await so the future
        // stays Send.
        let mut rng = rng();
        Ok(select_quiz_set(catalog, QUIZ_SET_SIZE, &mut rng))
    }

    /// Like [`CatalogService::quiz_set`], with a caller-supplied random
    /// source so tests can control the shuffle.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` on repository failures.
    pub async fn quiz_set_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Vec<QuizQuestion>, CatalogError> {
        let catalog = self.questions.list_questions().await?;
        Ok(select_quiz_set(catalog, QUIZ_SET_SIZE, rng))
    }

    /// A single question by its canonical order number, or `None` when no
    /// such question exists.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` on repository failures.
    pub async fn by_order_no(&self, order_no: u32) -> Result<Option<QuizQuestion>, CatalogError> {
        let question = self.questions.get_by_order_no(order_no).await?;
        Ok(question.map(|q| QuizQuestion::from_question(&q, q.order_no)))
    }

    /// Number of questions in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` on repository failures.
    pub async fn count(&self) -> Result<u64, CatalogError> {
        Ok(self.questions.count().await?)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
