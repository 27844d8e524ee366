use serde::Serialize;

use quiz_core::model::{OptionId, Question, QuestionId, QuestionType};

/// One row of the admin grid: the catalog in canonical order, with the
/// correct-answer encoding exposed for choice types only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionGridItem {
    pub question_id: QuestionId,
    pub order_no: u32,
    pub text: String,
    pub question_type: QuestionType,
    pub correct_answer: Option<String>,
}

impl QuestionGridItem {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        let correct_answer = if question.question_type.is_choice() {
            question.correct_answer.clone()
        } else {
            None
        };
        Self {
            question_id: question.id,
            order_no: question.order_no,
            text: question.text.clone(),
            question_type: question.question_type,
            correct_answer,
        }
    }
}

/// A selectable option as shown to the quiz taker. Never carries
/// correctness information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionItem {
    pub option_id: OptionId,
    pub text: String,
}

/// A question as presented during an attempt.
///
/// `position` is attempt-local (1-based, assigned by subset selection) for
/// a randomized quiz set, or the canonical `order_no` for a direct lookup.
/// The correct answer is deliberately absent from this view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizQuestion {
    pub question_id: QuestionId,
    pub position: u32,
    pub text: String,
    pub question_type: QuestionType,
    pub options: Option<Vec<OptionItem>>,
}

impl QuizQuestion {
    /// Builds the presentation view with the given position. Options come
    /// back sorted by option id; questions without options yield `None`.
    #[must_use]
    pub fn from_question(question: &Question, position: u32) -> Self {
        let options: Vec<OptionItem> = question
            .options
            .iter()
            .map(|o| OptionItem {
                option_id: o.id,
                text: o.text.clone(),
            })
            .collect();

        Self {
            question_id: question.id,
            position,
            text: question.text.clone(),
            question_type: question.question_type,
            options: if options.is_empty() {
                None
            } else {
                Some(options)
            },
        }
    }
}
