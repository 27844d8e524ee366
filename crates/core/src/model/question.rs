use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{OptionId, QuestionId};

//
// ─── QUESTION TYPE ─────────────────────────────────────────────────────────────
//

/// The five supported answer formats.
///
/// Choice types carry an encoded correct answer (option ids); free-text
/// types are ungraded and never carry one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    SingleChoice,
    MultipleChoice,
    ShortAnswer,
    PhoneNumber,
    LongAnswer,
}

impl QuestionType {
    /// Stable string encoding used for storage and display.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::SingleChoice => "SingleChoice",
            QuestionType::MultipleChoice => "MultipleChoice",
            QuestionType::ShortAnswer => "ShortAnswer",
            QuestionType::PhoneNumber => "PhoneNumber",
            QuestionType::LongAnswer => "LongAnswer",
        }
    }

    /// Returns true for option-backed types (graded against option ids).
    #[must_use]
    pub fn is_choice(&self) -> bool {
        matches!(self, QuestionType::SingleChoice | QuestionType::MultipleChoice)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown question type: {raw}")]
pub struct ParseQuestionTypeError {
    pub raw: String,
}

impl FromStr for QuestionType {
    type Err = ParseQuestionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SingleChoice" => Ok(QuestionType::SingleChoice),
            "MultipleChoice" => Ok(QuestionType::MultipleChoice),
            "ShortAnswer" => Ok(QuestionType::ShortAnswer),
            "PhoneNumber" => Ok(QuestionType::PhoneNumber),
            "LongAnswer" => Ok(QuestionType::LongAnswer),
            _ => Err(ParseQuestionTypeError { raw: s.to_string() }),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// An option attached to a choice question. Owned by its question and
/// cascade-deleted with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionOption {
    pub id: OptionId,
    pub question_id: QuestionId,
    pub text: String,
}

/// A catalog question: immutable reference data once seeded.
///
/// `order_no` is the canonical catalog position (unique, 1-based, never
/// reused); the attempt-local position a client sees comes from subset
/// selection, not from here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub order_no: u32,
    pub text: String,
    pub question_type: QuestionType,
    pub correct_answer: Option<String>,
    pub options: Vec<QuestionOption>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text must not be blank")]
    BlankText,

    #[error("order_no must be 1-based, got {0}")]
    InvalidOrderNo(u32),

    #[error("{question_type} questions do not carry a correct answer")]
    UnexpectedCorrectAnswer { question_type: QuestionType },
}

impl Question {
    /// Builds a catalog question, sorting options by option id.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is blank, `order_no` is zero, or
    /// a free-text question carries a correct-answer encoding.
    pub fn new(
        id: QuestionId,
        order_no: u32,
        text: impl Into<String>,
        question_type: QuestionType,
        correct_answer: Option<String>,
        mut options: Vec<QuestionOption>,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::BlankText);
        }
        if order_no == 0 {
            return Err(QuestionError::InvalidOrderNo(order_no));
        }
        if correct_answer.is_some() && !question_type.is_choice() {
            return Err(QuestionError::UnexpectedCorrectAnswer { question_type });
        }

        options.sort_by_key(|o| o.id);

        Ok(Self {
            id,
            order_no,
            text,
            question_type,
            correct_answer,
            options,
        })
    }

    /// The set of valid option ids for this question.
    #[must_use]
    pub fn option_id_set(&self) -> HashSet<u64> {
        self.options.iter().map(|o| o.id.value()).collect()
    }

    /// Resolves a decimal option-id token to its display text.
    ///
    /// Returns `None` when the token does not name one of this question's
    /// options; callers fall back to showing the raw token.
    #[must_use]
    pub fn option_text_for_token(&self, token: &str) -> Option<&str> {
        let token = token.trim();
        self.options
            .iter()
            .find(|o| o.id.value().to_string() == token)
            .map(|o| o.text.as_str())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn option(id: u64, question_id: u64, text: &str) -> QuestionOption {
        QuestionOption {
            id: OptionId::new(id),
            question_id: QuestionId::new(question_id),
            text: text.to_string(),
        }
    }

    #[test]
    fn question_type_string_roundtrip() {
        for qt in [
            QuestionType::SingleChoice,
            QuestionType::MultipleChoice,
            QuestionType::ShortAnswer,
            QuestionType::PhoneNumber,
            QuestionType::LongAnswer,
        ] {
            assert_eq!(qt.as_str().parse::<QuestionType>().unwrap(), qt);
        }
    }

    #[test]
    fn unknown_question_type_fails_to_parse() {
        let err = "Essay".parse::<QuestionType>().unwrap_err();
        assert_eq!(err.raw, "Essay");
    }

    #[test]
    fn new_question_sorts_options_by_id() {
        let q = Question::new(
            QuestionId::new(1),
            1,
            "What is the capital of France?",
            QuestionType::SingleChoice,
            Some("1".to_string()),
            vec![option(3, 1, "Berlin"), option(1, 1, "Paris"), option(2, 1, "London")],
        )
        .unwrap();

        let ids: Vec<u64> = q.options.iter().map(|o| o.id.value()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn blank_text_is_rejected() {
        let err = Question::new(
            QuestionId::new(1),
            1,
            "   ",
            QuestionType::ShortAnswer,
            None,
            Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::BlankText);
    }

    #[test]
    fn free_text_question_rejects_correct_answer() {
        let err = Question::new(
            QuestionId::new(1),
            1,
            "Enter your phone number",
            QuestionType::PhoneNumber,
            Some("1".to_string()),
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, QuestionError::UnexpectedCorrectAnswer { .. }));
    }

    #[test]
    fn option_token_resolution_falls_back_to_none() {
        let q = Question::new(
            QuestionId::new(1),
            1,
            "What is the capital of France?",
            QuestionType::SingleChoice,
            Some("1".to_string()),
            vec![option(1, 1, "Paris"), option(2, 1, "London")],
        )
        .unwrap();

        assert_eq!(q.option_text_for_token("1"), Some("Paris"));
        assert_eq!(q.option_text_for_token(" 2 "), Some("London"));
        assert_eq!(q.option_text_for_token("99"), None);
        assert_eq!(q.option_text_for_token("Paris"), None);
    }
}
