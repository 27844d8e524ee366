//! Summary scoring: reconciles a session's stored answers against the
//! catalog.
//!
//! Only questions with a stored answer are scored: each attempt sees a
//! random subset of the catalog, so unanswered questions are silently
//! excluded rather than counted against the session. Items come back in
//! catalog `order_no` order; the attempt-local ordering is not persisted.

use std::collections::HashMap;

use crate::model::{Question, QuestionId, QuestionType, QuizSummary, SummaryItem, SummaryStats};

/// Scores `answers` (question id → stored answer text) against `catalog`.
///
/// A session with no stored answers yields an empty item list and all-zero
/// stats. Correctness is graded for choice types only; free-text questions
/// count toward `attempted` but never toward `correct`.
#[must_use]
pub fn score(catalog: &[Question], answers: &HashMap<QuestionId, String>) -> QuizSummary {
    let mut relevant: Vec<&Question> = catalog
        .iter()
        .filter(|q| answers.contains_key(&q.id))
        .collect();
    relevant.sort_by_key(|q| q.order_no);

    let mut items = Vec::with_capacity(relevant.len());
    let mut attempted: u32 = 0;
    let mut correct: u32 = 0;

    for question in &relevant {
        let user_answer = answers
            .get(&question.id)
            .map(String::as_str)
            .unwrap_or_default();
        let has_answer = !user_answer.trim().is_empty();
        if has_answer {
            attempted += 1;
        }

        let is_correct = grade(question, user_answer, has_answer);
        if is_correct == Some(true) {
            correct += 1;
        }

        items.push(SummaryItem {
            question_text: question.text.clone(),
            question_type: question.question_type,
            user_answer: user_display(question, user_answer, has_answer),
            correct_answer: correct_display(question),
            is_correct,
        });
    }

    let total = u32::try_from(relevant.len()).unwrap_or(u32::MAX);
    QuizSummary {
        items,
        stats: SummaryStats::from_counts(total, attempted, correct),
    }
}

/// `Some(bool)` for graded choice questions with an answer and an expected
/// encoding; `None` otherwise (free text, or nothing to grade against).
fn grade(question: &Question, user_answer: &str, has_answer: bool) -> Option<bool> {
    if !has_answer {
        return None;
    }
    let expected = question.correct_answer.as_deref()?;

    match question.question_type {
        QuestionType::SingleChoice => Some(user_answer.trim() == expected.trim()),
        QuestionType::MultipleChoice => Some(sorted_tokens(user_answer) == sorted_tokens(expected)),
        _ => None,
    }
}

/// Splits an option-id encoding on `,`, trims each token, and sorts.
///
/// Option ids are unique, so comparing sorted token sequences is set
/// equality: "7,6,5" matches "5,6,7".
fn sorted_tokens(encoded: &str) -> Vec<String> {
    let mut tokens: Vec<String> = encoded
        .split(',')
        .map(|token| token.trim().to_string())
        .collect();
    tokens.sort();
    tokens
}

/// Resolves each option-id token to its option text, falling back to the
/// raw token when no option matches.
fn resolve_tokens(question: &Question, encoded: &str) -> String {
    encoded
        .split(',')
        .map(|token| {
            let token = token.trim();
            question
                .option_text_for_token(token)
                .map_or_else(|| token.to_string(), ToString::to_string)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn user_display(question: &Question, user_answer: &str, has_answer: bool) -> Option<String> {
    if has_answer && question.question_type.is_choice() {
        Some(resolve_tokens(question, user_answer))
    } else {
        Some(user_answer.to_string())
    }
}

fn correct_display(question: &Question) -> Option<String> {
    if !question.question_type.is_choice() {
        return None;
    }
    question
        .correct_answer
        .as_deref()
        .map(|encoded| resolve_tokens(question, encoded))
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OptionId, QuestionOption};

    fn option(id: u64, question_id: u64, text: &str) -> QuestionOption {
        QuestionOption {
            id: OptionId::new(id),
            question_id: QuestionId::new(question_id),
            text: text.to_string(),
        }
    }

    fn capital_of_france(order_no: u32) -> Question {
        Question::new(
            QuestionId::new(1),
            order_no,
            "What is the capital of France?",
            QuestionType::SingleChoice,
            Some("1".to_string()),
            vec![
                option(1, 1, "Paris"),
                option(2, 1, "London"),
                option(3, 1, "Berlin"),
                option(4, 1, "Madrid"),
            ],
        )
        .unwrap()
    }

    fn languages(order_no: u32) -> Question {
        Question::new(
            QuestionId::new(2),
            order_no,
            "Which of the following are programming languages?",
            QuestionType::MultipleChoice,
            Some("5,6,7".to_string()),
            vec![
                option(5, 2, "C#"),
                option(6, 2, "Python"),
                option(7, 2, "JavaScript"),
                option(8, 2, "Photoshop"),
            ],
        )
        .unwrap()
    }

    fn phone(order_no: u32) -> Question {
        Question::new(
            QuestionId::new(4),
            order_no,
            "Enter your phone number",
            QuestionType::PhoneNumber,
            None,
            Vec::new(),
        )
        .unwrap()
    }

    fn answers(pairs: &[(u64, &str)]) -> HashMap<QuestionId, String> {
        pairs
            .iter()
            .map(|(id, text)| (QuestionId::new(*id), (*text).to_string()))
            .collect()
    }

    #[test]
    fn empty_session_yields_empty_summary() {
        let catalog = vec![capital_of_france(1), languages(2)];
        let summary = score(&catalog, &HashMap::new());

        assert!(summary.items.is_empty());
        assert_eq!(summary.stats, SummaryStats::empty());
    }

    #[test]
    fn single_choice_resolves_option_text_both_ways() {
        let catalog = vec![capital_of_france(1)];
        let summary = score(&catalog, &answers(&[(1, "1")]));

        assert_eq!(summary.items.len(), 1);
        let item = &summary.items[0];
        assert_eq!(item.is_correct, Some(true));
        assert_eq!(item.user_answer.as_deref(), Some("Paris"));
        assert_eq!(item.correct_answer.as_deref(), Some("Paris"));
        assert_eq!(summary.stats.total, 1);
        assert_eq!(summary.stats.correct, 1);
        assert_eq!(summary.stats.percentage, 100.0);
    }

    #[test]
    fn single_choice_wrong_answer_shows_chosen_option() {
        let catalog = vec![capital_of_france(1)];
        let summary = score(&catalog, &answers(&[(1, "2")]));

        let item = &summary.items[0];
        assert_eq!(item.is_correct, Some(false));
        assert_eq!(item.user_answer.as_deref(), Some("London"));
        assert_eq!(item.correct_answer.as_deref(), Some("Paris"));
    }

    #[test]
    fn multiple_choice_matches_as_a_set() {
        let catalog = vec![languages(1)];
        let summary = score(&catalog, &answers(&[(2, "7,6,5")]));

        let item = &summary.items[0];
        assert_eq!(item.is_correct, Some(true));
        assert_eq!(item.user_answer.as_deref(), Some("JavaScript, Python, C#"));
        assert_eq!(item.correct_answer.as_deref(), Some("C#, Python, JavaScript"));
    }

    #[test]
    fn multiple_choice_partial_selection_is_wrong() {
        let catalog = vec![languages(1)];
        let summary = score(&catalog, &answers(&[(2, "5,6")]));

        assert_eq!(summary.items[0].is_correct, Some(false));
        assert_eq!(summary.stats.correct, 0);
    }

    #[test]
    fn free_text_is_attempted_but_ungraded() {
        let catalog = vec![phone(1)];
        let summary = score(&catalog, &answers(&[(4, "1234567890")]));

        let item = &summary.items[0];
        assert_eq!(item.is_correct, None);
        assert_eq!(item.user_answer.as_deref(), Some("1234567890"));
        assert_eq!(item.correct_answer, None);
        assert_eq!(summary.stats.total, 1);
        assert_eq!(summary.stats.attempted, 1);
        assert_eq!(summary.stats.correct, 0);
        assert_eq!(summary.stats.percentage, 0.0);
    }

    #[test]
    fn unanswered_questions_are_excluded() {
        let catalog = vec![capital_of_france(1), languages(2), phone(3)];
        let summary = score(&catalog, &answers(&[(2, "5,6,7")]));

        assert_eq!(summary.items.len(), 1);
        assert_eq!(
            summary.items[0].question_text,
            "Which of the following are programming languages?"
        );
    }

    #[test]
    fn items_come_back_in_catalog_order() {
        let catalog = vec![phone(9), capital_of_france(3), languages(5)];
        let summary = score(
            &catalog,
            &answers(&[(1, "1"), (2, "5,6,7"), (4, "1234567890")]),
        );

        let texts: Vec<&str> = summary
            .items
            .iter()
            .map(|i| i.question_text.as_str())
            .collect();
        assert_eq!(
            texts,
            vec![
                "What is the capital of France?",
                "Which of the following are programming languages?",
                "Enter your phone number",
            ]
        );
    }

    #[test]
    fn unknown_option_id_falls_back_to_raw_token() {
        let question = Question::new(
            QuestionId::new(7),
            1,
            "Pick one",
            QuestionType::SingleChoice,
            Some("42".to_string()),
            vec![option(1, 7, "Only option")],
        )
        .unwrap();
        let summary = score(&[question], &answers(&[(7, "42")]));

        let item = &summary.items[0];
        // "42" matches the stored encoding but no option row exists for it.
        assert_eq!(item.is_correct, Some(true));
        assert_eq!(item.user_answer.as_deref(), Some("42"));
        assert_eq!(item.correct_answer.as_deref(), Some("42"));
    }

    #[test]
    fn percentage_rounds_to_one_decimal() {
        let catalog = vec![capital_of_france(1), languages(2), phone(3)];
        let summary = score(
            &catalog,
            &answers(&[(1, "1"), (2, "5,8"), (4, "1234567890")]),
        );

        assert_eq!(summary.stats.total, 3);
        assert_eq!(summary.stats.attempted, 3);
        assert_eq!(summary.stats.correct, 1);
        assert_eq!(summary.stats.percentage, 33.3);
    }
}
