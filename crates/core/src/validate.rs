//! Per-question-type answer validation.
//!
//! Validation is a pure function from (question, raw answer) to a list of
//! human-readable error messages; an empty list means the answer is
//! accepted. Malformed input is a validation failure, never a fault: this
//! module does not panic or return `Err` for anything a client can type.

use std::collections::HashSet;

use crate::model::{Question, QuestionType};

/// Validates `answer` against the question's type and option set.
///
/// Messages are accumulated: a multiple-choice answer yields one error per
/// bad token. Callers resolve unknown question ids before dispatching here.
#[must_use]
pub fn validate_answer(question: &Question, answer: &str) -> Vec<String> {
    match question.question_type {
        QuestionType::SingleChoice => validate_single_choice(answer, &question.option_id_set()),
        QuestionType::MultipleChoice => validate_multiple_choice(answer, &question.option_id_set()),
        QuestionType::ShortAnswer => validate_short_answer(answer),
        QuestionType::PhoneNumber => validate_phone_number(answer),
        QuestionType::LongAnswer => validate_long_answer(answer),
    }
}

fn validate_single_choice(answer: &str, valid_ids: &HashSet<u64>) -> Vec<String> {
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        return vec!["Please select an option.".to_string()];
    }
    let Ok(selected) = trimmed.parse::<u64>() else {
        return vec!["Invalid option value.".to_string()];
    };
    if valid_ids.contains(&selected) {
        Vec::new()
    } else {
        vec!["Selected option is not valid for this question.".to_string()]
    }
}

fn validate_multiple_choice(answer: &str, valid_ids: &HashSet<u64>) -> Vec<String> {
    if answer.trim().is_empty() {
        return vec!["Please select at least one option.".to_string()];
    }

    // Empty tokens from doubled commas are dropped; whitespace-only tokens
    // survive the split and fail the parse below.
    let parts: Vec<&str> = answer.split(',').filter(|part| !part.is_empty()).collect();
    if parts.is_empty() {
        return vec!["Please select at least one option.".to_string()];
    }

    let mut errors = Vec::new();
    for part in parts {
        let token = part.trim();
        match token.parse::<u64>() {
            Ok(id) if valid_ids.contains(&id) => {}
            _ => errors.push(format!("Invalid option ID: {token}")),
        }
    }
    errors
}

fn validate_short_answer(answer: &str) -> Vec<String> {
    if answer.trim().is_empty() {
        vec!["Answer cannot be blank.".to_string()]
    } else {
        Vec::new()
    }
}

fn validate_phone_number(answer: &str) -> Vec<String> {
    let trimmed = answer.trim();
    let is_ten_digits = trimmed.len() == 10 && trimmed.bytes().all(|b| b.is_ascii_digit());
    if is_ten_digits {
        Vec::new()
    } else {
        vec!["Phone number must be exactly 10 digits.".to_string()]
    }
}

fn validate_long_answer(answer: &str) -> Vec<String> {
    if answer.trim().chars().count() >= 10 {
        Vec::new()
    } else {
        vec!["Answer must be at least 10 characters.".to_string()]
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
