use serde::Serialize;

use crate::model::question::QuestionType;

/// One scored line of a session summary.
///
/// `user_answer` and `correct_answer` are display values: for choice types
/// the option-id encodings are resolved to option text (falling back to the
/// raw id when no option matches), free-text answers pass through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryItem {
    pub question_text: String,
    pub question_type: QuestionType,
    pub user_answer: Option<String>,
    pub correct_answer: Option<String>,
    /// `Some(bool)` for graded (choice) questions, `None` for ungraded ones.
    pub is_correct: Option<bool>,
}

/// Aggregate counters over a session's answered questions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total: u32,
    pub attempted: u32,
    pub correct: u32,
    /// `correct / total * 100`, rounded to one decimal; `0` when total is 0.
    pub percentage: f64,
}

impl SummaryStats {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total: 0,
            attempted: 0,
            correct: 0,
            percentage: 0.0,
        }
    }

    /// Builds the counters, guarding the divide-by-zero on percentage.
    #[must_use]
    pub fn from_counts(total: u32, attempted: u32, correct: u32) -> Self {
        let percentage = if total > 0 {
            (f64::from(correct) / f64::from(total) * 100.0 * 10.0).round() / 10.0
        } else {
            0.0
        };
        Self {
            total,
            attempted,
            correct,
            percentage,
        }
    }
}

/// The scored end-of-session summary: one item per answered question, in
/// catalog order, plus aggregate stats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizSummary {
    pub items: Vec<SummaryItem>,
    pub stats: SummaryStats,
}

impl QuizSummary {
    /// The empty summary returned for a session with no stored answers.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            stats: SummaryStats::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_total_guards_division() {
        let stats = SummaryStats::from_counts(0, 0, 0);
        assert_eq!(stats.percentage, 0.0);
    }

    #[test]
    fn percentage_rounds_to_one_decimal() {
        let stats = SummaryStats::from_counts(3, 3, 1);
        assert_eq!(stats.percentage, 33.3);

        let stats = SummaryStats::from_counts(3, 3, 2);
        assert_eq!(stats.percentage, 66.7);

        let stats = SummaryStats::from_counts(5, 5, 5);
        assert_eq!(stats.percentage, 100.0);
    }
}
