//! Randomized subset selection for a quiz attempt.

use rand::seq::SliceRandom;
use rand::Rng;

use quiz_core::model::Question;

use crate::view::QuizQuestion;

/// Number of questions served per attempt.
pub const QUIZ_SET_SIZE: usize = 5;

/// Shuffles a copy of the catalog, takes the first `size` questions, and
/// re-numbers them with attempt-local positions `1..=k`.
///
/// A catalog smaller than `size` comes back whole. The RNG is a parameter
/// so tests can pass a seeded source; production callers pass
/// `rand::rng()` and accept that no two attempts are guaranteed identical.
#[must_use]
pub fn select_quiz_set<R: Rng + ?Sized>(
    mut catalog: Vec<Question>,
    size: usize,
    rng: &mut R,
) -> Vec<QuizQuestion> {
    catalog.as_mut_slice().shuffle(rng);
    catalog.truncate(size);

    catalog
        .iter()
        .enumerate()
        .map(|(idx, question)| {
            let position = u32::try_from(idx + 1).unwrap_or(u32::MAX);
            QuizQuestion::from_question(question, position)
        })
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuestionId, QuestionType};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn build_catalog(len: u64) -> Vec<Question> {
        (1..=len)
            .map(|id| {
                Question::new(
                    QuestionId::new(id),
                    u32::try_from(id).unwrap(),
                    format!("Question {id}"),
                    QuestionType::ShortAnswer,
                    None,
                    Vec::new(),
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn selects_exactly_five_distinct_questions() {
        let catalog = build_catalog(20);
        let mut rng = StdRng::seed_from_u64(7);

        let set = select_quiz_set(catalog.clone(), QUIZ_SET_SIZE, &mut rng);
        assert_eq!(set.len(), 5);

        let ids: HashSet<u64> = set.iter().map(|q| q.question_id.value()).collect();
        assert_eq!(ids.len(), 5);

        let catalog_ids: HashSet<u64> = catalog.iter().map(|q| q.id.value()).collect();
        assert!(ids.is_subset(&catalog_ids));
    }

    #[test]
    fn positions_run_from_one_with_no_gaps() {
        let catalog = build_catalog(20);
        let mut rng = StdRng::seed_from_u64(42);

        let set = select_quiz_set(catalog, QUIZ_SET_SIZE, &mut rng);
        let positions: Vec<u32> = set.iter().map(|q| q.position).collect();
        assert_eq!(positions, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn small_catalog_comes_back_whole() {
        let catalog = build_catalog(3);
        let mut rng = StdRng::seed_from_u64(1);

        let set = select_quiz_set(catalog, QUIZ_SET_SIZE, &mut rng);
        assert_eq!(set.len(), 3);

        let positions: Vec<u32> = set.iter().map(|q| q.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
    }

    #[test]
    fn empty_catalog_yields_empty_set() {
        let mut rng = StdRng::seed_from_u64(1);
        let set = select_quiz_set(Vec::new(), QUIZ_SET_SIZE, &mut rng);
        assert!(set.is_empty());
    }

    #[test]
    fn same_seed_selects_the_same_set() {
        let catalog = build_catalog(20);

        let mut rng_a = StdRng::seed_from_u64(99);
        let mut rng_b = StdRng::seed_from_u64(99);
        let set_a = select_quiz_set(catalog.clone(), QUIZ_SET_SIZE, &mut rng_a);
        let set_b = select_quiz_set(catalog, QUIZ_SET_SIZE, &mut rng_b);

        assert_eq!(set_a, set_b);
    }
}
