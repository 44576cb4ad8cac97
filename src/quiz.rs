use std::collections::HashMap;

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::model::Flashcard;

/// Multiple choice needs the correct answer plus three distractors drawn from
/// other cards, so a set must have at least four cards.
pub const MIN_CARDS: usize = 4;

const DISTRACTOR_COUNT: usize = 3;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("need at least {MIN_CARDS} cards for multiple choice, this set has {have}")]
    NotEnoughCards { have: usize },
}

/// One multiple-choice question derived from a card. Ephemeral: recomputed
/// per session, never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    pub card_id: String,
    pub prompt: String,
    pub correct: String,
    pub options: Vec<String>,
}

/// Answer options for the card at `index`: its back plus three distractors
/// sampled without replacement from the other cards' backs, then shuffled.
/// Uniform Fisher-Yates throughout, not the comparator-sort shuffle.
pub fn build_options(
    cards: &[Flashcard],
    index: usize,
    rng: &mut impl Rng,
) -> Result<Vec<String>, QuizError> {
    if cards.len() < MIN_CARDS {
        return Err(QuizError::NotEnoughCards { have: cards.len() });
    }

    let others: Vec<&str> = cards
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, card)| card.back.as_str())
        .collect();

    let mut options: Vec<String> = others
        .choose_multiple(rng, DISTRACTOR_COUNT)
        .map(|back| back.to_string())
        .collect();
    options.push(cards[index].back.clone());
    options.shuffle(rng);
    Ok(options)
}

pub fn build_question(
    cards: &[Flashcard],
    index: usize,
    rng: &mut impl Rng,
) -> Result<Question, QuizError> {
    let options = build_options(cards, index, rng)?;
    let card = &cards[index];
    Ok(Question {
        card_id: card.id.clone(),
        prompt: card.front.clone(),
        correct: card.back.clone(),
        options,
    })
}

/// One question per card, in card order. Used by the practice test.
pub fn build_questions(
    cards: &[Flashcard],
    rng: &mut impl Rng,
) -> Result<Vec<Question>, QuizError> {
    // Guard up front: mapping over an empty deck would never reach the
    // per-question check and hand back an empty test.
    if cards.len() < MIN_CARDS {
        return Err(QuizError::NotEnoughCards { have: cards.len() });
    }
    (0..cards.len())
        .map(|i| build_question(cards, i, rng))
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TestScore {
    pub correct: usize,
    pub total: usize,
    pub percentage: u32,
}

/// Aggregate recorded answers (keyed by question card id) into a score.
/// No partial credit; unanswered questions count as wrong.
pub fn score_test(questions: &[Question], answers: &HashMap<String, String>) -> TestScore {
    let total = questions.len();
    let correct = questions
        .iter()
        .filter(|q| answers.get(&q.card_id).is_some_and(|a| *a == q.correct))
        .count();
    let percentage = if total == 0 {
        0
    } else {
        (100.0 * correct as f64 / total as f64).round() as u32
    };
    TestScore {
        correct,
        total,
        percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn card(id: &str, front: &str, back: &str) -> Flashcard {
        let now = Utc::now();
        Flashcard {
            id: id.to_string(),
            set_id: "set-1".to_string(),
            front: front.to_string(),
            back: back.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn deck(n: usize) -> Vec<Flashcard> {
        (0..n)
            .map(|i| card(&format!("c{i}"), &format!("front {i}"), &format!("back {i}")))
            .collect()
    }

    #[test]
    fn test_too_few_cards_is_an_error() {
        let mut rng = SmallRng::seed_from_u64(1);
        for n in 0..MIN_CARDS {
            let result = build_options(&deck(n), 0, &mut rng);
            assert_eq!(result, Err(QuizError::NotEnoughCards { have: n }));
        }
    }

    #[test]
    fn test_options_shape() {
        let cards = deck(8);
        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            for index in 0..cards.len() {
                let options = build_options(&cards, index, &mut rng).unwrap();
                assert_eq!(options.len(), 4);

                // Correct answer appears exactly once (backs are unique here).
                let correct = &cards[index].back;
                assert_eq!(options.iter().filter(|o| *o == correct).count(), 1);

                // Distractors come from other cards' backs, no repeats.
                let backs: Vec<&String> = cards.iter().map(|c| &c.back).collect();
                let mut seen = std::collections::HashSet::new();
                for option in &options {
                    assert!(backs.contains(&option));
                    assert!(seen.insert(option), "duplicate option {option}");
                }
            }
        }
    }

    #[test]
    fn test_minimum_deck_uses_every_other_back() {
        let cards = deck(4);
        let mut rng = SmallRng::seed_from_u64(7);
        let mut options = build_options(&cards, 2, &mut rng).unwrap();
        options.sort();
        let mut expected: Vec<String> = cards.iter().map(|c| c.back.clone()).collect();
        expected.sort();
        assert_eq!(options, expected);
    }

    #[test]
    fn test_question_fields_come_from_card() {
        let cards = deck(5);
        let mut rng = SmallRng::seed_from_u64(3);
        let q = build_question(&cards, 1, &mut rng).unwrap();
        assert_eq!(q.card_id, "c1");
        assert_eq!(q.prompt, "front 1");
        assert_eq!(q.correct, "back 1");
        assert!(q.options.contains(&q.correct));
    }

    #[test]
    fn test_small_decks_make_no_test() {
        let mut rng = SmallRng::seed_from_u64(5);
        for n in 0..MIN_CARDS {
            let result = build_questions(&deck(n), &mut rng);
            assert_eq!(result, Err(QuizError::NotEnoughCards { have: n }));
        }
    }

    #[test]
    fn test_questions_follow_card_order() {
        let cards = deck(6);
        let mut rng = SmallRng::seed_from_u64(9);
        let questions = build_questions(&cards, &mut rng).unwrap();
        assert_eq!(questions.len(), 6);
        for (q, c) in questions.iter().zip(&cards) {
            assert_eq!(q.card_id, c.id);
        }
    }

    #[test]
    fn test_score_three_of_five_is_sixty_percent() {
        let cards = deck(5);
        let mut rng = SmallRng::seed_from_u64(11);
        let questions = build_questions(&cards, &mut rng).unwrap();

        let mut answers = HashMap::new();
        for q in &questions[..3] {
            answers.insert(q.card_id.clone(), q.correct.clone());
        }
        answers.insert(questions[3].card_id.clone(), "wrong".to_string());
        // Question 4 left unanswered.

        let score = score_test(&questions, &answers);
        assert_eq!(score.correct, 3);
        assert_eq!(score.total, 5);
        assert_eq!(score.percentage, 60);
    }

    #[test]
    fn test_score_rounds_to_nearest_percent() {
        let cards = deck(6);
        let mut rng = SmallRng::seed_from_u64(13);
        let questions = build_questions(&cards, &mut rng).unwrap();

        let mut answers = HashMap::new();
        answers.insert(questions[0].card_id.clone(), questions[0].correct.clone());
        // 1/6 = 16.67 -> 17
        assert_eq!(score_test(&questions, &answers).percentage, 17);
    }

    #[test]
    fn test_score_empty_test_is_zero() {
        let score = score_test(&[], &HashMap::new());
        assert_eq!(score.percentage, 0);
        assert_eq!(score.total, 0);
    }
}
