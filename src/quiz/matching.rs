//! Matching game rounds

use rand::seq::SliceRandom;
use rand::Rng;

use super::models::{MatchingCard, MatchingRound, QuizError, MIN_QUIZ_ITEMS};
use crate::vocabulary::VocabularyItem;

/// Pick `pair_count` items and lay out word and meaning cards
///
/// The right-hand column is shuffled independently of the left, so card
/// positions say nothing about which cards belong together.
pub fn build_matching_round<R: Rng + ?Sized>(
    items: &[VocabularyItem],
    pair_count: usize,
    rng: &mut R,
) -> Result<MatchingRound, QuizError> {
    if items.len() < MIN_QUIZ_ITEMS || pair_count < MIN_QUIZ_ITEMS {
        return Err(QuizError::NotEnoughVocabulary {
            needed: MIN_QUIZ_ITEMS,
            available: items.len().min(pair_count),
        });
    }

    let chosen: Vec<&VocabularyItem> = items.choose_multiple(&mut *rng, pair_count).collect();
    let left: Vec<MatchingCard> = chosen
        .iter()
        .map(|item| MatchingCard {
            vocabulary_id: item.id,
            text: item.word.clone(),
        })
        .collect();
    let mut right: Vec<MatchingCard> = chosen
        .iter()
        .map(|item| MatchingCard {
            vocabulary_id: item.id,
            text: item.meaning.clone(),
        })
        .collect();
    right.shuffle(rng);

    Ok(MatchingRound { left, right })
}

pub fn is_matching_pair(left: &MatchingCard, right: &MatchingCard) -> bool {
    left.vocabulary_id == right.vocabulary_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::questions::tests::animals;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_round_pairs_every_card() {
        let items = animals();
        let mut rng = StdRng::seed_from_u64(21);
        let round = build_matching_round(&items, 4, &mut rng).unwrap();
        assert_eq!(round.left.len(), 4);
        assert_eq!(round.right.len(), 4);

        for card in &round.left {
            let partners: Vec<_> = round
                .right
                .iter()
                .filter(|r| is_matching_pair(card, r))
                .collect();
            assert_eq!(partners.len(), 1);
            let item = items.iter().find(|i| i.id == card.vocabulary_id).unwrap();
            assert_eq!(card.text, item.word);
            assert_eq!(partners[0].text, item.meaning);
        }
    }

    #[test]
    fn test_pair_count_capped_by_items() {
        let items = animals();
        let mut rng = StdRng::seed_from_u64(2);
        let round = build_matching_round(&items, 12, &mut rng).unwrap();
        assert_eq!(round.left.len(), items.len());
    }

    #[test]
    fn test_wrong_pair_rejected() {
        let items = animals();
        let mut rng = StdRng::seed_from_u64(8);
        let round = build_matching_round(&items, 2, &mut rng).unwrap();
        let wrong = round
            .right
            .iter()
            .find(|r| r.vocabulary_id != round.left[0].vocabulary_id)
            .unwrap();
        assert!(!is_matching_pair(&round.left[0], wrong));
    }

    #[test]
    fn test_single_item_rejected() {
        let items = animals()[..1].to_vec();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(build_matching_round(&items, 4, &mut rng).is_err());
    }
}
