//! Multiple-choice and listening questions

use rand::seq::SliceRandom;
use rand::Rng;

use super::distractors::generate_distractors;
use super::models::*;
use crate::vocabulary::VocabularyItem;

fn ensure_enough(items: &[VocabularyItem]) -> Result<(), QuizError> {
    if items.len() < MIN_QUIZ_ITEMS {
        return Err(QuizError::NotEnoughVocabulary {
            needed: MIN_QUIZ_ITEMS,
            available: items.len(),
        });
    }
    Ok(())
}

/// Shuffle the correct answer in among the distractors
fn assemble_options<R: Rng + ?Sized>(
    correct: &str,
    pool: &[&str],
    option_count: usize,
    rng: &mut R,
) -> Result<(Vec<String>, usize), QuizError> {
    let mut options =
        generate_distractors(correct, pool, option_count.saturating_sub(1), &mut *rng);
    if options.is_empty() {
        return Err(QuizError::NoDistinctAnswers(correct.to_string()));
    }

    let correct_index = rng.gen_range(0..=options.len());
    options.insert(correct_index, correct.to_string());
    Ok((options, correct_index))
}

/// Build up to `count` questions on distinct random targets.
///
/// Targets whose answer is shared by every other item are skipped; the
/// batch only fails when no target yields a question.
fn collect_questions<'a, R, Q, F>(
    items: &'a [VocabularyItem],
    count: usize,
    rng: &mut R,
    mut build: F,
) -> Result<Vec<Q>, QuizError>
where
    R: Rng + ?Sized,
    F: FnMut(&'a VocabularyItem, &mut R) -> Result<Q, QuizError>,
{
    ensure_enough(items)?;
    let mut targets: Vec<&VocabularyItem> = items.iter().collect();
    targets.shuffle(&mut *rng);

    let mut questions = Vec::with_capacity(count.min(targets.len()));
    let mut skipped = None;
    for target in targets {
        if questions.len() == count {
            break;
        }
        match build(target, &mut *rng) {
            Ok(question) => questions.push(question),
            Err(err @ QuizError::NoDistinctAnswers(_)) => skipped = Some(err),
            Err(err) => return Err(err),
        }
    }

    match skipped {
        Some(err) if questions.is_empty() => Err(err),
        _ => Ok(questions),
    }
}

fn prompt_text(item: &VocabularyItem, direction: QuizDirection) -> &str {
    match direction {
        QuizDirection::WordToMeaning => &item.word,
        QuizDirection::MeaningToWord => &item.meaning,
        QuizDirection::ReadingToWord => &item.reading,
    }
}

fn answer_text(item: &VocabularyItem, direction: QuizDirection) -> &str {
    match direction {
        QuizDirection::WordToMeaning => &item.meaning,
        QuizDirection::MeaningToWord | QuizDirection::ReadingToWord => &item.word,
    }
}

/// Build one question about `target`, taking distractors from `items`
pub fn build_multiple_choice<R: Rng + ?Sized>(
    items: &[VocabularyItem],
    target: &VocabularyItem,
    direction: QuizDirection,
    option_count: usize,
    rng: &mut R,
) -> Result<MultipleChoiceQuestion, QuizError> {
    ensure_enough(items)?;

    let pool: Vec<&str> = items
        .iter()
        .filter(|i| i.id != target.id)
        .map(|i| answer_text(i, direction))
        .collect();
    let (options, correct_index) =
        assemble_options(answer_text(target, direction), &pool, option_count, rng)?;

    Ok(MultipleChoiceQuestion {
        vocabulary_id: target.id,
        direction,
        prompt: prompt_text(target, direction).to_string(),
        options,
        correct_index,
    })
}

/// Up to `count` questions on distinct items picked at random
pub fn build_multiple_choice_quiz<R: Rng + ?Sized>(
    items: &[VocabularyItem],
    count: usize,
    direction: QuizDirection,
    option_count: usize,
    rng: &mut R,
) -> Result<Vec<MultipleChoiceQuestion>, QuizError> {
    collect_questions(items, count, rng, |target, rng| {
        build_multiple_choice(items, target, direction, option_count, rng)
    })
}

/// Speak the reading of `target` and ask for its written form
pub fn build_listening_question<R: Rng + ?Sized>(
    items: &[VocabularyItem],
    target: &VocabularyItem,
    option_count: usize,
    rng: &mut R,
) -> Result<ListeningQuestion, QuizError> {
    ensure_enough(items)?;

    let pool: Vec<&str> = items
        .iter()
        .filter(|i| i.id != target.id)
        .map(|i| i.word.as_str())
        .collect();
    let (options, correct_index) = assemble_options(&target.word, &pool, option_count, rng)?;

    Ok(ListeningQuestion {
        vocabulary_id: target.id,
        prompt: target.reading.clone(),
        options,
        correct_index,
    })
}

pub fn build_listening_quiz<R: Rng + ?Sized>(
    items: &[VocabularyItem],
    count: usize,
    option_count: usize,
    rng: &mut R,
) -> Result<Vec<ListeningQuestion>, QuizError> {
    collect_questions(items, count, rng, |target, rng| {
        build_listening_question(items, target, option_count, rng)
    })
}
