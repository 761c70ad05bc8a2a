//! Typed-answer checking

use super::kana::normalize_kana;
use super::models::{CheckMode, CheckResult};
use crate::vocabulary::VocabularyItem;

/// True when `answer` spells `expected` once both are normalised
pub fn check_reading(expected: &str, answer: &str) -> bool {
    let answer = normalize_kana(answer);
    !answer.is_empty() && answer == normalize_kana(expected)
}

fn normalize_meaning(text: &str) -> String {
    let lowered = text.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    match lowered.strip_prefix("to ") {
        Some(rest) => rest.to_string(),
        None => lowered,
    }
}

/// True when `answer` matches any alternative listed in `expected`
///
/// Alternatives are separated by `,`, `;` or `/`, and a leading "to " on
/// verbs is optional on either side.
pub fn check_meaning(expected: &str, answer: &str) -> bool {
    let answer = normalize_meaning(answer);
    if answer.is_empty() {
        return false;
    }
    expected
        .split([',', ';', '/'])
        .map(normalize_meaning)
        .any(|alternative| !alternative.is_empty() && alternative == answer)
}

/// Check an answer against an item in the given mode
pub fn check_answer(item: &VocabularyItem, mode: CheckMode, answer: &str) -> CheckResult {
    match mode {
        CheckMode::Reading => CheckResult {
            correct: check_reading(&item.reading, answer),
            expected: item.reading.clone(),
        },
        CheckMode::Meaning => CheckResult {
            correct: check_meaning(&item.meaning, answer),
            expected: item.meaning.clone(),
        },
        // Typing the word in kana is accepted as well as the written form
        CheckMode::Spelling => CheckResult {
            correct: check_reading(&item.word, answer) || check_reading(&item.reading, answer),
            expected: item.word.clone(),
        },
    }
}
