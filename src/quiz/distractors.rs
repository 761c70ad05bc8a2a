use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use super::kana::normalize_kana;

/// Pick up to `count` wrong answers from `pool`
///
/// Values equal to `correct` or to an already picked value (after
/// normalisation) are skipped, and no value is picked twice.
pub fn generate_distractors<R, S>(correct: &str, pool: &[S], count: usize, rng: &mut R) -> Vec<String>
where
    R: Rng + ?Sized,
    S: AsRef<str>,
{
    let mut candidates: Vec<&str> = pool.iter().map(|s| s.as_ref()).collect();
    candidates.shuffle(rng);

    let mut seen = HashSet::new();
    seen.insert(normalize_kana(correct));

    let mut picked = Vec::with_capacity(count);
    for candidate in candidates {
        if picked.len() == count {
            break;
        }
        let key = normalize_kana(candidate);
        if key.is_empty() || !seen.insert(key) {
            continue;
        }
        picked.push(candidate.to_string());
    }
    picked
}
