//! Ordering candidates by how evenly they split the rest of the list.
//!
//! Guessing a word partitions the other candidates by the feedback each would
//! produce. A guess whose largest partition is close to the average
//! partition size leaves fewer words in the worst case, so it is suggested
//! first. This is a cheap quadratic approximation, not a minimax search.

use itertools::Itertools;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::matches;

/// Scores `word` against the other words in `candidates`.
///
/// Every candidate different from `word` is bucketed by its positional match
/// count with `word`. The score is the size of the largest bucket minus the
/// average bucket size, rounded down. Lower is better. A word with no other
/// candidates to compare against scores zero.
///
/// # Examples
///
/// ```rust
/// use terminal_rs::game::rank::elimination_score;
///
/// let words = ["abcd", "abce", "abff", "zzzz"].map(String::from);
/// assert_eq!(elimination_score("abcd", &words), 0);
/// assert_eq!(elimination_score("abff", &words), 1);
/// ```
pub fn elimination_score(word: &str, candidates: &[String]) -> usize {
    let buckets = candidates
        .iter()
        .filter(|c| c.as_str() != word)
        .map(|c| matches(word, c))
        .counts();

    if buckets.is_empty() {
        return 0;
    }

    let max = buckets.values().copied().max().unwrap_or(0);
    let avg = buckets.values().sum::<usize>() / buckets.len();

    max - avg
}

/// Sorts `candidates` by ascending [`elimination_score()`].
///
/// The sort is stable, so words with equal scores keep their current
/// relative order.
pub fn rank(candidates: &mut Vec<String>) {
    let scores = scores(candidates.as_slice());

    let mut scored: Vec<(usize, String)> = scores.into_iter().zip(candidates.drain(..)).collect();
    scored.sort_by_key(|&(score, _)| score);

    candidates.extend(scored.into_iter().map(|(_, word)| word));
}

#[cfg(feature = "parallel")]
fn scores(candidates: &[String]) -> Vec<usize> {
    candidates
        .par_iter()
        .map(|word| elimination_score(word, candidates))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn scores(candidates: &[String]) -> Vec<usize> {
    candidates
        .iter()
        .map(|word| elimination_score(word, candidates))
        .collect()
}
