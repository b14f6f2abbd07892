//! Cleaning raw word lists before they reach a [`Session`](crate::Session).

use itertools::Itertools;

/// Marker left behind when digits are misrecognized.
const NAN_MARKER: &str = "NaN";

/// Characters that open a noise fragment rather than a word.
const BRACKETS: [char; 3] = ['(', '{', '['];

/// Cleans raw text lines into a candidate word list.
///
/// Every line is trimmed and lowercased. Empty lines, lines containing
/// `"NaN"` and lines starting with `(`, `{` or `[` are dropped. The remaining
/// words are deduplicated, keeping the first occurrence of each.
///
/// Word lengths are not checked here.
///
/// # Examples
///
/// ```rust
/// use terminal_rs::sanitize;
///
/// let words = sanitize(["ABLE", "(noise)", "able", "NaN-text"]);
/// assert_eq!(words, vec!["able"]);
/// ```
pub fn sanitize<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| {
            let line = line.as_ref().trim();
            // the marker is case sensitive, so check before lowercasing
            if is_noise(line) {
                None
            } else {
                Some(line.to_lowercase())
            }
        })
        .unique()
        .collect()
}

fn is_noise(line: &str) -> bool {
    match line.chars().next() {
        None => true,
        Some(first) => BRACKETS.contains(&first) || line.contains(NAN_MARKER),
    }
}
