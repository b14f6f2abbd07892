//! Order-independent fingerprints of word lists.
//!
//! The same puzzle shows up for many players with its words in a different
//! order. Hashing the sorted list gives every copy of a puzzle one key, under
//! which the answer found by a previous player can be stored and looked up.

use std::{fmt::Display, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A hex encoded SHA-256 fingerprint of a word list.
///
/// Produced by [`compute_words_hash()`]. It is an opaque lookup key. For
/// words without whitespace, which is all a sanitized puzzle list holds,
/// two lists have the same hash exactly when they contain the same words
/// the same number of times. Words are joined with spaces, so `["a b"]` and
/// `["a", "b"]` collide.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", transparent)
)]
pub struct WordsHash(String);

impl WordsHash {
    /// The number of hex characters in a hash.
    pub const LEN: usize = 64;

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for WordsHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for WordsHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The error returned when parsing a [`WordsHash`] that is not 64 lowercase
/// hex characters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{0}\" is not a words hash")]
pub struct ParseWordsHashError(String);

impl FromStr for WordsHash {
    type Err = ParseWordsHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = s.len() == Self::LEN
            && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if valid {
            Ok(WordsHash(s.to_string()))
        } else {
            Err(ParseWordsHashError(s.to_string()))
        }
    }
}

/// Computes the canonical hash of a word list.
///
/// The words are sorted by their bytes, each is followed by a single space,
/// and the SHA-256 digest of the result is hex encoded. Duplicates are not
/// removed, so they change the hash; deduplicate with
/// [`sanitize()`](crate::sanitize) first if that is not wanted.
///
/// # Examples
///
/// ```rust
/// use terminal_rs::compute_words_hash;
///
/// let a = compute_words_hash(["abcd", "efgh", "ijkl"]);
/// let b = compute_words_hash(["ijkl", "abcd", "efgh"]);
/// assert_eq!(a, b);
/// assert_eq!(a.as_str().len(), 64);
/// ```
pub fn compute_words_hash<I, S>(words: I) -> WordsHash
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut sorted: Vec<S> = words.into_iter().collect();
    sorted.sort_unstable_by(|a, b| a.as_ref().as_bytes().cmp(b.as_ref().as_bytes()));

    let mut hasher = Sha256::new();
    for word in &sorted {
        hasher.update(word.as_ref().as_bytes());
        hasher.update(b" ");
    }

    WordsHash(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn known_digest() {
        // sha256 of "abcd efgh "
        let hash = compute_words_hash(["efgh", "abcd"]);
        let mut hasher = Sha256::new();
        hasher.update(b"abcd efgh ");
        assert_eq!(hash.as_str(), hex::encode(hasher.finalize()));
    }

    #[test]
    fn empty_list() {
        // sha256 of the empty string
        assert_eq!(
            compute_words_hash(Vec::<String>::new()).as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn permutation_invariant() {
        assert_eq!(
            compute_words_hash(["abcd", "efgh", "ijkl"]),
            compute_words_hash(["ijkl", "abcd", "efgh"])
        );
    }

    #[test]
    fn one_letter_changes_hash() {
        let base = compute_words_hash(["abcd", "efgh", "ijkl"]);
        assert_ne!(base, compute_words_hash(["abce", "efgh", "ijkl"]));
        assert_ne!(base, compute_words_hash(["abcd", "efgh", "ijkm"]));
        assert_ne!(base, compute_words_hash(["abcd", "efgh", "jjkl"]));
    }

    #[test]
    fn duplicates_matter() {
        assert_ne!(
            compute_words_hash(["abcd", "efgh"]),
            compute_words_hash(["abcd", "abcd", "efgh"])
        );
    }

    #[test]
    fn spaces_inside_words_collide() {
        assert_eq!(compute_words_hash(["a b"]), compute_words_hash(["a", "b"]));
    }

    #[test]
    fn parses_own_output() {
        let hash = compute_words_hash(["abcd"]);
        assert_eq!(hash.as_str().parse::<WordsHash>(), Ok(hash.clone()));
        assert!("abc".parse::<WordsHash>().is_err());
        assert!(hash.as_str().to_uppercase().parse::<WordsHash>().is_err());
    }

    proptest! {
        #[test]
        fn any_order_same_hash(
            words in proptest::collection::vec("[a-z]{4,8}", 0..20),
            seed in any::<u64>()
        ) {
            let mut shuffled = words.clone();
            // deterministic rotate plus reverse stands in for a shuffle
            if !shuffled.is_empty() {
                let k = (seed as usize) % shuffled.len();
                shuffled.rotate_left(k);
            }
            if seed % 2 == 0 {
                shuffled.reverse();
            }

            prop_assert_eq!(compute_words_hash(&words), compute_words_hash(&shuffled));
        }
    }
}
