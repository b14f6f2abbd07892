//! Rules the [`Assistant`](crate::Assistant) applies around the engine.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Caller-side limits for accepting word lists and recognizing images.
///
/// Like [`Assistant`](crate::Assistant) itself, a policy is configured by
/// chaining methods that consume it and return an updated copy.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use terminal_rs::Policy;
///
/// let policy = Policy::new()
///     .min_words(8)
///     .min_saved_words(10)
///     .ocr_timeout(Duration::from_secs(5));
///
/// assert_eq!(policy.required_words(), 8);
/// assert_eq!(policy.saved_words(), 10);
/// assert_eq!(policy.recognition_timeout(), Duration::from_secs(5));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", default)
)]
pub struct Policy {
    min_words: usize,
    min_saved_words: usize,
    ocr_timeout_ms: u64,
}

impl Default for Policy {
    fn default() -> Self {
        Policy {
            min_words: 6,
            min_saved_words: 6,
            ocr_timeout_ms: 3_000,
        }
    }
}

impl Policy {
    /// Creates a policy with default configuration.
    ///
    /// Defaults:
    /// 1. word lists need at least 6 words
    /// 2. solved games are saved when their list had at least 6 words
    /// 3. text recognition is abandoned after 3 seconds
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fewest words a list may have.
    pub fn min_words(self, min_words: usize) -> Self {
        Policy { min_words, ..self }
    }

    /// Sets the smallest word list a solved game is saved for. Smaller lists
    /// are still played.
    pub fn min_saved_words(self, min_saved_words: usize) -> Self {
        Policy {
            min_saved_words,
            ..self
        }
    }

    /// Sets how long to wait for text recognition. Durations too long to
    /// count in milliseconds are clamped.
    pub fn ocr_timeout(self, timeout: Duration) -> Self {
        Policy {
            ocr_timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ..self
        }
    }

    pub fn required_words(&self) -> usize {
        self.min_words
    }

    pub fn saved_words(&self) -> usize {
        self.min_saved_words
    }

    pub fn recognition_timeout(&self) -> Duration {
        Duration::from_millis(self.ocr_timeout_ms)
    }

    /// Reads a policy from a JSON file. Missing fields keep their defaults.
    #[cfg(feature = "serde")]
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let policy = Policy::new();
        assert_eq!(policy.required_words(), 6);
        assert_eq!(policy.saved_words(), 6);
        assert_eq!(policy.recognition_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn thresholds_are_separate() {
        let policy = Policy::new().min_words(2);
        assert_eq!(policy.required_words(), 2);
        assert_eq!(policy.saved_words(), 6);
    }

    #[test]
    fn huge_timeout_is_clamped() {
        let policy = Policy::new().ocr_timeout(Duration::MAX);
        assert_eq!(policy.recognition_timeout(), Duration::from_millis(u64::MAX));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json() {
        let policy: Policy = serde_json::from_str(r#"{ "min_words": 10 }"#).unwrap();
        assert_eq!(policy, Policy::new().min_words(10));

        let policy: Policy = serde_json::from_str(r#"{ "min_saved_words": 3 }"#).unwrap();
        assert_eq!(policy.saved_words(), 3);
        assert_eq!(policy.required_words(), 6);
    }
}
