//! The elimination engine for a single puzzle.
//!
//! A [`Session`] starts from the word list shown by the puzzle. Each time the
//! player tries a word, the puzzle reports how many letters sit in the right
//! position, and every candidate that would have produced a different count
//! is eliminated. The survivors are re-ranked so that the first one is the
//! suggested next guess.

use std::fmt::Display;

use log::{debug, warn};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ValidationError;

pub mod rank;

/// Counts the positions at which `a` and `b` have the same character.
///
/// Letters present elsewhere in the word earn nothing. The words are
/// compared up to the length of the shorter one.
///
/// # Examples
///
/// ```rust
/// use terminal_rs::game::matches;
///
/// assert_eq!(matches("hack", "hawk"), 3);
/// assert_eq!(matches("abcd", "dcba"), 0);
/// ```
pub fn matches(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).filter(|(a, b)| a == b).count()
}

fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Where a [`Session`] stands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub enum State {
    /// More than one candidate remains.
    Active,

    /// Exactly one candidate remains; it is the target.
    Solved,

    /// No candidate is consistent with the reported attempts. One of the
    /// reported match counts was probably wrong.
    Contradiction,
}

/// A word the player tried together with the number of letters the puzzle
/// reported in the correct position.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Attempt {
    guess: String,
    exact_matches: usize,
}

impl Attempt {
    /// Creates an attempt, normalizing the guess like session words.
    pub fn new(guess: &str, exact_matches: usize) -> Self {
        Attempt {
            guess: normalize(guess),
            exact_matches,
        }
    }

    pub fn guess(&self) -> &str {
        &self.guess
    }

    pub fn exact_matches(&self) -> usize {
        self.exact_matches
    }

    /// Returns true if `candidate` could have produced this attempt's
    /// feedback.
    pub fn admits(&self, candidate: &str) -> bool {
        matches(candidate, &self.guess) == self.exact_matches
    }
}

impl Display for Attempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.guess, self.exact_matches)
    }
}

/// One player's puzzle in progress.
///
/// Create it with [`Session::create()`] and report each try with
/// [`submit_attempt()`](Session::submit_attempt()). The session does no
/// locking; whoever owns it must make sure only one caller mutates it at a
/// time (see [`Registry`](crate::Registry)).
///
/// # Examples
///
/// ```rust
/// use terminal_rs::{Session, State};
///
/// let mut session = Session::create(["able", "acid", "aged", "airy", "also", "arch"])?;
/// assert_eq!(session.state(), State::Active);
///
/// // "able" has one letter in place compared to "arch"
/// session.submit_attempt("able", 1);
/// session.submit_attempt("acid", 1);
/// session.submit_attempt("aged", 1);
/// session.submit_attempt("airy", 1);
/// session.submit_attempt("also", 1);
///
/// assert_eq!(session.state(), State::Solved);
/// assert_eq!(session.target(), Some("arch"));
/// assert_eq!(session.attempts_count(), 6);
/// #
/// # Ok::<_, terminal_rs::ValidationError>(())
/// ```
///
/// A deserialized session is rebuilt from its initial words and attempts,
/// so it passes the same checks as [`Session::create()`]. The stored
/// candidates and word length are recomputed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", try_from = "SessionParts")
)]
pub struct Session {
    initial_words: Vec<String>,
    available_words: Vec<String>,
    attempts: Vec<Attempt>,
    word_len: usize,
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
#[serde(crate = "serde_crate")]
struct SessionParts {
    initial_words: Vec<String>,
    #[serde(default)]
    attempts: Vec<Attempt>,
}

#[cfg(feature = "serde")]
impl TryFrom<SessionParts> for Session {
    type Error = ValidationError;

    fn try_from(parts: SessionParts) -> Result<Self, Self::Error> {
        let mut session = Session::create(parts.initial_words)?;
        for attempt in parts.attempts {
            session.submit_attempt(&attempt.guess, attempt.exact_matches);
        }
        Ok(session)
    }
}

impl Session {
    /// Starts a session from the puzzle's word list.
    ///
    /// Words are trimmed and lowercased. Returns
    /// [`ValidationError::InvalidWordLength`] if they do not all have the
    /// same length afterwards. The list is ranked before this returns.
    ///
    /// A minimum list size is not enforced here; callers that want one
    /// should report [`ValidationError::TooFewWords`] themselves.
    pub fn create<I, S>(words: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let initial_words: Vec<String> = words.into_iter().map(|w| normalize(w.as_ref())).collect();

        let word_len = initial_words
            .first()
            .map(|w| w.chars().count())
            .unwrap_or(0);
        if initial_words.iter().any(|w| w.chars().count() != word_len) {
            return Err(ValidationError::InvalidWordLength);
        }

        let mut available_words = initial_words.clone();
        rank::rank(&mut available_words);
        debug!(
            "created session with {} words of length {}",
            initial_words.len(),
            word_len
        );

        Ok(Session {
            initial_words,
            available_words,
            attempts: Vec::new(),
            word_len,
        })
    }

    /// Records an attempt and eliminates every candidate inconsistent with it.
    ///
    /// The remaining candidates are re-ranked. Returns the resulting
    /// [`State`]; reaching [`State::Contradiction`] is not an error and
    /// nothing is rolled back.
    pub fn submit_attempt(&mut self, guess: &str, exact_matches: usize) -> State {
        let attempt = Attempt::new(guess, exact_matches);

        // earlier attempts already hold for every remaining word
        let before = self.available_words.len();
        self.available_words.retain(|word| attempt.admits(word));
        rank::rank(&mut self.available_words);
        debug!(
            "attempt {} left {} of {} candidates",
            attempt,
            self.available_words.len(),
            before
        );

        self.attempts.push(attempt);

        let state = self.state();
        if state == State::Contradiction {
            warn!("no candidates are consistent with {} attempts", self.attempts.len());
        }
        state
    }

    /// The words still consistent with every attempt, best guess first.
    pub fn available_words(&self) -> &[String] {
        &self.available_words
    }

    /// The suggested next guess, if any candidate remains.
    pub fn suggestion(&self) -> Option<&str> {
        self.available_words.first().map(String::as_str)
    }

    /// The normalized word list the session started from, in its original
    /// order.
    pub fn initial_words(&self) -> &[String] {
        &self.initial_words
    }

    /// Every attempt recorded so far, oldest first.
    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    /// The length shared by every word in the session.
    pub fn word_len(&self) -> usize {
        self.word_len
    }

    /// The answer, once exactly one candidate remains.
    pub fn target(&self) -> Option<&str> {
        match self.available_words.as_slice() {
            [target] => Some(target.as_str()),
            _ => None,
        }
    }

    /// The number of tries it took to find the target, for statistics.
    ///
    /// Attempts that matched every letter are not counted, and one is added
    /// for the confirming guess itself.
    pub fn attempts_count(&self) -> usize {
        self.attempts
            .iter()
            .filter(|a| a.exact_matches != self.word_len)
            .count()
            + 1
    }

    pub fn state(&self) -> State {
        match self.available_words.len() {
            0 => State::Contradiction,
            1 => State::Solved,
            _ => State::Active,
        }
    }
}
