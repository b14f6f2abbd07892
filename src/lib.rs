#![doc = include_str!("../README.md")]

// Required to rename serde
#[cfg(feature = "serde")]
extern crate serde_crate as serde;

use thiserror::Error;

pub mod sanitize;
pub use sanitize::sanitize;

pub mod ocr;
pub use ocr::{reconstruct_word_list, Recognizer};

pub mod hash;
pub use hash::{compute_words_hash, WordsHash};

pub mod game;
pub use game::{Attempt, Session, State};

pub mod registry;
pub use registry::Registry;

pub mod store;
pub use store::{AnswerStore, CompletedGame, MemoryStore};

pub mod policy;
pub use policy::Policy;

pub mod assistant;
pub use assistant::{Assistant, GameStart, Turn};

pub mod stats;

/// A [`Result`](std::result::Result) with [`TerminalError`] as its error type.
pub type Result<T> = std::result::Result<T, TerminalError>;

/// The errors that `terminal_rs` can produce.
#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("the word list was rejected")]
    Validation {
        #[from]
        kind: ValidationError,
    },

    #[error("the answer store encountered an error")]
    Store {
        #[from]
        kind: StoreError,
    },

    #[error("text recognition failed")]
    Recognition {
        #[from]
        kind: RecognizeError,
    },

    #[error("the player has no game in progress")]
    NoActiveGame,

    #[error("general IO error")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("trouble serializing or deserializing")]
    Serde(#[from] serde_json::Error),
}

/// Problems with a submitted word list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The words in the list do not all have the same length.
    #[error("every word in the list must have the same length")]
    InvalidWordLength,

    /// The list is shorter than the minimum the caller accepts.
    #[error("the word list has {found} words, but at least {required} are needed")]
    TooFewWords { found: usize, required: usize },
}

/// Failures reported by an [`AnswerStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("the answer store is unavailable: {0}")]
    Unavailable(String),

    #[error("the answer store rejected the record: {0}")]
    Rejected(String),
}

/// Failures reported while recognizing text from an image.
#[derive(Debug, Error)]
pub enum RecognizeError {
    /// Recognition did not finish before the deadline.
    #[error("extracting text from the image took too long")]
    Timeout,

    #[error("the recognition service returned no results")]
    NoResults,

    #[error("the recognition service failed: {0}")]
    Service(String),
}
