//! Remembering solved puzzles.
//!
//! The engine itself never persists anything. Callers hand finished games to
//! an [`AnswerStore`], and look up the answer of a word list that has been
//! solved before by its [`WordsHash`].

use std::{
    sync::{Mutex, PoisonError},
    time::{SystemTime, UNIX_EPOCH},
};

#[cfg(feature = "serde")]
use std::{fs, path::Path};

use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{compute_words_hash, Session, StoreError, WordsHash};

/// Storage for finished games, owned by the caller.
///
/// A lookup that finds nothing is `Ok(None)`, not an error. Implementations
/// do their own retrying, if any.
pub trait AnswerStore: Send + Sync {
    /// Finds the target of a previously solved puzzle with this word list.
    fn find_answer_by_hash(&self, hash: &WordsHash) -> Result<Option<String>, StoreError>;

    /// Records a solved puzzle.
    fn save_completed_game(&self, game: CompletedGame) -> Result<(), StoreError>;
}

/// A solved puzzle, as handed to an [`AnswerStore`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct CompletedGame {
    pub player: String,
    pub words: Vec<String>,
    pub target: String,
    pub attempts: usize,
    pub words_hash: WordsHash,
    /// Seconds since the UNIX epoch.
    pub created_at: u64,
}

impl CompletedGame {
    /// Builds the record of a solved session.
    ///
    /// Returns `None` while the session has no target.
    pub fn from_session(player: impl Into<String>, session: &Session) -> Option<Self> {
        let target = session.target()?;
        let words = session.initial_words().to_vec();

        Some(CompletedGame {
            player: player.into(),
            words_hash: compute_words_hash(&words),
            words,
            target: target.to_string(),
            attempts: session.attempts_count(),
            created_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default(),
        })
    }
}

/// An [`AnswerStore`] that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    games: Mutex<Vec<CompletedGame>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already knows about `games`.
    pub fn with_games(games: Vec<CompletedGame>) -> Self {
        MemoryStore {
            games: Mutex::new(games),
        }
    }

    /// Every game saved so far, oldest first.
    pub fn games(&self) -> Vec<CompletedGame> {
        self.games
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AnswerStore for MemoryStore {
    fn find_answer_by_hash(&self, hash: &WordsHash) -> Result<Option<String>, StoreError> {
        let games = self.games.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(games
            .iter()
            .find(|g| &g.words_hash == hash)
            .map(|g| g.target.clone()))
    }

    fn save_completed_game(&self, game: CompletedGame) -> Result<(), StoreError> {
        if game.target.is_empty() {
            return Err(StoreError::Rejected("game has no target".into()));
        }
        debug!("saving game of {} with target {}", game.player, game.target);
        self.games
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(game);
        Ok(())
    }
}

/// An export of finished games.
#[cfg(feature = "serde")]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(crate = "serde_crate")]
pub struct Dataset {
    pub total_games: usize,
    pub games: Vec<CompletedGame>,
}

#[cfg(feature = "serde")]
impl Dataset {
    /// Collects games, newest first.
    pub fn from_games(mut games: Vec<CompletedGame>) -> Self {
        games.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Dataset {
            total_games: games.len(),
            games,
        }
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes the dataset as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}
