//! Driving games for many players at once.
//!
//! [`Assistant`] is what a chat bot or other front end talks to. It turns
//! incoming word lists, recognized screenshots and attempts into engine
//! calls, keeps each player's [`Session`] in a [`Registry`], and consults an
//! [`AnswerStore`] for puzzles that were solved before.

use std::{fmt::Display, hash::Hash, sync::Arc};

use log::{info, warn};

use crate::{
    compute_words_hash,
    ocr::{extract_words, split_recognized_text},
    sanitize, AnswerStore, CompletedGame, Policy, Recognizer, Registry, Result, Session, State,
    StoreError, TerminalError, ValidationError, WordsHash,
};

/// What the player sees after submitting a word list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameStart {
    /// The candidates, best guess first.
    pub words: Vec<String>,

    /// The answer recorded the last time this word list was solved.
    pub hint: Option<String>,

    pub words_hash: WordsHash,

    /// [`State::Active`] for a game in progress. A list that is already
    /// decided, a single word or no words at all, ends the game at once and
    /// nothing is registered for the player.
    pub state: State,
}

/// What happened to a solved game's record.
#[derive(Debug)]
pub enum Record {
    Saved,

    /// The word list was smaller than [`Policy::saved_words()`].
    Skipped,

    Failed(StoreError),
}

/// The outcome of an attempt.
#[derive(Debug)]
pub enum Turn {
    /// Several candidates remain, best guess first.
    Continue(Vec<String>),

    /// One candidate remains. The game is over.
    Solved {
        target: String,
        attempts: usize,
        record: Record,
    },

    /// No candidate fits the reported attempts. The game is over and the
    /// player should recheck what they entered.
    Contradiction,
}

/// Game coordination for any number of players.
///
/// `K` identifies a player, and `S` is where solved games go.
///
/// # Examples
///
/// ```rust
/// use terminal_rs::{Assistant, MemoryStore, Turn};
///
/// let assistant = Assistant::new(MemoryStore::new());
///
/// let start = assistant.submit_word_list(1_u64, ["abcd", "efgh", "ijkl", "mnop", "qrst", "uvwx"])?;
/// assert_eq!(start.hint, None);
///
/// match assistant.submit_attempt(&1, "ijkl", 4)? {
///     Turn::Solved { target, .. } => assert_eq!(target, "ijkl"),
///     other => panic!("unexpected {:?}", other),
/// }
///
/// // the same list is recognized next time
/// let start = assistant.submit_word_list(2, ["uvwx", "qrst", "mnop", "ijkl", "efgh", "abcd"])?;
/// assert_eq!(start.hint.as_deref(), Some("ijkl"));
/// #
/// # Ok::<_, terminal_rs::TerminalError>(())
/// ```
#[derive(Debug)]
pub struct Assistant<S, K> {
    registry: Registry<K>,
    store: S,
    policy: Policy,
}

impl<S, K> Assistant<S, K>
where
    S: AnswerStore,
    K: Eq + Hash + Clone + Display + std::fmt::Debug,
{
    /// Creates an assistant with the default [`Policy`].
    pub fn new(store: S) -> Self {
        Assistant {
            registry: Registry::new(),
            store,
            policy: Policy::default(),
        }
    }

    /// Replaces the policy.
    pub fn policy(self, policy: Policy) -> Self {
        Assistant { policy, ..self }
    }

    pub fn current_policy(&self) -> &Policy {
        &self.policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn registry(&self) -> &Registry<K> {
        &self.registry
    }

    /// Drops the player's game, if any. Returns true if there was one.
    pub fn new_game(&self, player: &K) -> bool {
        self.registry.finish(player).is_some()
    }

    /// Starts a game from raw lines of text.
    ///
    /// The lines are [sanitized](crate::sanitize). Lists shorter than the
    /// policy allows are rejected with [`ValidationError::TooFewWords`] and
    /// lists with mixed word lengths with
    /// [`ValidationError::InvalidWordLength`]; the player's previous game, if
    /// any, is kept in both cases.
    ///
    /// A list the policy accepts may still be decided from the start, which
    /// [`GameStart::state`] reports. Such a list replaces no game.
    pub fn submit_word_list<I, L>(&self, player: K, lines: I) -> Result<GameStart>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let words = sanitize(lines);

        let required = self.policy.required_words();
        if words.len() < required {
            return Err(ValidationError::TooFewWords {
                found: words.len(),
                required,
            }
            .into());
        }

        let session = Session::create(&words)?;
        let words_hash = compute_words_hash(session.initial_words());
        let hint = self.lookup(&words_hash);
        let state = session.state();
        let start = GameStart {
            words: session.available_words().to_vec(),
            hint,
            words_hash,
            state,
        };

        if state == State::Active {
            self.registry.start(player, session);
        } else {
            info!("word list from player {} is decided already: {:?}", player, state);
        }
        Ok(start)
    }

    /// Starts a game from text recognized in a screenshot.
    pub fn submit_recognized_text(&self, player: K, text: &str) -> Result<GameStart> {
        self.submit_word_list(player, split_recognized_text(text))
    }

    /// Recognizes a screenshot and starts a game from it.
    ///
    /// Recognition is abandoned after the policy's timeout.
    pub fn submit_image(
        &self,
        player: K,
        recognizer: Arc<dyn Recognizer>,
        image: Vec<u8>,
    ) -> Result<GameStart> {
        let words = extract_words(recognizer, image, self.policy.recognition_timeout())?;
        self.submit_word_list(player, words)
    }

    /// Reports an attempt for the player's game.
    ///
    /// A solved game is handed to the store when its word list has at least
    /// [`Policy::saved_words()`] words. Solved and contradictory games are over
    /// and removed.
    pub fn submit_attempt(&self, player: &K, guess: &str, exact_matches: usize) -> Result<Turn> {
        let min_saved = self.policy.saved_words();

        let outcome = self
            .registry
            .with_session(player, |session| match session.submit_attempt(guess, exact_matches) {
                State::Active => Outcome::Continue(session.available_words().to_vec()),
                State::Solved => {
                    let game = CompletedGame::from_session(player.to_string(), session);
                    let attempts = session.attempts_count();
                    // tiny lists are usually spam
                    let keep = session.initial_words().len() >= min_saved;
                    Outcome::Solved(game, attempts, keep)
                }
                State::Contradiction => Outcome::Contradiction,
            })
            .ok_or(TerminalError::NoActiveGame)?;

        Ok(match outcome {
            Outcome::Continue(words) => Turn::Continue(words),
            Outcome::Contradiction => {
                info!("player {} reached a contradiction", player);
                Turn::Contradiction
            }
            Outcome::Solved(game, attempts, keep) => {
                let target = game
                    .as_ref()
                    .map(|g| g.target.clone())
                    .unwrap_or_default();
                info!("player {} solved {} in {} attempts", player, target, attempts);

                let record = match game {
                    Some(game) if keep => self.save(game),
                    _ => Record::Skipped,
                };

                Turn::Solved {
                    target,
                    attempts,
                    record,
                }
            }
        })
    }

    fn lookup(&self, hash: &WordsHash) -> Option<String> {
        match self.store.find_answer_by_hash(hash) {
            Ok(Some(answer)) => {
                info!("found a previous answer for {}", hash);
                Some(answer)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("could not look up previous answer: {}", e);
                None
            }
        }
    }

    fn save(&self, game: CompletedGame) -> Record {
        match self.store.save_completed_game(game) {
            Ok(()) => Record::Saved,
            Err(e) => {
                warn!("could not save completed game: {}", e);
                Record::Failed(e)
            }
        }
    }
}

enum Outcome {
    Continue(Vec<String>),
    Solved(Option<CompletedGame>, usize, bool),
    Contradiction,
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use super::*;
    use crate::{MemoryStore, RecognizeError};

    const SIX: [&str; 6] = ["able", "acid", "aged", "airy", "also", "arch"];

    fn assistant() -> Assistant<MemoryStore, u64> {
        Assistant::new(MemoryStore::new())
    }

    struct Unavailable;

    impl AnswerStore for Unavailable {
        fn find_answer_by_hash(&self, _: &WordsHash) -> std::result::Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }

        fn save_completed_game(&self, _: CompletedGame) -> std::result::Result<(), StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }
    }

    struct Screenshot;

    impl Recognizer for Screenshot {
        fn recognize(&self, _: &[u8]) -> std::result::Result<String, RecognizeError> {
            Ok(">ACCESS\r\nable\r\nacid\r\naged\r\nairy\r\nalso\r\narch\r\n0x3F\r\n".into())
        }
    }

    #[test]
    fn too_few_words() {
        let res = assistant().submit_word_list(1, ["able", "acid", "able"]);
        assert!(matches!(
            res,
            Err(TerminalError::Validation {
                kind: ValidationError::TooFewWords {
                    found: 2,
                    required: 6
                }
            })
        ));
    }

    #[test]
    fn mixed_lengths() {
        let res = assistant().submit_word_list(1, ["able", "acid", "aged", "airy", "also", "arches"]);
        assert!(matches!(
            res,
            Err(TerminalError::Validation {
                kind: ValidationError::InvalidWordLength
            })
        ));
    }

    #[test]
    fn no_game() {
        let res = assistant().submit_attempt(&9, "able", 1);
        assert!(matches!(res, Err(TerminalError::NoActiveGame)));
    }

    #[test]
    fn plays_to_the_end_and_saves() {
        let assistant = assistant();
        let start = assistant.submit_word_list(5, SIX).unwrap();
        assert_eq!(start.state, State::Active);
        assert_eq!(start.words.len(), 6);
        assert_eq!(start.words_hash, compute_words_hash(SIX));

        match assistant.submit_attempt(&5, "able", 1).unwrap() {
            Turn::Continue(words) => assert_eq!(words.len(), 5),
            other => panic!("unexpected {:?}", other),
        }

        match assistant.submit_attempt(&5, "arch", 4).unwrap() {
            Turn::Solved {
                target,
                attempts,
                record: Record::Saved,
            } => {
                assert_eq!(target, "arch");
                assert_eq!(attempts, 2);
            }
            other => panic!("unexpected {:?}", other),
        }

        assert!(assistant.registry().is_empty());
        let games = assistant.store().games();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].player, "5");
        assert_eq!(games[0].attempts, 2);
    }

    #[test]
    fn small_lists_are_not_saved() {
        let assistant = assistant().policy(Policy::new().min_words(2));
        let start = assistant.submit_word_list(1, ["abcd", "efgh"]).unwrap();
        assert_eq!(start.state, State::Active);

        match assistant.submit_attempt(&1, "abcd", 4).unwrap() {
            Turn::Solved {
                record: Record::Skipped,
                ..
            } => {}
            other => panic!("unexpected {:?}", other),
        }
        assert!(assistant.store().games().is_empty());
    }

    #[test]
    fn save_threshold_follows_policy() {
        let policy = Policy::new().min_words(2).min_saved_words(2);
        let assistant = assistant().policy(policy);
        assistant.submit_word_list(1, ["abcd", "efgh"]).unwrap();

        match assistant.submit_attempt(&1, "abcd", 4).unwrap() {
            Turn::Solved {
                record: Record::Saved,
                ..
            } => {}
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(assistant.store().games().len(), 1);
    }

    #[test]
    fn decided_lists_are_not_registered() {
        let assistant = assistant().policy(Policy::new().min_words(1));
        assistant.submit_word_list(1, SIX).unwrap();

        let start = assistant.submit_word_list(1, ["abcd", "abcd"]).unwrap();
        assert_eq!(start.state, State::Solved);
        assert_eq!(start.words, vec!["abcd"]);
        // the running game is kept
        assert!(assistant.registry().contains(&1));

        let start = assistant.submit_word_list(2, ["abcd"]).unwrap();
        assert_eq!(start.state, State::Solved);
        assert!(matches!(
            assistant.submit_attempt(&2, "abcd", 4),
            Err(TerminalError::NoActiveGame)
        ));

        let start = assistant
            .policy(Policy::new().min_words(0))
            .submit_word_list(3, Vec::<String>::new())
            .unwrap();
        assert_eq!(start.state, State::Contradiction);
    }

    #[test]
    fn contradiction_ends_game() {
        let assistant = assistant();
        assistant.submit_word_list(1, SIX).unwrap();
        assert!(matches!(
            assistant.submit_attempt(&1, "zzzz", 2).unwrap(),
            Turn::Contradiction
        ));
        assert!(matches!(
            assistant.submit_attempt(&1, "able", 1),
            Err(TerminalError::NoActiveGame)
        ));
    }

    #[test]
    fn store_failures_are_not_fatal() {
        let assistant: Assistant<_, u64> = Assistant::new(Unavailable);
        let start = assistant.submit_word_list(1, SIX).unwrap();
        assert_eq!(start.hint, None);

        match assistant.submit_attempt(&1, "aged", 4).unwrap() {
            Turn::Solved {
                record: Record::Failed(StoreError::Unavailable(_)),
                ..
            } => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn new_game_discards() {
        let assistant = assistant();
        assert!(!assistant.new_game(&1));
        assistant.submit_word_list(1, SIX).unwrap();
        assert!(assistant.new_game(&1));
        assert!(assistant.registry().is_empty());
    }

    #[test]
    fn rejected_list_keeps_previous_game() {
        let assistant = assistant();
        assistant.submit_word_list(1, SIX).unwrap();
        assert!(assistant.submit_word_list(1, ["able"]).is_err());
        assert!(assistant.registry().contains(&1));
    }

    #[test]
    fn starts_from_screenshot() {
        let assistant = assistant();
        let start = assistant
            .submit_image(1, Arc::new(Screenshot), Vec::new())
            .unwrap();
        assert_eq!(start.words_hash, compute_words_hash(SIX));

        let start = assistant
            .submit_recognized_text(2, "ABLE\nacid\naged\nairy\nalso\narch\nab")
            .unwrap();
        assert_eq!(start.words.len(), 6);
    }

    #[test]
    fn screenshot_timeout() {
        struct Stuck;

        impl Recognizer for Stuck {
            fn recognize(&self, _: &[u8]) -> std::result::Result<String, RecognizeError> {
                std::thread::sleep(Duration::from_millis(500));
                Ok(String::new())
            }
        }

        let assistant = assistant().policy(Policy::new().ocr_timeout(Duration::from_millis(10)));
        let res = assistant.submit_image(1, Arc::new(Stuck), Vec::new());
        assert!(matches!(
            res,
            Err(TerminalError::Recognition {
                kind: RecognizeError::Timeout
            })
        ));
        assert!(!assistant.registry().contains(&1));
    }
}
