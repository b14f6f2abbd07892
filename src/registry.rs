//! Keeping one [`Session`] per player.

use std::{
    collections::HashMap,
    fmt::Debug,
    hash::Hash,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use log::{debug, info};

use crate::game::{Session, State};

/// A map from player to their game in progress.
///
/// Every session sits behind its own lock, so players never wait on each
/// other, while two events for the same player are applied one at a time.
///
/// The lifecycle of a session is:
///
/// 1. [`start()`](Registry::start()) when the player submits a word list,
///    replacing any game they had going;
/// 2. [`with_session()`](Registry::with_session()) for every attempt;
/// 3. removal, either automatically once the session is solved or
///    contradictory, or explicitly with [`finish()`](Registry::finish()) when
///    the player starts over.
///
/// # Examples
///
/// ```rust
/// use terminal_rs::{Registry, Session, State};
///
/// let registry = Registry::new();
/// let session = Session::create(["abcd", "efgh", "ijkl", "mnop", "qrst", "uvwx"])?;
/// registry.start(42_u64, session);
///
/// let state = registry.with_session(&42, |s| s.submit_attempt("abcd", 4));
/// assert_eq!(state, Some(State::Solved));
///
/// // solved sessions are dropped
/// assert!(!registry.contains(&42));
/// #
/// # Ok::<_, terminal_rs::ValidationError>(())
/// ```
#[derive(Debug)]
pub struct Registry<K> {
    sessions: Mutex<HashMap<K, Arc<Mutex<Session>>>>,
}

impl<K> Default for Registry<K> {
    fn default() -> Self {
        Registry {
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

// A panic while holding a lock cannot leave a session half-updated in a way
// later calls would trip over, so poisoned locks are used as they are.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<K: Eq + Hash + Clone + Debug> Registry<K> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new session for `player`.
    ///
    /// Returns true if this replaced a game the player already had.
    pub fn start(&self, player: K, session: Session) -> bool {
        info!(
            "player {:?} started a game with {} words",
            player,
            session.initial_words().len()
        );
        lock(&self.sessions)
            .insert(player, Arc::new(Mutex::new(session)))
            .is_some()
    }

    /// Runs `f` on the player's session while holding that session's lock.
    ///
    /// Returns `None` if the player has no game in progress. If the session
    /// is solved or contradictory afterwards, it is removed from the
    /// registry, unless a new game was started for the player meanwhile.
    pub fn with_session<T, F>(&self, player: &K, f: F) -> Option<T>
    where
        F: FnOnce(&mut Session) -> T,
    {
        // the map lock is released before the session lock is taken
        let handle = lock(&self.sessions).get(player).cloned()?;

        let (res, state) = {
            let mut session = lock(&handle);
            let res = f(&mut session);
            (res, session.state())
        };

        if state != State::Active {
            let mut sessions = lock(&self.sessions);
            if sessions
                .get(player)
                .map_or(false, |current| Arc::ptr_eq(current, &handle))
            {
                sessions.remove(player);
                debug!("removed finished game of player {:?} ({:?})", player, state);
            }
        }

        Some(res)
    }

    /// Removes the player's session and returns it.
    pub fn finish(&self, player: &K) -> Option<Session> {
        let handle = lock(&self.sessions).remove(player)?;
        debug!("player {:?} abandoned their game", player);

        match Arc::try_unwrap(handle) {
            Ok(mutex) => Some(mutex.into_inner().unwrap_or_else(PoisonError::into_inner)),
            // someone is still working on it; hand back a snapshot
            Err(shared) => Some(lock(&shared).clone()),
        }
    }

    pub fn contains(&self, player: &K) -> bool {
        lock(&self.sessions).contains_key(player)
    }

    /// The number of games in progress.
    pub fn len(&self) -> usize {
        lock(&self.sessions).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
