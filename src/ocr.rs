//! Recovering a word list from noisy text recognition output.
//!
//! Screenshots of a puzzle run through a text recognition service come back
//! with stray fragments: symbols, partial words, merged tokens. The true word
//! list is assumed to be the largest cluster of tokens sharing one length,
//! which is what [`reconstruct_word_list()`] extracts.

use std::{
    collections::BTreeMap,
    sync::{mpsc, Arc},
    thread,
    time::Duration,
};

use log::{debug, warn};

use crate::{RecognizeError, Result};

/// The shortest word a puzzle can contain.
pub const MIN_WORD_LEN: usize = 4;

/// A text recognition backend, usually a network service.
///
/// Implementations return the raw recognized text of an image. They do not
/// need to enforce a deadline themselves; [`extract_words()`] does that.
pub trait Recognizer: Send + Sync {
    fn recognize(&self, image: &[u8]) -> std::result::Result<String, RecognizeError>;
}

/// Reconstructs the word list from recognized text lines.
///
/// Lines are trimmed and lowercased, and only those made of at least
/// [`MIN_WORD_LEN`] letters `a` through `z` are kept. The most common length
/// among the kept lines wins, with the smallest length breaking ties, and
/// only lines of that length are returned, in their original order.
/// Duplicates are kept; run the result through [`sanitize()`](crate::sanitize)
/// to remove them.
///
/// # Examples
///
/// ```rust
/// use terminal_rs::reconstruct_word_list;
///
/// let words = reconstruct_word_list(["able", "xyz", "acid", "q", "aged"]);
/// assert_eq!(words, vec!["able", "acid", "aged"]);
/// ```
pub fn reconstruct_word_list<I, S>(raw_lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let kept: Vec<String> = raw_lines
        .into_iter()
        .map(|line| line.as_ref().trim().to_lowercase())
        .filter(|line| is_word(line))
        .collect();

    let length = match modal_length(&kept) {
        Some(length) => length,
        None => return Vec::new(),
    };
    debug!(
        "modal word length is {} ({} of {} tokens kept)",
        length,
        kept.iter().filter(|w| w.len() == length).count(),
        kept.len()
    );

    kept.into_iter().filter(|w| w.len() == length).collect()
}

/// Splits raw recognized text into lines and reconstructs the word list.
pub fn split_recognized_text(text: &str) -> Vec<String> {
    reconstruct_word_list(text.lines())
}

/// Recognizes the words in `image`, waiting at most `timeout`.
///
/// Recognition runs on its own thread. If it does not answer in time the
/// call is abandoned and [`RecognizeError::Timeout`] is returned; the worker
/// finishes in the background and its result is discarded.
pub fn extract_words(
    recognizer: Arc<dyn Recognizer>,
    image: Vec<u8>,
    timeout: Duration,
) -> Result<Vec<String>> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        // the receiver is gone once the deadline passed
        let _ = tx.send(recognizer.recognize(&image));
    });

    match rx.recv_timeout(timeout) {
        Ok(Ok(text)) => Ok(split_recognized_text(&text)),
        Ok(Err(e)) => {
            warn!("text recognition failed: {}", e);
            Err(e.into())
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            warn!("text recognition exceeded {:?}", timeout);
            Err(RecognizeError::Timeout.into())
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            Err(RecognizeError::Service("recognizer stopped without answering".into()).into())
        }
    }
}

fn is_word(line: &str) -> bool {
    line.len() >= MIN_WORD_LEN && line.bytes().all(|b| b.is_ascii_lowercase())
}

/// The most frequent length, preferring the smallest on ties.
fn modal_length(words: &[String]) -> Option<usize> {
    let mut counts = BTreeMap::new();
    for word in words {
        *counts.entry(word.len()).or_insert(0_usize) += 1;
    }

    let mut best: Option<(usize, usize)> = None;
    // ascending iteration, so only a strictly larger count replaces the best
    for (length, count) in counts {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((length, count)),
        }
    }

    best.map(|(length, _)| length)
}
