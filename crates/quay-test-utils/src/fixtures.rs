//! Element types with observable behaviour for arena tests.
//!
//! - [`Block`]: multi-word payload whose words must all agree; a reader
//!   that sees a half-written value sees disagreeing words.
//! - [`DropProbe`]: counts its own drops through a shared counter.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Number of words in a [`Block`].
pub const BLOCK_WORDS: usize = 8;

/// A cache-line-sized payload whose words are all equal when intact.
///
/// Written as one `[u64; 8]` store sequence, so a reader observing a value
/// before its write completed would see a mix of old and new words.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(align(64))]
pub struct Block {
    pub words: [u64; BLOCK_WORDS],
}

impl Block {
    /// A block with every word set to `value`.
    pub fn splat(value: u64) -> Self {
        Self {
            words: [value; BLOCK_WORDS],
        }
    }

    /// The common word value, or `None` if the words disagree.
    pub fn value(&self) -> Option<u64> {
        let first = self.words[0];
        self.words.iter().all(|&w| w == first).then_some(first)
    }

    /// Whether all words agree.
    pub fn is_intact(&self) -> bool {
        self.value().is_some()
    }
}

/// Encode `(thread, seq)` into a non-zero tag so every value written by a
/// harness is distinguishable from `Default` storage.
pub fn tag(thread: usize, seq: usize) -> u64 {
    ((thread as u64 + 1) << 32) | (seq as u64 & 0xFFFF_FFFF)
}

/// Decode a value produced by [`tag`] back into `(thread, seq)`.
///
/// Returns `None` for values [`tag`] never produces, such as default
/// (zero) storage.
pub fn untag(tag: u64) -> Option<(usize, usize)> {
    let thread = (tag >> 32).checked_sub(1)?;
    Some((thread as usize, (tag & 0xFFFF_FFFF) as usize))
}

/// Increments a shared counter when dropped.
///
/// The default value carries no counter, so default-initialised arena
/// storage does not disturb the count.
#[derive(Clone, Debug, Default)]
pub struct DropProbe {
    counter: Option<Arc<AtomicUsize>>,
}

impl DropProbe {
    /// A probe reporting to `counter`.
    pub fn new(counter: &Arc<AtomicUsize>) -> Self {
        Self {
            counter: Some(Arc::clone(counter)),
        }
    }
}

impl Drop for DropProbe {
    fn drop(&mut self) {
        if let Some(counter) = &self.counter {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }
}
