//! Pull-based change detection.
//!
//! Instead of a graph of observers notified on every change, each observable
//! object carries a [`Generation`] token that moves whenever its state
//! changes. Dependants remember the token they computed against and compare
//! it on their next access.
//!
//! Tokens are drawn from one process-wide monotone sequence, so objects that
//! own their state never share a token. An object that forwards another's
//! token (a curve following a quote) shares it with every other follower of
//! the same source; such followers describe the same state. Swapping one
//! independent object for another is detected exactly like a mutation.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// An opaque change-detection token.
///
/// Two tokens compare equal only if they were read from the same object
/// with no change in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Generation(u64);

impl Generation {
    /// The token reported by an empty handle.
    pub const NULL: Generation = Generation(0);

    /// Draw a fresh token, distinct from every token issued so far.
    pub fn fresh() -> Self {
        Generation(NEXT_GENERATION.fetch_add(1, Ordering::Relaxed))
    }

    /// Return `true` for [`Generation::NULL`].
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

/// An object whose state changes can be detected by polling.
pub trait Observable {
    /// Token identifying the current state of this object.
    fn generation(&self) -> Generation;
}

/// Embeddable generation bookkeeping.
///
/// Holds the current token behind an atomic so that it can be moved through
/// `&self`, matching the interior mutability of the objects that embed it.
#[derive(Debug)]
pub struct GenerationCounter {
    current: AtomicU64,
}

impl Default for GenerationCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationCounter {
    /// Create a counter holding a fresh token.
    pub fn new() -> Self {
        Self {
            current: AtomicU64::new(Generation::fresh().0),
        }
    }

    /// The current token.
    pub fn current(&self) -> Generation {
        Generation(self.current.load(Ordering::Acquire))
    }

    /// Record a change: replace the current token with a fresh one.
    pub fn bump(&self) -> Generation {
        let next = Generation::fresh();
        self.current.store(next.0, Ordering::Release);
        next
    }
}

impl Clone for GenerationCounter {
    /// A clone is a distinct object and gets its own token.
    fn clone(&self) -> Self {
        Self::new()
    }
}
