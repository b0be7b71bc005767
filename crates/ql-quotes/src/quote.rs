//! `Quote` trait and `SimpleQuote` implementation.

use ql_core::{Generation, GenerationCounter, Observable, Real};
use std::sync::{Mutex, PoisonError};

/// A market-observable value.
pub trait Quote: Observable + std::fmt::Debug + Send + Sync {
    /// Return the current value.
    ///
    /// Returns `None` if the quote is not currently valid / set.
    fn value(&self) -> Option<Real>;

    /// Return `true` if the quote is currently valid.
    fn is_valid(&self) -> bool {
        self.value().is_some()
    }
}

/// A simple, mutable market quote.
///
/// The value can be changed through a shared reference; every actual change
/// moves the quote's generation.
#[derive(Debug, Default)]
pub struct SimpleQuote {
    value: Mutex<Option<Real>>,
    generation: GenerationCounter,
}

impl SimpleQuote {
    /// Create a new quote with the given value.
    pub fn new(value: Real) -> Self {
        Self {
            value: Mutex::new(Some(value)),
            generation: GenerationCounter::new(),
        }
    }

    /// Create an empty (invalid) quote.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set a new value. Returns the difference from the previous value
    /// (zero when the quote was empty).
    pub fn set_value(&self, value: Real) -> Real {
        self.replace(Some(value))
            .map_or(0.0, |previous| value - previous)
    }

    /// Clear the value, making the quote invalid.
    pub fn reset(&self) {
        self.replace(None);
    }

    fn replace(&self, value: Option<Real>) -> Option<Real> {
        let mut slot = self.value.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = *slot;
        if previous != value {
            *slot = value;
            self.generation.bump();
        }
        previous
    }
}

impl Observable for SimpleQuote {
    fn generation(&self) -> Generation {
        self.generation.current()
    }
}

impl Quote for SimpleQuote {
    fn value(&self) -> Option<Real> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
