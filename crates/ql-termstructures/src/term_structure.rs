//! `TermStructure` — base trait for all term structures.
//!
//! Times are year fractions measured from the curve's reference point,
//! at which discount = 1.0.

use ql_core::{errors::Result, Observable, Time};

/// Base trait for all term structures.
pub trait TermStructure: Observable + std::fmt::Debug + Send + Sync {
    /// The latest time for which the curve can be used.
    fn max_time(&self) -> Time {
        Time::INFINITY
    }

    /// Check whether a time is in the valid range of the term structure.
    fn check_range(&self, t: Time) -> Result<()> {
        ql_core::ensure!(
            t >= 0.0 && t <= self.max_time(),
            "time {t} is outside the curve range [0, {}]",
            self.max_time()
        );
        Ok(())
    }
}
