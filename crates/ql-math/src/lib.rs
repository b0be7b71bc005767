//! # ql-math
//!
//! Mathematical utilities: floating-point comparison and 1-D root finders.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Floating-point comparison utilities.
pub mod comparison;

/// 1D root-finding solvers.
pub mod solvers1d;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use comparison::{close, TIME_EPSILON};
pub use solvers1d::{Brent, Root};
