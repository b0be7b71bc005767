//! # ql-methods
//!
//! Numerical methods: time grids and recombining trinomial trees used to
//! discretize one-factor diffusions.
//!
//! # Modules
//!
//! * [`lattice`] — [`TimeGrid`] and the additive [`TrinomialTree`]

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Lattice methods: time grids and trinomial trees.
pub mod lattice;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use lattice::{TimeGrid, TrinomialTree};
