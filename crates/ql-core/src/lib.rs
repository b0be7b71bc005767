//! # ql-core
//!
//! Core types, traits, and error definitions shared by every crate in the
//! workspace: type aliases, the error hierarchy, generation tokens used for
//! pull-based change detection, and the `Handle` wrapper.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// The workspace `Error` enum and the `ensure!` macro.
pub mod errors;

/// Shared, relinkable reference handle (`Handle<T>`, `RelinkableHandle<T>`).
pub mod handle;

/// Design patterns: generation-based observables.
pub mod patterns;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type used throughout the library.
pub type Real = f64;

/// Alias used for array sizes / indices.
pub type Size = usize;

/// A rate expressed as a decimal (e.g. 0.05 = 5 %).
pub type Rate = Real;

/// A discount factor in [0, 1].
pub type DiscountFactor = Real;

/// A volatility level expressed as a decimal.
pub type Volatility = Real;

/// A time measurement in years.
pub type Time = Real;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{Error, Result};
pub use handle::{Handle, RelinkableHandle};
pub use patterns::observable::{Generation, GenerationCounter, Observable};
