//! # ql-quotes
//!
//! Market quotes whose changes are visible through generation tokens.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// `Quote` trait and concrete implementations.
pub mod quote;

pub use quote::{Quote, SimpleQuote};
