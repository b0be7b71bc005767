//! Patterns sub-module: generation-based observables.

pub mod observable;
