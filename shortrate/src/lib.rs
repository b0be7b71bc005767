//! # shortrate
//!
//! The Black-Karasinski short-rate model, fitted to a discount curve on a
//! trinomial tree.
//!
//! This crate is a **façade** that re-exports all public items from the
//! underlying workspace crates. Application code should depend on this
//! crate rather than the individual `ql-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use shortrate::core::Handle;
//! use shortrate::methods::TimeGrid;
//! use shortrate::models::{BlackKarasinski, OneFactorModel, ShortRateDynamics};
//! use shortrate::termstructures::{FlatForward, YieldTermStructure};
//!
//! let curve: Handle<dyn YieldTermStructure> = Handle::new(Arc::new(FlatForward::new(0.05)));
//! let mut model = BlackKarasinski::new(curve, 0.1, 0.1)?;
//!
//! let grid = TimeGrid::new(&[0.0, 1.0, 2.0, 3.0])?;
//! let tree = model.tree(&grid)?;
//! assert!((tree.discount_bond(3) - (-0.15_f64).exp()).abs() < 1e-10);
//!
//! let r = model.dynamics().short_rate(1.0, 0.0)?;
//! assert!(r > 0.0);
//! # Ok::<(), shortrate::core::Error>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, error definitions and handles.
pub use ql_core as core;

/// Floating-point comparison and one-dimensional root finders.
pub use ql_math as math;

/// Market quotes.
pub use ql_quotes as quotes;

/// Yield term structures.
pub use ql_termstructures as termstructures;

/// Stochastic process definitions.
pub use ql_processes as processes;

/// Short-rate models and their calibrated trees.
pub use ql_models as models;

/// Lattice methods: time grids and trinomial trees.
pub use ql_methods as methods;
