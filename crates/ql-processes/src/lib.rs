//! # ql-processes
//!
//! One-dimensional stochastic processes used by lattice builders.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod ornstein_uhlenbeck_process;
pub mod stochastic_process;

pub use ornstein_uhlenbeck_process::OrnsteinUhlenbeckProcess;
pub use stochastic_process::StochasticProcess1D;
