//! Short-rate model traits.
//!
//! A one-factor short-rate model describes the short rate as a function of
//! a latent state variable `x(t)` that follows a simple diffusion:
//!
//! ```text
//! r(t) = g(t, x(t))
//! ```
//!
//! [`ShortRateDynamics`] bundles the state process with the mapping `g` and
//! its inverse; [`OneFactorModel`] produces dynamics and discretizes them on
//! a trinomial tree.

use crate::calibrated_model::CalibratedModel;
use crate::short_rate_tree::ShortRateTree;
use ql_core::{errors::Result, Handle, Rate, Real, Time};
use ql_methods::TimeGrid;
use ql_processes::StochasticProcess1D;
use ql_termstructures::YieldTermStructure;
use std::fmt;
use std::sync::Arc;

/// The state process of a one-factor model together with the mapping
/// between state values and short rates.
pub trait ShortRateDynamics: fmt::Debug + Send + Sync {
    /// The process followed by the state variable.
    fn process(&self) -> &dyn StochasticProcess1D;

    /// State value corresponding to the short rate `r` at time `t`.
    fn variable(&self, t: Time, r: Rate) -> Result<Real>;

    /// Short rate corresponding to the state value `x` at time `t`.
    fn short_rate(&self, t: Time, x: Real) -> Result<Rate>;
}

/// A single-factor short-rate model.
pub trait OneFactorModel: CalibratedModel {
    /// Dynamics type produced by the model.
    type Dynamics: ShortRateDynamics;

    /// The model dynamics for the current parameters.
    fn dynamics(&self) -> Self::Dynamics;

    /// A short-rate tree on `grid`, consistent with the model's curve.
    fn tree(&mut self, grid: &TimeGrid) -> Result<Arc<ShortRateTree>>;
}

/// A model fitted to an externally supplied discount curve.
pub trait TermStructureConsistentModel {
    /// The curve the model is fitted to.
    fn term_structure(&self) -> &Handle<dyn YieldTermStructure>;
}
