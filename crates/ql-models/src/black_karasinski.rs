//! Black-Karasinski short-rate model.
//!
//! ```text
//! d ln(r) = (θ(t) − a·ln(r)) dt + σ dW
//! ```
//!
//! Written in terms of a zero-mean Ornstein-Uhlenbeck factor `x`
//! (`dx = −a·x dt + σ dW`, `x(0) = 0`) and a deterministic shift `φ(t)`:
//!
//! ```text
//! r(t) = exp(x(t) + φ(t))
//! ```
//!
//! Rates stay positive by construction. There is no closed form for `φ`;
//! it is solved numerically on a trinomial tree, one slice at a time, so
//! that the tree reprices every zero-coupon bond of the input curve.

use crate::calibrated_model::{CalibratedModel, Constraint, Parameter};
use crate::fitting_parameter::FittingParameter;
use crate::settings::CalibrationSettings;
use crate::short_rate_model::{OneFactorModel, ShortRateDynamics, TermStructureConsistentModel};
use crate::short_rate_tree::{advance_state_prices, ShortRateTree};
use ql_core::{
    ensure, errors::Result, DiscountFactor, Error, Generation, Handle, Observable, Rate, Real,
    Size, Time,
};
use ql_math::Brent;
use ql_methods::{TimeGrid, TrinomialTree};
use ql_processes::{OrnsteinUhlenbeckProcess, StochasticProcess1D};
use ql_termstructures::YieldTermStructure;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Mean-reversion speed used by [`BlackKarasinski::with_default_parameters`].
pub const DEFAULT_SPEED: Real = 0.1;
/// Volatility used by [`BlackKarasinski::with_default_parameters`].
pub const DEFAULT_VOLATILITY: Real = 0.1;

// ────────────────────────────────────────────────────────────────────────────
// Dynamics
// ────────────────────────────────────────────────────────────────────────────

/// Short-rate dynamics of the Black-Karasinski model.
///
/// Pairs the state process with a snapshot of the fitting function, so a
/// value obtained before a recalibration keeps its own `φ`.
#[derive(Debug, Clone, PartialEq)]
pub struct BlackKarasinskiDynamics {
    process: OrnsteinUhlenbeckProcess,
    fitting: FittingParameter,
}

impl BlackKarasinskiDynamics {
    /// Dynamics for the state process `process` shifted by `fitting`.
    pub fn new(process: OrnsteinUhlenbeckProcess, fitting: FittingParameter) -> Self {
        Self { process, fitting }
    }

    /// The fitting function `φ`.
    pub fn fitting(&self) -> &FittingParameter {
        &self.fitting
    }
}

impl ShortRateDynamics for BlackKarasinskiDynamics {
    fn process(&self) -> &dyn StochasticProcess1D {
        &self.process
    }

    /// `ln r − φ(t)`; fails with [`Error::Domain`] unless `r > 0`.
    fn variable(&self, t: Time, r: Rate) -> Result<Real> {
        if !(r > 0.0) {
            return Err(Error::Domain(format!(
                "Black-Karasinski rates must be positive, got r = {r}"
            )));
        }
        Ok(r.ln() - self.fitting.value(t)?)
    }

    /// `exp(x + φ(t))`.
    fn short_rate(&self, t: Time, x: Real) -> Result<Rate> {
        Ok((x + self.fitting.value(t)?).exp())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Model
// ────────────────────────────────────────────────────────────────────────────

/// The last calibration and everything it depends on.
#[derive(Debug)]
struct CalibratedTree {
    generation: Generation,
    grid: TimeGrid,
    params: (Real, Real),
    settings: CalibrationSettings,
    fitting: FittingParameter,
    tree: Arc<ShortRateTree>,
}

impl CalibratedTree {
    fn is_current(
        &self,
        generation: Generation,
        grid: &TimeGrid,
        params: (Real, Real),
        settings: &CalibrationSettings,
    ) -> bool {
        self.generation == generation
            && self.params == params
            && self.settings == *settings
            && self.grid == *grid
    }
}

/// Black-Karasinski short-rate model.
///
/// Trees are calibrated lazily and cached. The cache is keyed by the curve
/// generation, the grid, the parameters and the solver settings; any change
/// of one of them triggers a fresh calibration on the next [`tree`] call.
///
/// [`tree`]: OneFactorModel::tree
#[derive(Debug)]
pub struct BlackKarasinski {
    term_structure: Handle<dyn YieldTermStructure>,
    params: Vec<Parameter>,
    process: OrnsteinUhlenbeckProcess,
    settings: CalibrationSettings,
    calibrated: Option<CalibratedTree>,
}

impl BlackKarasinski {
    /// Create a model with speed `a` and volatility `sigma`, fitted to the
    /// curve behind `term_structure`.
    ///
    /// Both parameters must be non-negative. A zero `sigma` is accepted here
    /// but no tree can be built from it.
    pub fn new(
        term_structure: Handle<dyn YieldTermStructure>,
        a: Real,
        sigma: Real,
    ) -> Result<Self> {
        let params = vec![
            Parameter::new(a, Constraint::NonNegative)?,
            Parameter::new(sigma, Constraint::NonNegative)?,
        ];
        Ok(Self {
            term_structure,
            params,
            process: OrnsteinUhlenbeckProcess::centered(a, sigma)?,
            settings: CalibrationSettings::default(),
            calibrated: None,
        })
    }

    /// Create a model with `a = σ = 0.1`.
    pub fn with_default_parameters(
        term_structure: Handle<dyn YieldTermStructure>,
    ) -> Result<Self> {
        Self::new(term_structure, DEFAULT_SPEED, DEFAULT_VOLATILITY)
    }

    /// Replace the solver settings.
    pub fn with_settings(mut self, settings: CalibrationSettings) -> Result<Self> {
        self.set_settings(settings)?;
        Ok(self)
    }

    /// Replace the solver settings, dropping any cached tree.
    pub fn set_settings(&mut self, settings: CalibrationSettings) -> Result<()> {
        settings.validate()?;
        self.settings = settings;
        self.generate_arguments();
        Ok(())
    }

    /// Mean-reversion speed `a`.
    pub fn a(&self) -> Real {
        self.params[0].value()
    }

    /// Volatility `σ` of the state factor.
    pub fn sigma(&self) -> Real {
        self.params[1].value()
    }

    /// Solver settings.
    pub fn settings(&self) -> &CalibrationSettings {
        &self.settings
    }

    /// Whether a tree calibrated against the current curve is cached.
    pub fn is_calibrated(&self) -> bool {
        self.calibrated
            .as_ref()
            .is_some_and(|c| c.generation == self.term_structure.generation())
    }
}

impl CalibratedModel for BlackKarasinski {
    fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// Set `[a, sigma]`.
    fn set_params(&mut self, values: &[Real]) -> Result<()> {
        ensure!(
            values.len() == 2,
            "Black-Karasinski takes 2 parameters [a, sigma], got {}",
            values.len()
        );
        for (p, &v) in self.params.iter().zip(values) {
            ensure!(
                p.constraint().test(v),
                "parameter value {v} violates constraint {:?}",
                p.constraint()
            );
        }
        let process = OrnsteinUhlenbeckProcess::centered(values[0], values[1])?;
        for (p, &v) in self.params.iter_mut().zip(values) {
            p.set_value(v)?;
        }
        self.process = process;
        self.generate_arguments();
        Ok(())
    }

    /// Drop the cached tree; the next [`tree`](OneFactorModel::tree) call
    /// recalibrates.
    fn generate_arguments(&mut self) {
        if self.calibrated.take().is_some() {
            debug!("Black-Karasinski calibration invalidated");
        }
    }
}

impl TermStructureConsistentModel for BlackKarasinski {
    fn term_structure(&self) -> &Handle<dyn YieldTermStructure> {
        &self.term_structure
    }
}

impl OneFactorModel for BlackKarasinski {
    type Dynamics = BlackKarasinskiDynamics;

    /// Dynamics with the fitting function of the cached tree, or an
    /// uncalibrated one when no tree matches the current curve.
    fn dynamics(&self) -> BlackKarasinskiDynamics {
        let generation = self.term_structure.generation();
        let fitting = match &self.calibrated {
            Some(c) if c.generation == generation => c.fitting.clone(),
            _ => FittingParameter::uncalibrated(),
        };
        BlackKarasinskiDynamics::new(self.process.clone(), fitting)
    }

    fn tree(&mut self, grid: &TimeGrid) -> Result<Arc<ShortRateTree>> {
        let generation = self.term_structure.generation();
        let params = (self.a(), self.sigma());

        if let Some(cached) = &self.calibrated {
            if cached.is_current(generation, grid, params, &self.settings) {
                debug!(steps = grid.steps(), "reusing calibrated Black-Karasinski tree");
                return Ok(Arc::clone(&cached.tree));
            }
        }
        self.generate_arguments();

        let curve = self.term_structure.current().ok_or(Error::NullValue)?;
        let (fitting, tree) = calibrate(curve.as_ref(), &self.process, grid, &self.settings)?;
        let tree = Arc::new(tree);

        self.calibrated = Some(CalibratedTree {
            generation,
            grid: grid.clone(),
            params,
            settings: self.settings,
            fitting,
            tree: Arc::clone(&tree),
        });
        Ok(tree)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Calibration
// ────────────────────────────────────────────────────────────────────────────

/// Repricing error of the bond maturing at the end of one slice, as a
/// function of the slice's shift `θ`.
///
/// Strictly increasing in `θ`: raising the shift raises every node rate
/// and lowers the tree bond price.
struct SliceResidual<'a> {
    state_prices: &'a [Real],
    states: Vec<Real>,
    dt: Time,
    discount_bond: DiscountFactor,
}

impl SliceResidual<'_> {
    fn discounts(&self, theta: Real) -> Vec<DiscountFactor> {
        self.states
            .iter()
            .map(|&x| (-(x + theta).exp() * self.dt).exp())
            .collect()
    }

    fn value(&self, theta: Real) -> Real {
        let tree_bond: Real = self
            .states
            .iter()
            .zip(self.state_prices)
            .map(|(&x, q)| q * (-(x + theta).exp() * self.dt).exp())
            .sum();
        self.discount_bond - tree_bond
    }
}

fn calibration_error(slice: Size, time: Time, target: Real, reason: String) -> Error {
    warn!(slice, time, target, %reason, "Black-Karasinski calibration failed");
    Error::Calibration {
        slice,
        time,
        target,
        reason,
    }
}

/// Solve `φ(t_i)` for every slice of `grid` so that the tree reprices the
/// zero bonds of `curve` at every grid time.
fn calibrate(
    curve: &dyn YieldTermStructure,
    process: &OrnsteinUhlenbeckProcess,
    grid: &TimeGrid,
    settings: &CalibrationSettings,
) -> Result<(FittingParameter, ShortRateTree)> {
    curve.check_range(grid.end())?;
    let trinomial = TrinomialTree::new(process, grid)?;
    let solver = Brent::new(settings.max_evaluations);

    let mut fitting = FittingParameter::calibrated();
    let mut state_prices = vec![1.0];
    let mut guess: Option<Real> = None;
    let mut evaluations = 0;

    for i in 0..grid.steps() {
        let (t, dt, t_next) = (grid.time(i), grid.dt(i), grid.time(i + 1));
        let (p, p_next) = (curve.discount(t), curve.discount(t_next));
        let target = p_next / p;
        if !(p > 0.0 && p_next > 0.0 && target.is_finite()) {
            return Err(calibration_error(
                i,
                t,
                target,
                format!("invalid market discount factors P({t}) = {p}, P({t_next}) = {p_next}"),
            ));
        }

        let residual = SliceResidual {
            state_prices: &state_prices,
            states: (0..trinomial.size(i)).map(|j| trinomial.underlying(i, j)).collect(),
            dt,
            discount_bond: p_next,
        };
        // first slice: the shift that reproduces the forward rate exactly
        let start = guess.unwrap_or_else(|| {
            let forward = -target.ln() / dt;
            if forward > 0.0 {
                forward.ln()
            } else {
                0.0
            }
        });

        let root = solver
            .solve_bracketed(
                |theta| residual.value(theta),
                settings.accuracy,
                start,
                settings.step,
                settings.lower_bound,
                settings.upper_bound,
            )
            .map_err(|e| calibration_error(i, t, target, e.to_string()))?;

        debug!(
            slice = i,
            time = t,
            value = root.value,
            target,
            evaluations = root.evaluations,
            "fitted Black-Karasinski slice"
        );
        evaluations += root.evaluations;

        let discounts = residual.discounts(root.value);
        state_prices = advance_state_prices(&trinomial, i, &state_prices, &discounts);
        fitting.push(t, root.value);
        guess = Some(root.value);
    }

    info!(steps = grid.steps(), evaluations, "calibrated Black-Karasinski tree");

    // rates by slice index, so the tree carries exactly the solved shifts
    let shifts = fitting.values().to_vec();
    let tree = ShortRateTree::with_rates(trinomial, |i, x| Ok((x + shifts[i]).exp()))?;
    Ok((fitting, tree))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ql_termstructures::FlatForward;

    fn flat_handle(rate: Rate) -> Handle<dyn YieldTermStructure> {
        Handle::new(Arc::new(FlatForward::new(rate)))
    }

    fn fitted(points: &[(Time, Real)]) -> FittingParameter {
        let mut f = FittingParameter::calibrated();
        for &(t, v) in points {
            f.push(t, v);
        }
        f
    }

    fn dynamics(points: &[(Time, Real)]) -> BlackKarasinskiDynamics {
        let process = OrnsteinUhlenbeckProcess::centered(0.1, 0.1).unwrap();
        BlackKarasinskiDynamics::new(process, fitted(points))
    }

    #[test]
    fn rate_mapping_round_trip() {
        let d = dynamics(&[(0.0, -3.0), (1.0, -2.5)]);
        let r = d.short_rate(1.0, 0.2).unwrap();
        assert_abs_diff_eq!(r, (0.2_f64 - 2.5).exp(), epsilon = 1e-15);
        assert_abs_diff_eq!(d.variable(1.0, r).unwrap(), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn non_positive_rates_are_a_domain_error() {
        let d = dynamics(&[(0.0, -3.0)]);
        assert!(matches!(d.variable(0.0, 0.0), Err(Error::Domain(_))));
        assert!(matches!(d.variable(0.0, -0.01), Err(Error::Domain(_))));
        assert!(matches!(d.variable(0.0, Real::NAN), Err(Error::Domain(_))));
    }

    #[test]
    fn uncalibrated_dynamics_cannot_map_rates() {
        let model = BlackKarasinski::with_default_parameters(flat_handle(0.05)).unwrap();
        let d = model.dynamics();
        assert!(!d.fitting().is_calibrated());
        assert!(matches!(d.short_rate(0.0, 0.0), Err(Error::NotImplemented(_))));
        assert!(matches!(d.variable(0.0, 0.05), Err(Error::NotImplemented(_))));
    }

    #[test]
    fn parameters_must_be_non_negative() {
        assert!(BlackKarasinski::new(flat_handle(0.05), -0.1, 0.1).is_err());
        assert!(BlackKarasinski::new(flat_handle(0.05), 0.1, -0.1).is_err());
        assert!(BlackKarasinski::new(flat_handle(0.05), 0.1, Real::NAN).is_err());
    }

    #[test]
    fn zero_speed_calibrates() {
        let mut model = BlackKarasinski::new(flat_handle(0.05), 0.0, 0.1).unwrap();
        let tree = model.tree(&TimeGrid::uniform(2.0, 4).unwrap()).unwrap();
        assert_abs_diff_eq!(tree.discount_bond(4), (-0.1_f64).exp(), epsilon = 1e-10);
    }

    #[test]
    fn zero_volatility_cannot_build_a_tree() {
        let mut model = BlackKarasinski::new(flat_handle(0.05), 0.1, 0.0).unwrap();
        let grid = TimeGrid::uniform(1.0, 2).unwrap();
        assert!(matches!(model.tree(&grid), Err(Error::Precondition(_))));
        assert!(!model.is_calibrated());
    }

    #[test]
    fn set_params_is_all_or_nothing() {
        let mut model = BlackKarasinski::new(flat_handle(0.05), 0.1, 0.2).unwrap();
        assert!(model.set_params(&[0.3]).is_err());
        assert!(model.set_params(&[0.3, -0.1]).is_err());
        assert_eq!((model.a(), model.sigma()), (0.1, 0.2));

        model.set_params(&[0.3, 0.15]).unwrap();
        assert_eq!((model.a(), model.sigma()), (0.3, 0.15));
        assert_eq!(model.params()[1].value(), 0.15);
    }

    #[test]
    fn first_slice_matches_forward_rate() {
        let mut model = BlackKarasinski::with_default_parameters(flat_handle(0.05)).unwrap();
        let grid = TimeGrid::new(&[0.0, 1.0]).unwrap();
        model.tree(&grid).unwrap();
        let phi0 = model.dynamics().fitting().value(0.0).unwrap();
        assert_abs_diff_eq!(phi0, 0.05_f64.ln(), epsilon = 1e-10);
    }

    #[test]
    fn slice_residual_is_increasing() {
        let state_prices = [0.2, 0.5, 0.25];
        let residual = SliceResidual {
            state_prices: &state_prices,
            states: vec![-0.1, 0.0, 0.1],
            dt: 0.5,
            discount_bond: 0.9,
        };
        let mut previous = residual.value(-50.0);
        for k in -40..=40 {
            let v = residual.value(k as Real * 0.1);
            assert!(v >= previous);
            previous = v;
        }
        assert!(residual.value(50.0) > 0.0 && residual.value(-50.0) < 0.0);
    }

    #[test]
    fn null_curve_is_rejected() {
        let mut model = BlackKarasinski::with_default_parameters(Handle::null()).unwrap();
        let grid = TimeGrid::uniform(1.0, 2).unwrap();
        assert!(matches!(model.tree(&grid), Err(Error::NullValue)));
    }

    #[test]
    fn settings_change_drops_cache() {
        let mut model = BlackKarasinski::with_default_parameters(flat_handle(0.03)).unwrap();
        let grid = TimeGrid::uniform(2.0, 4).unwrap();
        model.tree(&grid).unwrap();
        assert!(model.is_calibrated());

        model
            .set_settings(CalibrationSettings::default().with_accuracy(1e-10))
            .unwrap();
        assert!(!model.is_calibrated());
        assert!(model
            .set_settings(CalibrationSettings::default().with_step(0.0))
            .is_err());
    }
}
