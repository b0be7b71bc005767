//! Calibrated-model infrastructure: `Parameter`, `Constraint` and the
//! `CalibratedModel` trait.

use ql_core::{ensure, errors::Result, Real};
use std::fmt;

// ────────────────────────────────────────────────────────────────────────────
// Parameter
// ────────────────────────────────────────────────────────────────────────────

/// A constraint on parameter values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    /// All values are valid.
    None,
    /// Strictly positive values.
    Positive,
    /// Values `>= 0`.
    NonNegative,
    /// Values in `[lower, upper]`.
    Boundary {
        /// Lower bound (inclusive).
        lower: Real,
        /// Upper bound (inclusive).
        upper: Real,
    },
}

impl Constraint {
    /// Whether `value` satisfies this constraint.
    pub fn test(&self, value: Real) -> bool {
        match *self {
            Constraint::None => !value.is_nan(),
            Constraint::Positive => value > 0.0,
            Constraint::NonNegative => value >= 0.0,
            Constraint::Boundary { lower, upper } => value >= lower && value <= upper,
        }
    }
}

/// A scalar model parameter that can be calibrated.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    value: Real,
    constraint: Constraint,
}

impl Parameter {
    /// Create a new parameter, checking the initial value against the
    /// constraint.
    pub fn new(value: Real, constraint: Constraint) -> Result<Self> {
        ensure!(
            constraint.test(value),
            "parameter value {value} violates constraint {constraint:?}"
        );
        Ok(Self { value, constraint })
    }

    /// Current value.
    pub fn value(&self) -> Real {
        self.value
    }

    /// Set a new value, rejecting values that violate the constraint.
    pub fn set_value(&mut self, value: Real) -> Result<()> {
        ensure!(
            self.constraint.test(value),
            "parameter value {value} violates constraint {:?}",
            self.constraint
        );
        self.value = value;
        Ok(())
    }

    /// Access the constraint.
    pub fn constraint(&self) -> Constraint {
        self.constraint
    }
}

// ────────────────────────────────────────────────────────────────────────────
// CalibratedModel trait
// ────────────────────────────────────────────────────────────────────────────

/// A model whose constant parameters can be replaced by an external
/// calibration step.
pub trait CalibratedModel: fmt::Debug + Send + Sync {
    /// Return the model's parameters (for calibration).
    fn params(&self) -> &[Parameter];

    /// Set model parameters from a flat vector of values.
    ///
    /// Implementations validate every value before changing anything and
    /// then call [`generate_arguments`](Self::generate_arguments).
    fn set_params(&mut self, values: &[Real]) -> Result<()>;

    /// Rebuild everything derived from the parameters.
    ///
    /// Called after the parameters change; derived state computed with the
    /// old values must not survive it.
    fn generate_arguments(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_unconstrained() {
        let p = Parameter::new(-0.05, Constraint::None).unwrap();
        assert!((p.value() + 0.05).abs() < 1e-15);
        assert!(Parameter::new(Real::NAN, Constraint::None).is_err());
    }

    #[test]
    fn parameter_positive_constraint() {
        assert!(Parameter::new(0.01, Constraint::Positive).is_ok());
        assert!(Parameter::new(0.0, Constraint::Positive).is_err());
        assert!(Parameter::new(-0.01, Constraint::Positive).is_err());
    }

    #[test]
    fn parameter_non_negative_constraint() {
        assert!(Parameter::new(0.0, Constraint::NonNegative).is_ok());
        assert!(Parameter::new(-1e-12, Constraint::NonNegative).is_err());
    }

    #[test]
    fn parameter_boundary_constraint() {
        let c = Constraint::Boundary {
            lower: 0.0,
            upper: 1.0,
        };
        let mut p = Parameter::new(0.5, c).unwrap();
        assert!(p.set_value(1.5).is_err());
        assert_eq!(p.value(), 0.5);
        p.set_value(1.0).unwrap();
        assert_eq!(p.value(), 1.0);
    }
}
