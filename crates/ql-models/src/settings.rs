//! Root-finder settings for slice-by-slice tree calibration.

use ql_core::{ensure, errors::Result, Real};

/// Settings of the one-dimensional solver used to fit each tree slice.
///
/// The defaults reproduce the usual choices: absolute accuracy `1e-12`, at
/// most 1000 evaluations per slice, and a search confined to `[-50, 50]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CalibrationSettings {
    /// Absolute accuracy on the fitted value.
    pub accuracy: Real,
    /// Evaluation budget per slice, bracketing included.
    pub max_evaluations: usize,
    /// Lowest admissible fitted value.
    pub lower_bound: Real,
    /// Highest admissible fitted value.
    pub upper_bound: Real,
    /// Initial bracketing step around the guess.
    pub step: Real,
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            accuracy: 1e-12,
            max_evaluations: 1000,
            lower_bound: -50.0,
            upper_bound: 50.0,
            step: 0.01,
        }
    }
}

impl CalibrationSettings {
    /// Replace the accuracy.
    pub fn with_accuracy(mut self, accuracy: Real) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Replace the evaluation budget.
    pub fn with_max_evaluations(mut self, max_evaluations: usize) -> Self {
        self.max_evaluations = max_evaluations;
        self
    }

    /// Replace the search bounds.
    pub fn with_bounds(mut self, lower: Real, upper: Real) -> Self {
        self.lower_bound = lower;
        self.upper_bound = upper;
        self
    }

    /// Replace the bracketing step.
    pub fn with_step(mut self, step: Real) -> Self {
        self.step = step;
        self
    }

    /// Check that the settings describe a usable solver.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.accuracy > 0.0 && self.accuracy.is_finite(),
            "calibration accuracy must be positive, got {}",
            self.accuracy
        );
        ensure!(
            self.max_evaluations >= 2,
            "calibration needs at least 2 evaluations per slice, got {}",
            self.max_evaluations
        );
        ensure!(
            self.lower_bound < self.upper_bound,
            "invalid calibration bounds [{}, {}]",
            self.lower_bound,
            self.upper_bound
        );
        ensure!(
            self.step > 0.0 && self.step.is_finite(),
            "bracketing step must be positive, got {}",
            self.step
        );
        Ok(())
    }
}
