//! Time-dependent fitting function of term-structure consistent models.

use ql_core::{errors::Result, Error, Real, Time};
use ql_math::comparison::{close, TIME_EPSILON};

/// The deterministic shift `φ(t)` that makes a model reprice its curve.
///
/// There is no closed form: values exist only at the grid times of the last
/// tree calibration. Evaluating an uncalibrated function, or a calibrated one
/// away from its grid times, fails with
/// [`Error::NotImplemented`](ql_core::Error::NotImplemented).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FittingParameter {
    times: Vec<Time>,
    values: Vec<Real>,
    calibrated: bool,
}

impl FittingParameter {
    /// A fitting function with no values yet.
    pub fn uncalibrated() -> Self {
        Self::default()
    }

    /// A calibrated fitting function with no points, to be filled slice by
    /// slice.
    pub(crate) fn calibrated() -> Self {
        Self {
            calibrated: true,
            ..Self::default()
        }
    }

    /// Append the value fitted at time `t`; times arrive in grid order.
    pub(crate) fn push(&mut self, t: Time, value: Real) {
        debug_assert!(self.times.last().map_or(true, |&last| t > last));
        self.times.push(t);
        self.values.push(value);
    }

    /// Whether the function carries the result of a calibration.
    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    /// Calibrated times.
    pub fn times(&self) -> &[Time] {
        &self.times
    }

    /// Calibrated values, aligned with [`times`](Self::times).
    pub fn values(&self) -> &[Real] {
        &self.values
    }

    /// Number of calibrated points.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// `true` when there are no calibrated points.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Value at time `t`.
    pub fn value(&self, t: Time) -> Result<Real> {
        if !self.calibrated {
            return Err(Error::NotImplemented(
                "fitting function has no closed form; calibrate a tree first".into(),
            ));
        }
        let i = self.times.partition_point(|&x| x < t - TIME_EPSILON);
        match self.times.get(i) {
            Some(&ti) if close(ti, t, TIME_EPSILON) => Ok(self.values[i]),
            _ => Err(Error::NotImplemented(format!(
                "fitting function is only known at calibrated grid times, not at t = {t}"
            ))),
        }
    }

    /// Iterate over `(time, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Time, Real)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }
}
