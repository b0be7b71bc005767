//! Lattice methods.
//!
//! # Overview
//!
//! * [`TimeGrid`] — grid of time points used by tree methods
//! * [`TrinomialTree`] — recombining trinomial tree for additive-noise
//!   processes

pub mod trinomial_tree;

pub use trinomial_tree::TrinomialTree;

use ql_core::{ensure, errors::Result, Real, Size, Time};
use ql_math::comparison::{close, TIME_EPSILON};

// ─── TimeGrid ─────────────────────────────────────────────────────────────────

/// A strictly increasing grid of non-negative times starting at zero.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeGrid {
    times: Vec<Time>,
    dts: Vec<Time>,
}

impl TimeGrid {
    /// Create a grid from explicit times.
    ///
    /// Times must be non-negative and strictly increasing, with every step
    /// longer than [`TIME_EPSILON`]; `0` is prepended when the first time is
    /// positive.
    pub fn new(times: &[Time]) -> Result<Self> {
        ensure!(!times.is_empty(), "time grid needs at least one time");
        for &t in times {
            ensure!(
                t >= 0.0 && t.is_finite(),
                "grid times must be finite and non-negative, got {t}"
            );
        }

        let mut all_times = Vec::with_capacity(times.len() + 1);
        if times[0] > 0.0 {
            all_times.push(0.0);
        }
        all_times.extend_from_slice(times);
        for w in all_times.windows(2) {
            ensure!(
                w[1] - w[0] > TIME_EPSILON,
                "grid times must be strictly increasing by more than {TIME_EPSILON}: \
                 {} followed by {}",
                w[0],
                w[1]
            );
        }
        let dts = all_times.windows(2).map(|w| w[1] - w[0]).collect();
        Ok(Self {
            times: all_times,
            dts,
        })
    }

    /// Create a uniform time grid from 0 to `end` with `steps` intervals.
    pub fn uniform(end: Time, steps: Size) -> Result<Self> {
        ensure!(steps > 0, "steps must be > 0");
        ensure!(end > 0.0, "grid end must be positive, got {end}");
        let dt = end / steps as Real;
        ensure!(dt > TIME_EPSILON, "grid step {dt} is too small");
        let times: Vec<Time> = (0..=steps).map(|i| i as Real * dt).collect();
        let dts = vec![dt; steps];
        Ok(Self { times, dts })
    }

    /// Number of time points (= steps + 1).
    pub fn size(&self) -> Size {
        self.times.len()
    }

    /// Number of steps (= time points − 1).
    pub fn steps(&self) -> Size {
        self.times.len() - 1
    }

    /// Time at index `i`.
    pub fn time(&self, i: Size) -> Time {
        self.times[i]
    }

    /// Time step between index `i` and `i+1`.
    pub fn dt(&self, i: Size) -> Time {
        self.dts[i]
    }

    /// Final time.
    pub fn end(&self) -> Time {
        self.times[self.times.len() - 1]
    }

    /// All time points.
    pub fn times(&self) -> &[Time] {
        &self.times
    }

    /// Index of the grid point equal to `t` (within `1e-12`), if any.
    pub fn index_of(&self, t: Time) -> Option<Size> {
        let i = self.times.partition_point(|&x| x < t - TIME_EPSILON);
        (i < self.times.len() && close(self.times[i], t, TIME_EPSILON)).then_some(i)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_grid_uniform() {
        let g = TimeGrid::uniform(1.0, 4).unwrap();
        assert_eq!(g.size(), 5);
        assert_eq!(g.steps(), 4);
        assert!((g.time(0) - 0.0).abs() < 1e-15);
        assert!((g.time(4) - 1.0).abs() < 1e-15);
        assert!((g.dt(0) - 0.25).abs() < 1e-15);
    }

    #[test]
    fn time_grid_explicit_times() {
        let g = TimeGrid::new(&[0.0, 0.5, 2.0]).unwrap();
        assert_eq!(g.steps(), 2);
        assert!((g.dt(1) - 1.5).abs() < 1e-15);
        assert_eq!(g.end(), 2.0);
    }

    #[test]
    fn time_grid_prepends_zero() {
        let g = TimeGrid::new(&[1.0, 2.0]).unwrap();
        assert_eq!(g.times(), &[0.0, 1.0, 2.0]);
    }

    #[test]
    fn time_grid_single_point() {
        let g = TimeGrid::new(&[0.0]).unwrap();
        assert_eq!(g.size(), 1);
        assert_eq!(g.steps(), 0);
        assert_eq!(g.end(), 0.0);
    }

    #[test]
    fn time_grid_rejects_bad_input() {
        assert!(TimeGrid::new(&[]).is_err());
        assert!(TimeGrid::new(&[0.0, -1.0]).is_err());
        assert!(TimeGrid::new(&[0.0, 1.0, 1.0]).is_err());
        assert!(TimeGrid::new(&[0.0, 2.0, 1.0]).is_err());
        assert!(TimeGrid::new(&[0.0, Real::NAN]).is_err());
        assert!(TimeGrid::uniform(1.0, 0).is_err());
    }

    #[test]
    fn time_grid_rejects_near_coincident_times() {
        assert!(matches!(
            TimeGrid::new(&[0.0, 1.0, 1.0 + 5e-13, 2.0]),
            Err(ql_core::Error::Precondition(_))
        ));
        assert!(TimeGrid::new(&[1e-13, 1.0]).is_err());
        assert!(TimeGrid::uniform(1e-9, 10_000).is_err());
        assert!(TimeGrid::new(&[0.0, 1.0, 1.0 + 1e-9]).is_ok());
    }

    #[test]
    fn time_grid_index_of() {
        let g = TimeGrid::new(&[0.0, 0.25, 1.0, 3.0]).unwrap();
        assert_eq!(g.index_of(0.0), Some(0));
        assert_eq!(g.index_of(1.0), Some(2));
        assert_eq!(g.index_of(3.0 + 1e-14), Some(3));
        assert_eq!(g.index_of(0.5), None);
        assert_eq!(g.index_of(4.0), None);
    }
}
