//! `InterpolatedDiscountCurve` — a yield term structure defined by discount
//! factors at pillar times.
//!
//! Discounts are interpolated log-linearly, giving piecewise-constant
//! forward rates between pillars. Beyond the last pillar the last forward
//! rate is extended.

use crate::term_structure::TermStructure;
use crate::yield_term_structure::YieldTermStructure;
use ql_core::{
    ensure, errors::Result, DiscountFactor, Generation, GenerationCounter, Observable, Real, Time,
};

/// A yield curve defined by discount factors at known times.
#[derive(Debug)]
pub struct InterpolatedDiscountCurve {
    times: Vec<Time>,
    discounts: Vec<DiscountFactor>,
    log_discounts: Vec<Real>,
    generation: GenerationCounter,
}

impl InterpolatedDiscountCurve {
    /// Build a discount-factor curve from pillar times and discount factors.
    ///
    /// The first pillar must be `(0, 1)`. Times must be strictly increasing
    /// and discount factors positive.
    pub fn new(times: &[Time], discounts: &[DiscountFactor]) -> Result<Self> {
        ensure!(
            times.len() >= 2,
            "need at least 2 pillars (reference + 1), got {}",
            times.len()
        );
        ensure!(
            times.len() == discounts.len(),
            "times ({}) and discounts ({}) must have the same length",
            times.len(),
            discounts.len()
        );
        ensure!(times[0] == 0.0, "first pillar time must be 0, got {}", times[0]);
        ensure!(
            (discounts[0] - 1.0).abs() < 1e-12,
            "first discount factor must be 1.0, got {}",
            discounts[0]
        );
        for (i, w) in times.windows(2).enumerate() {
            ensure!(
                w[1] > w[0],
                "pillar times must be strictly increasing: t[{}] = {} >= t[{}] = {}",
                i,
                w[0],
                i + 1,
                w[1]
            );
        }
        for (i, &df) in discounts.iter().enumerate() {
            ensure!(
                df > 0.0 && df.is_finite(),
                "discount factor {i} must be positive, got {df}"
            );
        }

        Ok(Self {
            times: times.to_vec(),
            discounts: discounts.to_vec(),
            log_discounts: discounts.iter().map(|df| df.ln()).collect(),
            generation: GenerationCounter::new(),
        })
    }

    /// Return the pillar times.
    pub fn times(&self) -> &[Time] {
        &self.times
    }

    /// Return the pillar discount factors.
    pub fn discounts(&self) -> &[DiscountFactor] {
        &self.discounts
    }

    fn log_discount(&self, t: Time) -> Real {
        let n = self.times.len();
        // Segment [times[i], times[i + 1]] containing t, last one when beyond.
        let i = match self.times.partition_point(|&x| x <= t) {
            0 => 0,
            k if k >= n => n - 2,
            k => k - 1,
        };
        let (t0, t1) = (self.times[i], self.times[i + 1]);
        let (l0, l1) = (self.log_discounts[i], self.log_discounts[i + 1]);
        l0 + (l1 - l0) * (t - t0) / (t1 - t0)
    }
}

impl Observable for InterpolatedDiscountCurve {
    fn generation(&self) -> Generation {
        self.generation.current()
    }
}

impl TermStructure for InterpolatedDiscountCurve {}

impl YieldTermStructure for InterpolatedDiscountCurve {
    fn discount_impl(&self, t: Time) -> DiscountFactor {
        if t == 0.0 {
            return 1.0;
        }
        self.log_discount(t).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn flat_pillars(rate: Real) -> (Vec<Time>, Vec<DiscountFactor>) {
        let times = vec![0.0, 0.5, 1.0, 2.0, 5.0];
        let discounts = times.iter().map(|&t| (-rate * t).exp()).collect();
        (times, discounts)
    }

    #[test]
    fn discount_curve_at_pillars() {
        let (times, discounts) = flat_pillars(0.05);
        let curve = InterpolatedDiscountCurve::new(&times, &discounts).unwrap();

        for (t, df) in times.iter().zip(&discounts) {
            assert_abs_diff_eq!(curve.discount(*t), *df, epsilon = 1e-14);
        }
    }

    #[test]
    fn log_linear_reproduces_flat_rate() {
        let (times, discounts) = flat_pillars(0.05);
        let curve = InterpolatedDiscountCurve::new(&times, &discounts).unwrap();

        assert_abs_diff_eq!(curve.zero_rate(1.5), 0.05, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.zero_rate(7.0), 0.05, epsilon = 1e-12);
    }

    #[test]
    fn piecewise_constant_forwards() {
        let times = [0.0, 1.0, 2.0];
        let discounts = [1.0, (-0.02_f64).exp(), (-0.02_f64 - 0.04).exp()];
        let curve = InterpolatedDiscountCurve::new(&times, &discounts).unwrap();

        assert_abs_diff_eq!(curve.forward_rate(0.2, 0.8), 0.02, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.forward_rate(1.2, 1.8), 0.04, epsilon = 1e-12);
        // extrapolation keeps the last forward
        assert_abs_diff_eq!(curve.forward_rate(3.0, 4.0), 0.04, epsilon = 1e-12);
    }

    #[test]
    fn rejects_bad_pillars() {
        assert!(InterpolatedDiscountCurve::new(&[0.0], &[1.0]).is_err());
        assert!(InterpolatedDiscountCurve::new(&[0.0, 1.0], &[0.9, 0.8]).is_err());
        assert!(InterpolatedDiscountCurve::new(&[0.0, 1.0, 1.0], &[1.0, 0.9, 0.8]).is_err());
        assert!(InterpolatedDiscountCurve::new(&[0.0, 1.0], &[1.0, -0.1]).is_err());
        assert!(InterpolatedDiscountCurve::new(&[0.1, 1.0], &[1.0, 0.9]).is_err());
    }
}
