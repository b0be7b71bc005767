//! `StochasticProcess1D` — base trait for scalar diffusions.
//!
//! A process `dX = μ(t,X) dt + σ(t,X) dW` is described by its drift (`μ`),
//! its diffusion (`σ`), and the conditional moments over a finite step.
//! The defaults are first-order Euler approximations; processes with known
//! transition moments override them.

use ql_core::{Real, Time};

/// A 1-dimensional stochastic process `dX = μ(t,X) dt + σ(t,X) dW`.
pub trait StochasticProcess1D: std::fmt::Debug + Send + Sync {
    /// Initial value of the process.
    fn x0(&self) -> Real;

    /// Drift `μ(t, x)`.
    fn drift(&self, t: Time, x: Real) -> Real;

    /// Diffusion `σ(t, x)`.
    fn diffusion(&self, t: Time, x: Real) -> Real;

    /// Expected value `E[x(t+Δt) | x(t) = x]`.
    fn expectation(&self, t: Time, x: Real, dt: Time) -> Real {
        x + self.drift(t, x) * dt
    }

    /// Standard deviation of `x(t+Δt)` given `x(t) = x`.
    fn std_deviation(&self, t: Time, x: Real, dt: Time) -> Real {
        self.diffusion(t, x) * dt.sqrt()
    }

    /// Variance of `x(t+Δt)` given `x(t) = x`.
    fn variance(&self, t: Time, x: Real, dt: Time) -> Real {
        let s = self.std_deviation(t, x, dt);
        s * s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// dX = μ dt + σ dW (constant drift & vol)
    #[derive(Debug)]
    struct ConstantProcess {
        x0: Real,
        mu: Real,
        sigma: Real,
    }

    impl StochasticProcess1D for ConstantProcess {
        fn x0(&self) -> Real {
            self.x0
        }

        fn drift(&self, _t: Time, _x: Real) -> Real {
            self.mu
        }

        fn diffusion(&self, _t: Time, _x: Real) -> Real {
            self.sigma
        }
    }

    #[test]
    fn euler_expectation() {
        let p = ConstantProcess { x0: 100.0, mu: 0.05, sigma: 0.20 };
        // x + μ·Δt
        assert!((p.expectation(0.0, p.x0(), 0.25) - 100.0125).abs() < 1e-12);
    }

    #[test]
    fn variance_matches_std_deviation() {
        let p = ConstantProcess { x0: 100.0, mu: 0.05, sigma: 0.20 };
        // σ² · Δt = 0.04 · 0.25
        assert!((p.variance(0.0, 100.0, 0.25) - 0.01).abs() < 1e-15);
    }
}
