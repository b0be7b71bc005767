//! 1D root-finding solvers.
//!
//! [`Brent`] starts from a guess and widens an interval inside hard bounds
//! until the function changes sign. It then refines the bracket with Brent's
//! method. The whole search runs on a fixed budget of function evaluations.

use ql_core::{
    errors::{Error, Result},
    Real,
};

const MAX_ITERATIONS: usize = 100;
const DEFAULT_ACCURACY: Real = 1.0e-11;
const GROWTH_FACTOR: Real = 1.6;

fn effective_accuracy(accuracy: Real) -> Real {
    if accuracy > 0.0 {
        accuracy
    } else {
        DEFAULT_ACCURACY
    }
}

// ── Brent ─────────────────────────────────────────────────────────────────────

/// Brent iterations on a sign-changing bracket.
///
/// Returns the root and the number of evaluations spent.
fn brent_refine<F>(
    f: &mut F,
    (x_min, f_min): (Real, Real),
    (x_max, f_max): (Real, Real),
    acc: Real,
    budget: usize,
) -> Result<(Real, usize)>
where
    F: FnMut(Real) -> Real,
{
    let (mut a, mut fa) = (x_min, f_min);
    let (mut b, mut fb) = (x_max, f_max);
    if fa == 0.0 {
        return Ok((a, 0));
    }
    if fb == 0.0 {
        return Ok((b, 0));
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;

    for evaluations in 0..budget {
        if fb * fc > 0.0 {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }
        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * acc;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol || fb == 0.0 {
            return Ok((b, evaluations));
        }
        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (p, q) = if a == c {
                (2.0 * xm * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                let p = s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0));
                let q = (q - 1.0) * (r - 1.0) * (s - 1.0);
                (p, q)
            };
            let (p, q) = if p > 0.0 { (p, -q) } else { (-p, q) };
            if 2.0 * p < (3.0 * xm * q - (tol * q).abs()) && 2.0 * p < (e * q).abs() {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }
        a = b;
        fa = fb;
        b += if d.abs() > tol {
            d
        } else if xm > 0.0 {
            tol
        } else {
            -tol
        };
        fb = f(b);
    }
    Err(Error::Convergence(format!(
        "Brent: maximum number of function evaluations ({budget}) exceeded"
    )))
}

/// A located root and the number of function evaluations it cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Root {
    /// Abscissa of the root.
    pub value: Real,
    /// Function evaluations spent, bracketing included.
    pub evaluations: usize,
}

/// Brent solver with automatic bracketing and an evaluation budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brent {
    max_evaluations: usize,
}

impl Default for Brent {
    fn default() -> Self {
        Self {
            max_evaluations: MAX_ITERATIONS,
        }
    }
}

impl Brent {
    /// Create a solver allowing at most `max_evaluations` calls of `f`.
    pub fn new(max_evaluations: usize) -> Self {
        Self { max_evaluations }
    }

    /// The evaluation budget.
    pub fn max_evaluations(&self) -> usize {
        self.max_evaluations
    }

    /// Find a root of `f`, searching outward from `guess`.
    ///
    /// The initial bracket is `[guess - step, guess]` or `[guess, guess + step]`
    /// depending on the sign of `f(guess)`; the end with the larger residual
    /// is then pushed outward geometrically, clamped to `[lower, upper]`,
    /// until `f` changes sign. A bracket pinned to a single bound is widened
    /// by at least `step` from the opposite side.
    ///
    /// Fails with [`Error::Convergence`] when no sign change exists inside
    /// the bounds or the budget runs out.
    pub fn solve_bracketed<F>(
        &self,
        mut f: F,
        accuracy: Real,
        guess: Real,
        step: Real,
        lower: Real,
        upper: Real,
    ) -> Result<Root>
    where
        F: FnMut(Real) -> Real,
    {
        if !(lower < upper) {
            return Err(Error::Precondition(format!(
                "invalid solver bounds [{lower}, {upper}]"
            )));
        }
        if !(step > 0.0) {
            return Err(Error::Precondition(format!(
                "bracketing step must be positive, got {step}"
            )));
        }
        let acc = effective_accuracy(accuracy);
        let clamp = |x: Real| x.clamp(lower, upper);

        let root = clamp(guess);
        let f_root = f(root);
        if f_root == 0.0 {
            return Ok(Root {
                value: root,
                evaluations: 1,
            });
        }

        let ((mut x_min, mut f_min), (mut x_max, mut f_max)) = if f_root > 0.0 {
            let x = clamp(root - step);
            ((x, f(x)), (root, f_root))
        } else {
            let x = clamp(root + step);
            ((root, f_root), (x, f(x)))
        };
        let mut spent = 2usize;

        loop {
            if f_min * f_max <= 0.0 {
                let budget = self.max_evaluations.saturating_sub(spent);
                let (value, used) =
                    brent_refine(&mut f, (x_min, f_min), (x_max, f_max), acc, budget)?;
                return Ok(Root {
                    value,
                    evaluations: spent + used,
                });
            }
            if x_min <= lower && x_max >= upper {
                return Err(Error::Convergence(format!(
                    "no sign change in [{lower}, {upper}]: f({lower}) = {f_min}, f({upper}) = {f_max}"
                )));
            }
            if spent >= self.max_evaluations {
                return Err(Error::Convergence(format!(
                    "unable to bracket root in {} function evaluations",
                    self.max_evaluations
                )));
            }
            let width = (x_max - x_min).max(step);
            let widen_low = x_max >= upper || (x_min > lower && f_min.abs() < f_max.abs());
            if widen_low {
                x_min = clamp(x_min - GROWTH_FACTOR * width);
                f_min = f(x_min);
            } else {
                x_max = clamp(x_max + GROWTH_FACTOR * width);
                f_max = f(x_max);
            }
            spent += 1;
        }
    }
}
