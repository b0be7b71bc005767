//! `YieldTermStructure` — yield / interest-rate term structures.
//!
//! Any yield curve provides three related quantities:
//!
//! * **discount factor** — `P(0,t)`
//! * **zero rate** — the continuously-compounded zero rate for maturity *t*
//! * **forward rate** — the instantaneous or period forward rate

use crate::term_structure::TermStructure;
use ql_core::{DiscountFactor, Rate, Real, Time};

/// Small time step used for instantaneous forward rate computations.
const DT: Real = 1.0e-4;

/// A yield (interest-rate) term structure.
///
/// Implementors must provide **at least one** of the three low-level methods:
///
/// * [`discount_impl`](YieldTermStructure::discount_impl)
/// * [`zero_rate_impl`](YieldTermStructure::zero_rate_impl)
/// * [`forward_rate_impl`](YieldTermStructure::forward_rate_impl)
///
/// Default implementations of the other two are provided via the
/// mathematical relationships that connect them.
pub trait YieldTermStructure: TermStructure {
    // ── Low-level impl hooks (override exactly one) ──────────────────────

    /// Return the discount factor for a given time `t`.
    ///
    /// Default: computed from `zero_rate_impl`.
    fn discount_impl(&self, t: Time) -> DiscountFactor {
        if t == 0.0 {
            return 1.0;
        }
        let r = self.zero_rate_impl(t);
        (-r * t).exp()
    }

    /// Return the continuously-compounded zero rate for time `t`.
    ///
    /// Default: computed from `discount_impl`.
    fn zero_rate_impl(&self, t: Time) -> Rate {
        if t == 0.0 {
            return self.forward_rate_impl(0.0);
        }
        let df = self.discount_impl(t);
        -df.ln() / t
    }

    /// Return the instantaneous forward rate at time `t`.
    ///
    /// Default: central difference of `−ln P` around `t`.
    fn forward_rate_impl(&self, t: Time) -> Rate {
        let t1 = (t - DT / 2.0).max(0.0);
        let t2 = t + DT / 2.0;
        let df1 = self.discount_impl(t1);
        let df2 = self.discount_impl(t2);
        (df1.ln() - df2.ln()) / (t2 - t1)
    }

    // ── Public interface ─────────────────────────────────────────────────

    /// Discount factor `P(0, t)`.
    fn discount(&self, t: Time) -> DiscountFactor {
        self.discount_impl(t)
    }

    /// Continuously-compounded zero rate for maturity `t`.
    fn zero_rate(&self, t: Time) -> Rate {
        self.zero_rate_impl(t)
    }

    /// Continuously-compounded forward rate between `t1` and `t2`.
    ///
    /// Returns the instantaneous forward rate when `t1 == t2`.
    fn forward_rate(&self, t1: Time, t2: Time) -> Rate {
        if t2 == t1 {
            return self.forward_rate_impl(t1);
        }
        let df1 = self.discount_impl(t1);
        let df2 = self.discount_impl(t2);
        (df1 / df2).ln() / (t2 - t1)
    }
}
