//! `FlatForward` — a yield term structure with a constant forward rate.
//!
//! The rate is either fixed at construction or read from a quote, in which
//! case the curve moves with the quote and reports the quote's generation.

use crate::term_structure::TermStructure;
use crate::yield_term_structure::YieldTermStructure;
use ql_core::{DiscountFactor, Generation, GenerationCounter, Observable, Rate, Time};
use ql_quotes::Quote;
use std::sync::Arc;

#[derive(Debug)]
enum FlatRate {
    Fixed {
        rate: Rate,
        generation: GenerationCounter,
    },
    Quoted(Arc<dyn Quote>),
}

/// A flat (constant) forward-rate yield term structure.
///
/// Discount factors are `P(t) = exp(-r·t)` with `r` continuously compounded.
/// A quote-driven curve whose quote is empty yields `NaN` discounts.
#[derive(Debug)]
pub struct FlatForward {
    rate: FlatRate,
}

impl FlatForward {
    /// Create a flat-forward curve from a continuously-compounded rate.
    pub fn new(rate: Rate) -> Self {
        Self {
            rate: FlatRate::Fixed {
                rate,
                generation: GenerationCounter::new(),
            },
        }
    }

    /// Create a flat-forward curve following a continuously-compounded
    /// rate quote.
    pub fn from_quote(quote: Arc<dyn Quote>) -> Self {
        Self {
            rate: FlatRate::Quoted(quote),
        }
    }

    /// The continuously-compounded flat rate, `NaN` if the quote is empty.
    pub fn rate(&self) -> Rate {
        match &self.rate {
            FlatRate::Fixed { rate, .. } => *rate,
            FlatRate::Quoted(quote) => quote.value().unwrap_or(Rate::NAN),
        }
    }
}

impl Observable for FlatForward {
    fn generation(&self) -> Generation {
        match &self.rate {
            FlatRate::Fixed { generation, .. } => generation.current(),
            FlatRate::Quoted(quote) => quote.generation(),
        }
    }
}

impl TermStructure for FlatForward {}

impl YieldTermStructure for FlatForward {
    fn discount_impl(&self, t: Time) -> DiscountFactor {
        (-self.rate() * t).exp()
    }

    fn zero_rate_impl(&self, _t: Time) -> Rate {
        self.rate()
    }

    fn forward_rate_impl(&self, _t: Time) -> Rate {
        self.rate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ql_quotes::SimpleQuote;

    #[test]
    fn flat_forward_discount() {
        let curve = FlatForward::new(0.05);

        assert_abs_diff_eq!(curve.discount(0.0), 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(curve.discount(1.0), (-0.05_f64).exp(), epsilon = 1e-12);
        assert_abs_diff_eq!(curve.discount(10.0), (-0.5_f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn flat_forward_zero_and_forward_rates() {
        let curve = FlatForward::new(0.03);

        assert_abs_diff_eq!(curve.zero_rate(0.5), 0.03, epsilon = 1e-15);
        assert_abs_diff_eq!(curve.zero_rate(5.0), 0.03, epsilon = 1e-15);
        assert_abs_diff_eq!(curve.forward_rate(1.0, 3.0), 0.03, epsilon = 1e-12);
    }

    #[test]
    fn fixed_curves_have_distinct_generations() {
        let a = FlatForward::new(0.05);
        let b = FlatForward::new(0.05);
        assert_ne!(a.generation(), b.generation());
    }

    #[test]
    fn quoted_curve_follows_quote() {
        let quote = Arc::new(SimpleQuote::new(0.04));
        let curve = FlatForward::from_quote(quote.clone());
        let g0 = curve.generation();
        assert_abs_diff_eq!(curve.discount(2.0), (-0.08_f64).exp(), epsilon = 1e-14);

        quote.set_value(0.06);
        assert_ne!(g0, curve.generation());
        assert_abs_diff_eq!(curve.discount(2.0), (-0.12_f64).exp(), epsilon = 1e-14);
    }

    #[test]
    fn curves_on_one_quote_share_its_generation() {
        let quote = Arc::new(SimpleQuote::new(0.04));
        let a = FlatForward::from_quote(quote.clone());
        let b = FlatForward::from_quote(quote.clone());
        assert_eq!(a.generation(), b.generation());
        assert_eq!(a.discount(3.0), b.discount(3.0));

        quote.set_value(0.05);
        assert_eq!(a.generation(), b.generation());
    }

    #[test]
    fn empty_quote_gives_nan_discount() {
        let curve = FlatForward::from_quote(Arc::new(SimpleQuote::empty()));
        assert!(curve.discount(1.0).is_nan());
    }
}
