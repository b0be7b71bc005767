//! Error types for shortrate-rs.
//!
//! A single `thiserror`-derived enum covers every failure the workspace can
//! report; [`ensure!`](crate::ensure) is the shorthand for argument checks.

use crate::{Real, Size, Time};
use thiserror::Error;

/// The top-level error type used throughout shortrate-rs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Precondition violated: invalid constructor or call arguments.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// An operation needed an object behind an empty handle.
    #[error("null value")]
    NullValue,

    /// The quantity exists but cannot be evaluated directly.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// Argument outside the mathematical domain of a function
    /// (e.g. the logarithm of a non-positive rate).
    #[error("domain error: {0}")]
    Domain(String),

    /// A numerical solver failed to bracket a root or ran out of its
    /// evaluation budget.
    #[error("convergence failure: {0}")]
    Convergence(String),

    /// Term-structure fitting failed at a given time slice.
    #[error(
        "calibration failed at slice {slice} (t = {time}): \
         target discount ratio {target}: {reason}"
    )]
    Calibration {
        /// Index of the time slice being fitted.
        slice: Size,
        /// Grid time of the slice.
        time: Time,
        /// Market discount ratio `P(0, t_{i+1}) / P(0, t_i)` being matched.
        target: Real,
        /// Underlying solver diagnostic.
        reason: String,
    },
}

/// Shorthand `Result` type used throughout shortrate-rs.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ql_core::{ensure, errors::Error};
/// fn positive(x: f64) -> ql_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(matches!(positive(-1.0), Err(Error::Precondition(_))));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calibration_error_message_names_slice() {
        let e = Error::Calibration {
            slice: 3,
            time: 1.5,
            target: 0.97,
            reason: "no sign change".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("slice 3"), "{msg}");
        assert!(msg.contains("1.5"), "{msg}");
        assert!(msg.contains("0.97"), "{msg}");
    }

    #[test]
    fn domain_error_display() {
        let e = Error::Domain("ln(0)".into());
        assert_eq!(e.to_string(), "domain error: ln(0)");
    }

    fn checked(x: Real) -> Result<Real> {
        ensure!(x.is_finite(), "x must be finite, got {x}");
        Ok(x)
    }

    #[test]
    fn ensure_reports_precondition() {
        assert_eq!(checked(1.0), Ok(1.0));
        match checked(Real::NAN) {
            Err(Error::Precondition(msg)) => assert!(msg.contains("NaN"), "{msg}"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
