//! Floating-point comparison helpers.

use ql_core::Real;

/// Default absolute tolerance used to identify grid times.
pub const TIME_EPSILON: Real = 1e-12;

/// Return `true` if `|a - b| <= epsilon`.
#[inline]
pub fn close(a: Real, b: Real, epsilon: Real) -> bool {
    (a - b).abs() <= epsilon
}
