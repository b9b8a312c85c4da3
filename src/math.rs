//! Checked capacity arithmetic and power-of-two helpers.
//!
//! Everything the table computes about its own size goes through these so an
//! overflow surfaces as [`Error::ArithmeticOverflow`] instead of wrapping.

use crate::error::Error;
use crate::error::Result;

#[inline]
pub(crate) fn checked_add(lhs: usize, rhs: usize) -> Result<usize> {
    lhs.checked_add(rhs).ok_or(Error::ArithmeticOverflow)
}

#[inline]
pub(crate) fn checked_sub(lhs: usize, rhs: usize) -> Result<usize> {
    lhs.checked_sub(rhs).ok_or(Error::ArithmeticUnderflow)
}

#[inline]
pub(crate) fn checked_mul(lhs: usize, rhs: usize) -> Result<usize> {
    lhs.checked_mul(rhs).ok_or(Error::ArithmeticOverflow)
}

/// `value % modulus` for a power-of-two `modulus`.
#[inline(always)]
pub(crate) fn fast_mod(value: usize, modulus: usize) -> usize {
    debug_assert!(modulus.is_power_of_two());
    value & (modulus - 1)
}

/// Smallest power of two `>= value`. Zero rounds up to one.
#[inline]
pub(crate) fn next_power_of_two(value: usize) -> Result<usize> {
    value
        .checked_next_power_of_two()
        .ok_or(Error::ArithmeticOverflow)
}

/// `round(capacity * fraction)`, halves rounding up.
///
/// `fraction` must already be validated to lie in `[0.0, 1.0]`, so the
/// result never exceeds `capacity`.
pub(crate) fn fraction_of(capacity: usize, fraction: f64) -> usize {
    debug_assert!((0.0..=1.0).contains(&fraction));
    // The float-to-int cast saturates, which only matters for capacities
    // beyond f64's 53-bit mantissa.
    ((capacity as f64 * fraction + 0.5) as usize).min(capacity)
}

/// Occupancy at which a table of `capacity` slots grows.
///
/// Clamped to `1..=capacity` so a zero fraction cannot make every insert grow
/// the table.
pub(crate) fn grow_threshold(capacity: usize, fraction: f64) -> usize {
    fraction_of(capacity, fraction).clamp(1, capacity)
}
