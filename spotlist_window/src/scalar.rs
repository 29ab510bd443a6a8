// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scalar abstraction over `f32` and `f64`.

use core::fmt::Debug;
use core::ops::{Add, Div, Mul, Sub};

/// Floating-point scalar used for extents, offsets, and scroll positions.
///
/// Only the handful of operations the extent models need are exposed, so the
/// crate stays `no_std` without pulling in `libm` for rounding.
pub trait Scalar:
    Copy
    + Debug
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// Additive identity.
    fn zero() -> Self;

    /// Converts an item count or index into this scalar.
    fn from_usize(value: usize) -> Self;

    /// Widens this value to `f64`.
    fn to_f64(self) -> f64;

    /// Returns `true` for negative values, including `-0.0`.
    fn is_sign_negative(self) -> bool;

    /// Returns `true` if this value is neither infinite nor NaN.
    fn is_finite(self) -> bool;

    /// Rounds toward negative infinity and converts to `isize`.
    ///
    /// Out-of-range values saturate.
    fn floor_to_isize(self) -> isize;

    /// Returns the larger of `self` and `other`.
    #[must_use]
    fn max(self, other: Self) -> Self {
        if other > self { other } else { self }
    }

    /// Returns the smaller of `self` and `other`.
    #[must_use]
    fn min(self, other: Self) -> Self {
        if other < self { other } else { self }
    }
}

macro_rules! impl_scalar {
    ($ty:ty) => {
        impl Scalar for $ty {
            fn zero() -> Self {
                0.0
            }

            #[allow(
                clippy::cast_precision_loss,
                reason = "Item counts above 2^24/2^53 are not meaningful as pixel offsets"
            )]
            fn from_usize(value: usize) -> Self {
                value as Self
            }

            fn to_f64(self) -> f64 {
                f64::from(self)
            }

            fn is_sign_negative(self) -> bool {
                <$ty>::is_sign_negative(self)
            }

            fn is_finite(self) -> bool {
                <$ty>::is_finite(self)
            }

            #[allow(
                clippy::cast_possible_truncation,
                reason = "`as` saturates out-of-range floats; NaN becomes 0"
            )]
            fn floor_to_isize(self) -> isize {
                let truncated = self as isize;
                if (truncated as Self) > self {
                    truncated.saturating_sub(1)
                } else {
                    truncated
                }
            }
        }
    };
}

impl_scalar!(f32);
impl_scalar!(f64);

/// Rounds `value` toward positive infinity and converts to `usize`.
///
/// Negative and NaN inputs yield `0`.
#[must_use]
pub(crate) fn ceil_to_usize(value: f64) -> usize {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    let floor = value.floor_to_isize();
    #[allow(clippy::cast_precision_loss, reason = "Compared against the source float only")]
    let ceil = if (floor as f64) < value {
        floor.saturating_add(1)
    } else {
        floor
    };
    ceil.max(0).unsigned_abs()
}

/// Rounds `value` toward negative infinity and converts to `usize`.
///
/// Negative and NaN inputs yield `0`.
#[must_use]
pub(crate) fn floor_to_usize(value: f64) -> usize {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    value.floor_to_isize().max(0).unsigned_abs()
}

#[cfg(test)]
mod tests {
    use super::{Scalar, ceil_to_usize, floor_to_usize};

    #[test]
    fn floor_rounds_toward_negative_infinity() {
        assert_eq!(2.7_f64.floor_to_isize(), 2);
        assert_eq!((-2.1_f64).floor_to_isize(), -3);
        assert_eq!((-2.0_f32).floor_to_isize(), -2);
        assert_eq!(0.0_f32.floor_to_isize(), 0);
    }

    #[test]
    fn unsigned_rounding_helpers_clamp_negatives() {
        assert_eq!(ceil_to_usize(10.0), 10);
        assert_eq!(ceil_to_usize(10.01), 11);
        assert_eq!(ceil_to_usize(-4.0), 0);
        assert_eq!(ceil_to_usize(f64::NAN), 0);
        assert_eq!(floor_to_usize(9.99), 9);
        assert_eq!(floor_to_usize(-0.5), 0);
    }
}
