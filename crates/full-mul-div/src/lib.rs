//! Full-precision multiply-then-divide.
//!
//! Computes `floor(a * b / c)` without ever materializing `a * b` in the native integer width:
//! the product is kept as a pair of 128-bit halves and divided with a long division.

#![cfg_attr(not(feature = "std"), no_std)]

/// An error that can happen at [`FullMulDiv`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum MulDivError {
    /// The divisor was zero.
    #[cfg_attr(feature = "std", error("division by zero"))]
    DivisionByZero,
    /// The quotient does not fit the value type.
    #[cfg_attr(feature = "std", error("overflow"))]
    Overflow,
}

/// Multiply-then-divide with a double-width intermediate product.
pub trait FullMulDiv: Sized {
    /// Compute `floor(self * mul / div)`.
    ///
    /// The intermediate product is never truncated, so the result is exact whenever the quotient
    /// itself fits the value type.
    fn full_mul_div(self, mul: Self, div: Self) -> Result<Self, MulDivError>;
}

/// The mask for the lower 64-bit limb of a `u128`.
const LOW_MASK: u128 = u64::MAX as u128;

/// The width of a limb.
const LIMB_BITS: u32 = 64;

/// Compute the exact 256-bit product of `a` and `b`.
///
/// Returns the `(high, low)` halves of the product.
// Every limb product is below 2^128 and the middle sum is below 3 * 2^64, so none of the
// operations below can overflow.
#[allow(clippy::arithmetic_side_effects)]
pub fn wide_mul(a: u128, b: u128) -> (u128, u128) {
    let (a_hi, a_lo) = (a >> LIMB_BITS, a & LOW_MASK);
    let (b_hi, b_lo) = (b >> LIMB_BITS, b & LOW_MASK);

    let lo_lo = a_lo * b_lo;
    let lo_hi = a_lo * b_hi;
    let hi_lo = a_hi * b_lo;
    let hi_hi = a_hi * b_hi;

    let mid = (lo_lo >> LIMB_BITS) + (lo_hi & LOW_MASK) + (hi_lo & LOW_MASK);

    let low = (mid << LIMB_BITS) | (lo_lo & LOW_MASK);
    let high = hi_hi + (lo_hi >> LIMB_BITS) + (hi_lo >> LIMB_BITS) + (mid >> LIMB_BITS);

    (high, low)
}

/// Compute `floor((high * 2^128 + low) / div)`.
///
/// Fails with [`MulDivError::Overflow`] if the quotient does not fit into a `u128`.
// The remainder stays below `div` between iterations; the bit shifted out on the left is
// accounted for with `carry`, so the wrapping subtraction yields the exact remainder.
#[allow(clippy::arithmetic_side_effects)]
pub fn wide_div(high: u128, low: u128, div: u128) -> Result<u128, MulDivError> {
    if div == 0 {
        return Err(MulDivError::DivisionByZero);
    }

    if high == 0 {
        return Ok(low / div);
    }

    if high >= div {
        return Err(MulDivError::Overflow);
    }

    let mut remainder = high;
    let mut quotient: u128 = 0;

    for bit in (0..u128::BITS).rev() {
        let carry = remainder >> (u128::BITS - 1);
        remainder = (remainder << 1) | ((low >> bit) & 1);
        quotient <<= 1;

        if carry != 0 || remainder >= div {
            remainder = remainder.wrapping_sub(div);
            quotient |= 1;
        }
    }

    Ok(quotient)
}

/// Compute `floor(a * b / c)` for `u128` operands.
pub fn mul_div(a: u128, b: u128, c: u128) -> Result<u128, MulDivError> {
    if c == 0 {
        return Err(MulDivError::DivisionByZero);
    }
    let (high, low) = wide_mul(a, b);
    wide_div(high, low, c)
}

impl FullMulDiv for u128 {
    fn full_mul_div(self, mul: Self, div: Self) -> Result<Self, MulDivError> {
        mul_div(self, mul, div)
    }
}

/// Implement [`FullMulDiv`] for the narrower unsigned types through the `u128` routine.
macro_rules! impl_full_mul_div_via_u128 {
    ($($ty:ty),*) => {
        $(
            impl FullMulDiv for $ty {
                fn full_mul_div(self, mul: Self, div: Self) -> Result<Self, MulDivError> {
                    let quotient = mul_div(self.into(), mul.into(), div.into())?;
                    <$ty>::try_from(quotient).map_err(|_| MulDivError::Overflow)
                }
            }
        )*
    };
}

impl_full_mul_div_via_u128!(u8, u16, u32, u64);
