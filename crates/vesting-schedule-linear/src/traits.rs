//! Traits that we use.

use core::marker::PhantomData;

use full_mul_div::{FullMulDiv, MulDivError};

/// An error that can happen at [`FracScale`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum FracScaleError {
    /// An overflow occured.
    #[cfg_attr(feature = "std", error("overflow"))]
    Overflow,
    /// A division by zero occured.
    #[cfg_attr(feature = "std", error("division by zero"))]
    DivisionByZero,
    /// Convertion from the fraction part type to the value type failed.
    #[cfg_attr(feature = "std", error("type conversion"))]
    Conversion,
}

impl From<MulDivError> for FracScaleError {
    fn from(err: MulDivError) -> Self {
        match err {
            MulDivError::Overflow => Self::Overflow,
            MulDivError::DivisionByZero => Self::DivisionByZero,
        }
    }
}

/// Fractional scaler.
///
/// Effectively represent multiplication of the value to a fraction operation: x * (a/b).
pub trait FracScale {
    /// The value type to scale.
    type Value;
    /// The type used for the fraction nominator and denominator.
    type FracPart;

    /// Compute `value` * (`nom` / `denom`).
    fn frac_scale(
        value: &Self::Value,
        nom: &Self::FracPart,
        denom: &Self::FracPart,
    ) -> Result<Self::Value, FracScaleError>;
}

/// The scaler that never loses precision in the intermediate product.
///
/// The fraction parts are converted into the value type, and the scaling is done via
/// [`FullMulDiv`], rounding the result towards zero.
pub struct FullPrecisionFracScaler<Value, FracPart>(PhantomData<(Value, FracPart)>);

impl<Value, FracPart> FracScale for FullPrecisionFracScaler<Value, FracPart>
where
    Value: FullMulDiv + Copy,
    FracPart: TryInto<Value> + Copy,
{
    type Value = Value;
    type FracPart = FracPart;

    fn frac_scale(
        value: &Self::Value,
        nom: &Self::FracPart,
        denom: &Self::FracPart,
    ) -> Result<Self::Value, FracScaleError> {
        let nom = (*nom)
            .try_into()
            .map_err(|_| FracScaleError::Conversion)?;
        let denom = (*denom)
            .try_into()
            .map_err(|_| FracScaleError::Conversion)?;

        Ok(value.full_mul_div(nom, denom)?)
    }
}
