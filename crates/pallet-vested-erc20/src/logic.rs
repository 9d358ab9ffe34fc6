//! Logic of the vested token accounting.

use frame_support::{
    pallet_prelude::*,
    sp_runtime::{
        traits::{Bounded, CheckedDiv, CheckedSub, Zero},
        ArithmeticError,
    },
};
use full_mul_div::{FullMulDiv, MulDivError};
use vesting_schedule_linear::traits::{FracScale, FracScaleError, FullPrecisionFracScaler};

use super::*;

/// The error we return when there is an overflow in the calculations somewhere.
pub const OVERFLOW_ERROR: DispatchError = DispatchError::Arithmetic(ArithmeticError::Overflow);
/// The error we return when there is an underflow in the calculations somewhere.
pub const UNDERFLOW_ERROR: DispatchError = DispatchError::Arithmetic(ArithmeticError::Underflow);
/// The error we return when there is a division by zero in the calculations somewhere.
pub const DIVISION_BY_ZERO_ERROR: DispatchError =
    DispatchError::Arithmetic(ArithmeticError::DivisionByZero);

/// The fractional scaler we compute the vesting with.
pub type FracScalerOf<T> = FullPrecisionFracScaler<<T as Config>::Balance, <T as Config>::Moment>;

/// Convert the `FracScaleError` to our error types.
pub fn convert_frac_scale_error(err: FracScaleError) -> DispatchError {
    match err {
        FracScaleError::Overflow | FracScaleError::Conversion => OVERFLOW_ERROR,
        FracScaleError::DivisionByZero => DIVISION_BY_ZERO_ERROR,
    }
}

/// Convert the `MulDivError` to our error types.
pub fn convert_mul_div_error(err: MulDivError) -> DispatchError {
    match err {
        MulDivError::Overflow => OVERFLOW_ERROR,
        MulDivError::DivisionByZero => DIVISION_BY_ZERO_ERROR,
    }
}

/// The result of wrapping some underlying asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mint<Balance> {
    /// The amount of wrapped tokens to mint to the recipient.
    pub wrapped: Balance,
    /// The part of `wrapped` that is credited to the recipient as already claimed.
    pub pre_claimed: Balance,
}

impl<T: Config> Pallet<T> {
    /// Compute the tokens to mint for `underlying_amount` deposited at `now`.
    ///
    /// Before the vesting starts the tokens are minted one to one. Once the vesting is running,
    /// the deposit is scaled up so that it vests fully by the end of the window, and the
    /// surplus is credited as claimed so it can never be redeemed.
    pub(crate) fn compute_mint(
        vesting: &LinearVesting<T::Moment>,
        underlying_amount: T::Balance,
        now: T::Moment,
    ) -> Result<Mint<T::Balance>, DispatchError> {
        // Nothing is left of the window once the vesting is over.
        let remaining = vesting.remaining_at(now).ok_or(<Error<T>>::VestOver)?;
        let duration = vesting.duration();

        // The deposit times the duration must fit the balance type.
        let duration_as_balance: T::Balance = duration
            .try_into()
            .map_err(|_| <Error<T>>::AmountTooLarge)?;
        let max_amount = T::Balance::max_value()
            .checked_div(&duration_as_balance)
            .ok_or(DIVISION_BY_ZERO_ERROR)?;
        if underlying_amount >= max_amount {
            return Err(<Error<T>>::AmountTooLarge.into());
        }

        if !vesting.has_started(now) {
            return Ok(Mint {
                wrapped: underlying_amount,
                pre_claimed: Zero::zero(),
            });
        }

        let wrapped = FracScalerOf::<T>::frac_scale(&underlying_amount, &duration, &remaining)
            .map_err(convert_frac_scale_error)?;
        let pre_claimed = wrapped
            .checked_sub(&underlying_amount)
            .ok_or(UNDERFLOW_ERROR)?;

        Ok(Mint {
            wrapped,
            pre_claimed,
        })
    }

    /// Compute how much of the underlying asset the holder can redeem at `now`.
    pub(crate) fn compute_redeemable(
        vesting: &LinearVesting<T::Moment>,
        record: &HolderRecordOf<T>,
        now: T::Moment,
    ) -> Result<T::Balance, DispatchError> {
        vesting
            .compute_redeemable_balance::<FracScalerOf<T>, _>(record.balance, record.claimed, now)
            .map_err(convert_frac_scale_error)
    }

    /// Compute the share of the sender's claimed amount that moves along with `amount` of
    /// the sender's balance.
    ///
    /// Rounds towards zero, leaving the dust with the sender.
    pub(crate) fn compute_claimed_to_transfer(
        record: &HolderRecordOf<T>,
        amount: T::Balance,
    ) -> Result<T::Balance, DispatchError> {
        if amount > record.balance {
            return Err(<Error<T>>::InsufficientBalance.into());
        }

        // Also covers the empty sender, so we never divide by a zero balance.
        if record.claimed.is_zero() || amount.is_zero() {
            return Ok(Zero::zero());
        }

        record
            .claimed
            .full_mul_div(amount, record.balance)
            .map_err(convert_mul_div_error)
    }
}
