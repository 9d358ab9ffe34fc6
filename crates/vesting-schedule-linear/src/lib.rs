//! The linear vesting window.

#![cfg_attr(not(feature = "std"), no_std)]

use num_traits::{CheckedSub, Zero};

pub mod traits;

use traits::{FracScale, FracScaleError};

/// The vesting window: the balance vests linearly from nothing at `start` to everything at `end`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    codec::Encode,
    codec::Decode,
    codec::MaxEncodedLen,
    scale_info::TypeInfo,
)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(deny_unknown_fields))]
pub struct LinearVesting<Moment> {
    /// The moment the vesting starts at.
    pub start: Moment,
    /// The moment everything is vested at.
    pub end: Moment,
}

/// The window end is not strictly after the window start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
#[cfg_attr(
    feature = "std",
    error("the vesting end must be strictly after the vesting start")
)]
pub struct InvalidTimeRange;

impl<Moment> LinearVesting<Moment>
where
    Moment: PartialOrd + CheckedSub + Zero + Copy,
{
    /// Construct a validated vesting window.
    pub fn new(start: Moment, end: Moment) -> Result<Self, InvalidTimeRange> {
        let this = Self { start, end };
        this.validate()?;
        Ok(this)
    }

    /// Check that the window is not empty.
    pub fn validate(&self) -> Result<(), InvalidTimeRange> {
        if self.end <= self.start {
            return Err(InvalidTimeRange);
        }
        Ok(())
    }

    /// The total length of the window.
    ///
    /// Zero for an invalid window.
    pub fn duration(&self) -> Moment {
        self.end.checked_sub(&self.start).unwrap_or_else(Zero::zero)
    }

    /// The time left until everything is vested, or `None` if the vesting is over.
    pub fn remaining_at(&self, now: Moment) -> Option<Moment> {
        self.end.checked_sub(&now).filter(|remaining| !remaining.is_zero())
    }

    /// Whether the vesting is running or already over at `now`.
    pub fn has_started(&self, now: Moment) -> bool {
        now >= self.start
    }

    /// Whether everything is vested at `now`.
    pub fn is_over(&self, now: Moment) -> bool {
        now >= self.end
    }

    /// Compute the part of the `balance` that is vested at `now`.
    pub fn compute_vested_balance<S, Balance>(
        &self,
        balance: Balance,
        now: Moment,
    ) -> Result<Balance, FracScaleError>
    where
        S: FracScale<Value = Balance, FracPart = Moment>,
        Balance: Zero,
    {
        let elapsed = match now.checked_sub(&self.start) {
            // The vesting did not start yet.
            None => return Ok(Zero::zero()),
            Some(v) if v.is_zero() => return Ok(Zero::zero()),
            Some(v) => v,
        };

        let duration = self.duration();
        if elapsed >= duration {
            return Ok(balance);
        }

        S::frac_scale(&balance, &elapsed, &duration)
    }

    /// Compute the part of the `balance` that is vested at `now` but not yet `claimed`.
    ///
    /// Saturates at zero when `claimed` exceeds the vested part.
    pub fn compute_redeemable_balance<S, Balance>(
        &self,
        balance: Balance,
        claimed: Balance,
        now: Moment,
    ) -> Result<Balance, FracScaleError>
    where
        S: FracScale<Value = Balance, FracPart = Moment>,
        Balance: Zero + CheckedSub,
    {
        let vested = self.compute_vested_balance::<S, Balance>(balance, now)?;
        Ok(vested.checked_sub(&claimed).unwrap_or_else(Zero::zero))
    }
}
