//! Custom types we use.

use codec::{Decode, Encode, MaxEncodedLen};
use frame_support::{sp_runtime::traits::Zero, RuntimeDebug};
#[cfg(feature = "std")]
use frame_support::{Deserialize, Serialize};
use scale_info::TypeInfo;
pub use vesting_schedule_linear::LinearVesting;

/// The identifier of a vested token instance.
pub type InstanceId = u32;

/// The ERC20 metadata of a vested token instance.
#[derive(Clone, PartialEq, Eq, Encode, Decode, RuntimeDebug, TypeInfo, MaxEncodedLen)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct TokenMetadata<Text> {
    /// The name of the token.
    pub name: Text,
    /// The symbol of the token.
    pub symbol: Text,
    /// The decimals places of the token.
    pub decimals: u8,
}

/// The immutable configuration of a vested token instance.
#[derive(Clone, PartialEq, Eq, Encode, Decode, RuntimeDebug, TypeInfo, MaxEncodedLen)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct VestedTokenInfo<Text, AssetId, Moment> {
    /// The token metadata.
    pub metadata: TokenMetadata<Text>,
    /// The asset that is being vested.
    pub underlying_asset_id: AssetId,
    /// The window the underlying asset vests over.
    pub vesting: LinearVesting<Moment>,
}

/// The state of a single holder of a vested token instance.
#[derive(
    Clone, Copy, PartialEq, Eq, Encode, Decode, Default, RuntimeDebug, TypeInfo, MaxEncodedLen,
)]
pub struct HolderRecord<Balance> {
    /// The amount of wrapped tokens held.
    pub balance: Balance,
    /// The amount of underlying asset already redeemed, or credited as redeemed at wrap time.
    pub claimed: Balance,
}

impl<Balance: Zero> HolderRecord<Balance> {
    /// Whether the record carries no state, and is thus equivalent to its absence.
    pub fn is_empty(&self) -> bool {
        self.balance.is_zero() && self.claimed.is_zero()
    }
}
