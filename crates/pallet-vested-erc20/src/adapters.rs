//! Ready-made implementations of the capabilities the pallet consumes.

use core::marker::PhantomData;

use frame_support::{
    dispatch::DispatchResult,
    sp_runtime::{
        traits::{Saturating, Zero},
        DispatchError, TokenError,
    },
    traits::{
        fungible::{Inspect, Mutate},
        tokens::Preservation,
        Get, UnixTime,
    },
};

use crate::traits::Custody;

/// The error we return when the asset id does not name the supported currency.
pub const UNSUPPORTED_ASSET_ERROR: DispatchError = DispatchError::Token(TokenError::UnknownAsset);

/// The custody over a single fungible currency, identified by `NativeAssetId`.
///
/// The custodian account is kept alive with the existential deposit of the currency, which is
/// put in when the custody is opened and is never paid out.
pub struct SingleCurrencyCustody<Currency, AssetId, NativeAssetId>(
    PhantomData<(Currency, AssetId, NativeAssetId)>,
);

impl<Currency, AssetId, NativeAssetId> SingleCurrencyCustody<Currency, AssetId, NativeAssetId>
where
    AssetId: PartialEq,
    NativeAssetId: Get<AssetId>,
{
    /// Ensure the asset is the one we hold the custody of.
    fn ensure_supported(asset_id: &AssetId) -> DispatchResult {
        if asset_id != &NativeAssetId::get() {
            return Err(UNSUPPORTED_ASSET_ERROR);
        }
        Ok(())
    }

    /// The amount the custodian account is short of the existential deposit.
    fn missing_deposit<AccountId>(
        custodian: &AccountId,
    ) -> <Currency as Inspect<AccountId>>::Balance
    where
        Currency: Inspect<AccountId>,
    {
        Currency::minimum_balance().saturating_sub(Currency::balance(custodian))
    }
}

impl<AccountId, Currency, AssetId, NativeAssetId> Custody<AccountId>
    for SingleCurrencyCustody<Currency, AssetId, NativeAssetId>
where
    Currency: Mutate<AccountId>,
    AssetId: PartialEq,
    NativeAssetId: Get<AssetId>,
{
    type AssetId = AssetId;
    type Balance = <Currency as Inspect<AccountId>>::Balance;

    fn open(
        asset_id: &Self::AssetId,
        funder: &AccountId,
        custodian: &AccountId,
    ) -> DispatchResult {
        Self::ensure_supported(asset_id)?;
        let deposit = Self::missing_deposit(custodian);
        if deposit.is_zero() {
            return Ok(());
        }
        Currency::transfer(funder, custodian, deposit, Preservation::Expendable)?;
        Ok(())
    }

    fn open_at_genesis(asset_id: &Self::AssetId, custodian: &AccountId) -> DispatchResult {
        Self::ensure_supported(asset_id)?;
        let deposit = Self::missing_deposit(custodian);
        if deposit.is_zero() {
            return Ok(());
        }
        Currency::mint_into(custodian, deposit)?;
        Ok(())
    }

    fn pull(
        asset_id: &Self::AssetId,
        payer: &AccountId,
        custodian: &AccountId,
        amount: Self::Balance,
    ) -> DispatchResult {
        Self::ensure_supported(asset_id)?;
        if amount.is_zero() {
            return Ok(());
        }
        Currency::transfer(payer, custodian, amount, Preservation::Expendable)?;
        Ok(())
    }

    fn push(
        asset_id: &Self::AssetId,
        custodian: &AccountId,
        recipient: &AccountId,
        amount: Self::Balance,
    ) -> DispatchResult {
        Self::ensure_supported(asset_id)?;
        if amount.is_zero() {
            return Ok(());
        }
        // The existential deposit stays behind, so the leftovers of the other holders are
        // never reaped along with the account.
        Currency::transfer(custodian, recipient, amount, Preservation::Preserve)?;
        Ok(())
    }
}

/// The current time, in whole seconds since the Unix epoch.
pub struct UnixTimeSeconds<T>(PhantomData<T>);

impl<T: UnixTime> Get<u64> for UnixTimeSeconds<T> {
    fn get() -> u64 {
        T::now().as_secs()
    }
}
