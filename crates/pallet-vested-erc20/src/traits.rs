//! Traits we use and expose.

use frame_support::dispatch::DispatchResult;

/// The custody of the underlying assets.
///
/// Every operation must either complete or fail without any effect.
///
/// Once opened, the `custodian` account must survive paying out everything it was pulled.
pub trait Custody<AccountId> {
    /// The identifier of the underlying asset.
    type AssetId;
    /// The balance of the underlying asset.
    type Balance;

    /// Make the `custodian` account able to hold the asset, charging the `funder` for
    /// the cost of keeping the account alive.
    fn open(
        asset_id: &Self::AssetId,
        funder: &AccountId,
        custodian: &AccountId,
    ) -> DispatchResult;

    /// Make the `custodian` account able to hold the asset at genesis, when there is no one
    /// to charge.
    fn open_at_genesis(asset_id: &Self::AssetId, custodian: &AccountId) -> DispatchResult;

    /// Move `amount` of the asset from the `payer` into the `custodian` account.
    fn pull(
        asset_id: &Self::AssetId,
        payer: &AccountId,
        custodian: &AccountId,
        amount: Self::Balance,
    ) -> DispatchResult;

    /// Move `amount` of the asset from the `custodian` account to the `recipient`.
    fn push(
        asset_id: &Self::AssetId,
        custodian: &AccountId,
        recipient: &AccountId,
        amount: Self::Balance,
    ) -> DispatchResult;
}
