//! A substrate pallet that issues ERC20-style tokens wrapping a linearly vesting underlying asset.
//!
//! Every instance of the token is bound, once and for all, to an underlying asset and a vesting
//! window. Wrapping deposits the underlying asset into the instance custody and mints the
//! wrapped tokens; redeeming pays out the part of the deposit that has vested so far. The wrapped
//! tokens are transferable, and the already redeemed amount is split proportionally along with
//! the transferred balance.

#![cfg_attr(not(feature = "std"), no_std)]

use frame_support::{
    sp_runtime::{
        traits::{AccountIdConversion, Bounded, CheckedAdd, CheckedSub, Saturating, Zero},
        DispatchError, DispatchResult,
    },
    storage::with_storage_layer,
    traits::{Get, StorageVersion},
    BoundedVec,
};
pub use pallet::*;
pub use types::*;
pub use weights::*;

pub mod adapters;
pub mod api;
#[cfg(feature = "runtime-benchmarks")]
pub mod benchmarking;
mod logic;
pub mod traits;
pub mod types;
pub mod weights;

#[cfg(test)]
mod mock;


/// The current storage version.
const STORAGE_VERSION: StorageVersion = StorageVersion::new(0);

/// The log target of the pallet.
const LOG_TARGET: &str = "runtime::vested-erc20";

/// Utility alias for easy access to the [`frame_system::Config::AccountId`].
type AccountIdOf<T> = <T as frame_system::Config>::AccountId;

/// The bounded text used in the token metadata.
pub type MetadataTextOf<T> = BoundedVec<u8, <T as Config>::MaxMetadataLength>;

/// The token metadata from a given config.
pub type TokenMetadataOf<T> = TokenMetadata<MetadataTextOf<T>>;

/// The instance configuration from a given config.
pub type VestedTokenInfoOf<T> =
    VestedTokenInfo<MetadataTextOf<T>, <T as Config>::UnderlyingAssetId, <T as Config>::Moment>;

/// The holder record from a given config.
pub type HolderRecordOf<T> = HolderRecord<<T as Config>::Balance>;

// We have to temporarily allow some clippy lints. Later on we'll send patches to substrate to
// fix them at their end.
#[allow(clippy::missing_docs_in_private_items)]
#[frame_support::pallet]
pub mod pallet {
    use frame_support::{
        pallet_prelude::*,
        sp_runtime::traits::{AtLeast32BitUnsigned, MaybeSerializeDeserialize},
        sp_std::prelude::*,
        traits::tokens::Balance,
        PalletId,
    };
    use frame_system::pallet_prelude::*;
    use full_mul_div::FullMulDiv;

    use super::*;
    use crate::traits::Custody;

    #[pallet::pallet]
    #[pallet::storage_version(STORAGE_VERSION)]
    pub struct Pallet<T>(_);

    /// Configuration trait of this pallet.
    #[pallet::config]
    pub trait Config: frame_system::Config {
        /// Overarching event type.
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        /// The balance of both the wrapped tokens and the underlying assets.
        type Balance: Balance + FullMulDiv + MaybeSerializeDeserialize;

        /// The time representation the vesting windows are expressed in.
        type Moment: AtLeast32BitUnsigned
            + Parameter
            + Member
            + Copy
            + MaxEncodedLen
            + MaybeSerializeDeserialize
            + TryInto<Self::Balance>;

        /// The identifier of the underlying assets.
        type UnderlyingAssetId: Parameter + Member + MaxEncodedLen + MaybeSerializeDeserialize;

        /// The custody of the underlying assets.
        type Custody: Custody<
            Self::AccountId,
            AssetId = Self::UnderlyingAssetId,
            Balance = Self::Balance,
        >;

        /// The current time provider.
        type Now: Get<Self::Moment>;

        /// The pallet id, used for deriving the custody account of each instance.
        #[pallet::constant]
        type PalletId: Get<PalletId>;

        /// The max length of the token name and symbol.
        #[pallet::constant]
        type MaxMetadataLength: Get<u32>;

        /// Weight information for extrinsics in this pallet.
        type WeightInfo: WeightInfo;
    }

    /// The instance id to assign to the next created instance.
    #[pallet::storage]
    pub type NextInstanceId<T> = StorageValue<_, InstanceId, ValueQuery>;

    /// The immutable configuration of each instance.
    #[pallet::storage]
    #[pallet::getter(fn instances)]
    pub type Instances<T: Config> =
        StorageMap<_, Twox64Concat, InstanceId, VestedTokenInfoOf<T>, OptionQuery>;

    /// The amount of wrapped tokens minted by each instance.
    #[pallet::storage]
    #[pallet::getter(fn total_supply)]
    pub type TotalSupply<T: Config> =
        StorageMap<_, Twox64Concat, InstanceId, T::Balance, ValueQuery>;

    /// The holder records.
    /// (Instance => Holder => Record).
    #[pallet::storage]
    pub type Holders<T: Config> = StorageDoubleMap<
        _,
        Twox64Concat,
        InstanceId,
        Blake2_128Concat,
        AccountIdOf<T>,
        HolderRecordOf<T>,
        OptionQuery,
    >;

    /// ERC20-style approvals data.
    /// (Instance => Owner => Allowed => Amount).
    #[pallet::storage]
    pub type Approvals<T: Config> = StorageNMap<
        _,
        (
            NMapKey<Twox64Concat, InstanceId>,
            NMapKey<Blake2_128Concat, AccountIdOf<T>>,
            NMapKey<Blake2_128Concat, AccountIdOf<T>>,
        ),
        T::Balance,
        ValueQuery,
    >;

    #[pallet::genesis_config]
    #[derive(frame_support::DefaultNoBound)]
    pub struct GenesisConfig<T: Config> {
        /// The instances to create at genesis.
        pub instances: Vec<VestedTokenInfoOf<T>>,
    }

    // The build of genesis for the pallet.
    #[pallet::genesis_build]
    impl<T: Config> GenesisBuild<T> for GenesisConfig<T> {
        fn build(&self) {
            for info in &self.instances {
                let result = <Pallet<T>>::insert_instance(info.clone(), |asset_id, custodian| {
                    T::Custody::open_at_genesis(asset_id, custodian)
                });
                if let Err(err) = result {
                    panic!("unable to create a vested token instance at genesis: {err:?}");
                }
            }
        }
    }

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        /// A new instance was created.
        InstanceCreated {
            /// The id of the created instance.
            instance_id: InstanceId,
            /// The asset the instance wraps.
            underlying_asset_id: T::UnderlyingAssetId,
            /// The vesting window of the instance.
            vesting: LinearVesting<T::Moment>,
        },
        /// The underlying asset was wrapped.
        Wrapped {
            /// The instance the tokens were minted by.
            instance_id: InstanceId,
            /// The account the underlying asset was taken from.
            payer: T::AccountId,
            /// The account the wrapped tokens were minted to.
            recipient: T::AccountId,
            /// The amount of underlying asset deposited.
            underlying_amount: T::Balance,
            /// The amount of wrapped tokens minted.
            wrapped_amount: T::Balance,
            /// The amount credited to the recipient as already claimed.
            pre_claimed: T::Balance,
        },
        /// The vested underlying asset was redeemed.
        Redeemed {
            /// The instance the asset was redeemed from.
            instance_id: InstanceId,
            /// The holder the claim was realized for.
            holder: T::AccountId,
            /// The account the underlying asset was sent to.
            recipient: T::AccountId,
            /// The amount of underlying asset paid out.
            amount: T::Balance,
        },
        /// Wrapped tokens were moved between accounts.
        Transfer {
            /// The instance of the tokens.
            instance_id: InstanceId,
            /// The account the tokens were taken from.
            from: T::AccountId,
            /// The account the tokens were sent to.
            to: T::AccountId,
            /// The amount of tokens moved.
            amount: T::Balance,
        },
        /// The allowance of a spender was set.
        Approval {
            /// The instance of the tokens.
            instance_id: InstanceId,
            /// The account owning the tokens.
            owner: T::AccountId,
            /// The account allowed to spend the tokens.
            spender: T::AccountId,
            /// The allowed amount.
            amount: T::Balance,
        },
    }

    #[pallet::error]
    pub enum Error<T> {
        /// No instance exists with a given id.
        UnknownInstance,
        /// The vesting window end is not after its start.
        InvalidTimeRange,
        /// The vesting is already over, wrapping is no longer possible.
        VestOver,
        /// The amount to wrap is too large for the vesting window.
        AmountTooLarge,
        /// The amount exceeds the holder balance.
        InsufficientBalance,
        /// The amount exceeds the spender allowance.
        InsufficientAllowance,
        /// All the instance ids were used up.
        NoInstanceIdsLeft,
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        /// Create a new vested token instance.
        ///
        /// The caller pays for opening the custody of the instance.
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::create())]
        pub fn create(
            origin: OriginFor<T>,
            name: MetadataTextOf<T>,
            symbol: MetadataTextOf<T>,
            decimals: u8,
            underlying_asset_id: T::UnderlyingAssetId,
            start: T::Moment,
            end: T::Moment,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;

            Self::create_instance(
                &who,
                VestedTokenInfo {
                    metadata: TokenMetadata {
                        name,
                        symbol,
                        decimals,
                    },
                    underlying_asset_id,
                    vesting: LinearVesting { start, end },
                },
            )?;

            Ok(())
        }

        /// Deposit the underlying asset and mint the wrapped tokens to the `recipient`.
        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::wrap())]
        pub fn wrap(
            origin: OriginFor<T>,
            instance_id: InstanceId,
            underlying_amount: T::Balance,
            recipient: T::AccountId,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_wrap(instance_id, &who, underlying_amount, &recipient)?;
            Ok(())
        }

        /// Pay out the vested and not yet redeemed underlying asset to the `recipient`.
        #[pallet::call_index(2)]
        #[pallet::weight(T::WeightInfo::redeem())]
        pub fn redeem(
            origin: OriginFor<T>,
            instance_id: InstanceId,
            recipient: T::AccountId,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_redeem(instance_id, &who, &recipient)?;
            Ok(())
        }

        /// Transfer wrapped tokens.
        #[pallet::call_index(3)]
        #[pallet::weight(T::WeightInfo::transfer())]
        pub fn transfer(
            origin: OriginFor<T>,
            instance_id: InstanceId,
            to: T::AccountId,
            amount: T::Balance,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_transfer(instance_id, &who, &to, amount)
        }

        /// Transfer wrapped tokens on behalf of the owner, spending the allowance.
        #[pallet::call_index(4)]
        #[pallet::weight(T::WeightInfo::transfer_from())]
        pub fn transfer_from(
            origin: OriginFor<T>,
            instance_id: InstanceId,
            from: T::AccountId,
            to: T::AccountId,
            amount: T::Balance,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_transfer_from(instance_id, &who, &from, &to, amount)
        }

        /// Set the allowance of the `spender` over the tokens of the caller.
        #[pallet::call_index(5)]
        #[pallet::weight(T::WeightInfo::approve())]
        pub fn approve(
            origin: OriginFor<T>,
            instance_id: InstanceId,
            spender: T::AccountId,
            amount: T::Balance,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_approve(instance_id, &who, &spender, amount)
        }
    }
}

impl<T: Config> Pallet<T> {
    /// Create a new instance with the given configuration, opening its custody at
    /// the expense of the `creator`.
    ///
    /// The configuration is never changed afterwards.
    pub fn create_instance(
        creator: &T::AccountId,
        info: VestedTokenInfoOf<T>,
    ) -> Result<InstanceId, DispatchError> {
        with_storage_layer(move || {
            Self::insert_instance(info, |asset_id, custodian| {
                T::Custody::open(asset_id, creator, custodian)
            })
        })
    }

    /// Wrap `underlying_amount` of the underlying asset taken from the `payer`, minting the
    /// wrapped tokens to the `recipient`.
    ///
    /// Returns the amount of the wrapped tokens minted.
    pub fn do_wrap(
        instance_id: InstanceId,
        payer: &T::AccountId,
        underlying_amount: T::Balance,
        recipient: &T::AccountId,
    ) -> Result<T::Balance, DispatchError> {
        with_storage_layer(|| {
            let info = Self::instance_info(instance_id)?;
            let now = T::Now::get();

            let logic::Mint {
                wrapped,
                pre_claimed,
            } = Self::compute_mint(&info.vesting, underlying_amount, now)?;

            Self::try_mutate_holder(instance_id, recipient, |record| {
                record.balance = record
                    .balance
                    .checked_add(&wrapped)
                    .ok_or(logic::OVERFLOW_ERROR)?;
                record.claimed = record
                    .claimed
                    .checked_add(&pre_claimed)
                    .ok_or(logic::OVERFLOW_ERROR)?;
                Ok(())
            })?;

            <TotalSupply<T>>::try_mutate(instance_id, |total_supply| -> DispatchResult {
                *total_supply = total_supply
                    .checked_add(&wrapped)
                    .ok_or(logic::OVERFLOW_ERROR)?;
                Ok(())
            })?;

            T::Custody::pull(
                &info.underlying_asset_id,
                payer,
                &Self::custody_account_id(instance_id),
                underlying_amount,
            )?;

            frame_support::log::debug!(
                target: LOG_TARGET,
                "instance {instance_id}: wrapped {underlying_amount:?} into {wrapped:?}, {pre_claimed:?} pre-claimed"
            );

            Self::deposit_event(Event::Wrapped {
                instance_id,
                payer: payer.clone(),
                recipient: recipient.clone(),
                underlying_amount,
                wrapped_amount: wrapped,
                pre_claimed,
            });

            Ok(wrapped)
        })
    }

    /// Pay out the vested and not yet redeemed underlying asset of the `holder` to the
    /// `recipient`.
    ///
    /// Returns the amount paid out; redeeming nothing is not an error.
    pub fn do_redeem(
        instance_id: InstanceId,
        holder: &T::AccountId,
        recipient: &T::AccountId,
    ) -> Result<T::Balance, DispatchError> {
        with_storage_layer(|| {
            let info = Self::instance_info(instance_id)?;
            let now = T::Now::get();

            let redeemable = Self::try_mutate_holder(instance_id, holder, |record| {
                let redeemable = Self::compute_redeemable(&info.vesting, record, now)?;
                record.claimed = record
                    .claimed
                    .checked_add(&redeemable)
                    .ok_or(logic::OVERFLOW_ERROR)?;
                Ok(redeemable)
            })?;

            if redeemable.is_zero() {
                return Ok(redeemable);
            }

            T::Custody::push(
                &info.underlying_asset_id,
                &Self::custody_account_id(instance_id),
                recipient,
                redeemable,
            )?;

            frame_support::log::debug!(
                target: LOG_TARGET,
                "instance {instance_id}: redeemed {redeemable:?}"
            );

            Self::deposit_event(Event::Redeemed {
                instance_id,
                holder: holder.clone(),
                recipient: recipient.clone(),
                amount: redeemable,
            });

            Ok(redeemable)
        })
    }

    /// Transfer `amount` of the wrapped tokens.
    pub fn do_transfer(
        instance_id: InstanceId,
        from: &T::AccountId,
        to: &T::AccountId,
        amount: T::Balance,
    ) -> DispatchResult {
        with_storage_layer(|| {
            Self::ensure_instance_exists(instance_id)?;
            Self::move_balance(instance_id, from, to, amount)
        })
    }

    /// Transfer `amount` of the wrapped tokens on behalf of the owner `from`, spending
    /// the allowance of the `spender`.
    pub fn do_transfer_from(
        instance_id: InstanceId,
        spender: &T::AccountId,
        from: &T::AccountId,
        to: &T::AccountId,
        amount: T::Balance,
    ) -> DispatchResult {
        with_storage_layer(|| {
            Self::ensure_instance_exists(instance_id)?;
            Self::spend_allowance(instance_id, from, spender, amount)?;
            Self::move_balance(instance_id, from, to, amount)
        })
    }

    /// Set the allowance of the `spender` over the tokens of the `owner`.
    pub fn do_approve(
        instance_id: InstanceId,
        owner: &T::AccountId,
        spender: &T::AccountId,
        amount: T::Balance,
    ) -> DispatchResult {
        with_storage_layer(|| {
            Self::ensure_instance_exists(instance_id)?;

            <Approvals<T>>::insert((instance_id, owner, spender), amount);

            Self::deposit_event(Event::Approval {
                instance_id,
                owner: owner.clone(),
                spender: spender.clone(),
                amount,
            });

            Ok(())
        })
    }

    /// The asset wrapped by the instance.
    pub fn underlying_asset_id(instance_id: InstanceId) -> Option<T::UnderlyingAssetId> {
        <Instances<T>>::get(instance_id).map(|info| info.underlying_asset_id)
    }

    /// The moment the vesting of the instance starts at.
    pub fn start_time(instance_id: InstanceId) -> Option<T::Moment> {
        <Instances<T>>::get(instance_id).map(|info| info.vesting.start)
    }

    /// The moment everything held by the instance is vested at.
    pub fn end_time(instance_id: InstanceId) -> Option<T::Moment> {
        <Instances<T>>::get(instance_id).map(|info| info.vesting.end)
    }

    /// The ERC20 metadata of the instance.
    pub fn metadata(instance_id: InstanceId) -> Option<TokenMetadataOf<T>> {
        <Instances<T>>::get(instance_id).map(|info| info.metadata)
    }

    /// The amount of the wrapped tokens held.
    pub fn balance_of(instance_id: InstanceId, who: &T::AccountId) -> T::Balance {
        <Holders<T>>::get(instance_id, who)
            .map(|record| record.balance)
            .unwrap_or_default()
    }

    /// The amount of the underlying asset already claimed.
    pub fn claimed_amount(instance_id: InstanceId, who: &T::AccountId) -> T::Balance {
        <Holders<T>>::get(instance_id, who)
            .map(|record| record.claimed)
            .unwrap_or_default()
    }

    /// The amount the `spender` is allowed to transfer on behalf of the `owner`.
    pub fn allowance(
        instance_id: InstanceId,
        owner: &T::AccountId,
        spender: &T::AccountId,
    ) -> T::Balance {
        <Approvals<T>>::get((instance_id, owner, spender))
    }

    /// The amount of the underlying asset the holder can redeem right now.
    pub fn redeemable_amount(
        instance_id: InstanceId,
        who: &T::AccountId,
    ) -> Result<T::Balance, DispatchError> {
        let info = Self::instance_info(instance_id)?;
        let record = <Holders<T>>::get(instance_id, who).unwrap_or_default();
        Self::compute_redeemable(&info.vesting, &record, T::Now::get())
    }

    /// Compute the redeemable amount for the runtime API.
    pub fn evaluate_redeemable_amount(
        instance_id: InstanceId,
        who: &T::AccountId,
    ) -> Result<T::Balance, api::EvaluationError> {
        if !<Instances<T>>::contains_key(instance_id) {
            return Err(api::EvaluationError::UnknownInstance);
        }
        Self::redeemable_amount(instance_id, who).map_err(api::EvaluationError::Computation)
    }

    /// The account holding the underlying asset of the instance.
    pub fn custody_account_id(instance_id: InstanceId) -> T::AccountId {
        T::PalletId::get().into_sub_account_truncating(instance_id)
    }

    /// Validate and store the instance configuration.
    fn insert_instance(
        info: VestedTokenInfoOf<T>,
        open_custody: impl FnOnce(&T::UnderlyingAssetId, &T::AccountId) -> DispatchResult,
    ) -> Result<InstanceId, DispatchError> {
        info.vesting
            .validate()
            .map_err(|_| <Error<T>>::InvalidTimeRange)?;

        let instance_id = <NextInstanceId<T>>::get();
        let next_instance_id = instance_id
            .checked_add(1)
            .ok_or(<Error<T>>::NoInstanceIdsLeft)?;
        <NextInstanceId<T>>::put(next_instance_id);

        open_custody(
            &info.underlying_asset_id,
            &Self::custody_account_id(instance_id),
        )?;

        <Instances<T>>::insert(instance_id, &info);

        frame_support::log::info!(
            target: LOG_TARGET,
            "created instance {instance_id} vesting from {:?} to {:?}",
            info.vesting.start,
            info.vesting.end,
        );

        Self::deposit_event(Event::InstanceCreated {
            instance_id,
            underlying_asset_id: info.underlying_asset_id,
            vesting: info.vesting,
        });

        Ok(instance_id)
    }

    /// Load the configuration of an existing instance.
    fn instance_info(instance_id: InstanceId) -> Result<VestedTokenInfoOf<T>, DispatchError> {
        <Instances<T>>::get(instance_id).ok_or_else(|| <Error<T>>::UnknownInstance.into())
    }

    /// Ensure the instance exists.
    fn ensure_instance_exists(instance_id: InstanceId) -> DispatchResult {
        if !<Instances<T>>::contains_key(instance_id) {
            return Err(<Error<T>>::UnknownInstance.into());
        }
        Ok(())
    }

    /// Mutate the holder record, removing it from the storage once it is empty.
    fn try_mutate_holder<R>(
        instance_id: InstanceId,
        who: &T::AccountId,
        f: impl FnOnce(&mut HolderRecordOf<T>) -> Result<R, DispatchError>,
    ) -> Result<R, DispatchError> {
        <Holders<T>>::try_mutate_exists(instance_id, who, |maybe_record| {
            let mut record = maybe_record.take().unwrap_or_default();
            let result = f(&mut record)?;
            *maybe_record = (!record.is_empty()).then_some(record);
            Ok(result)
        })
    }

    /// Decrease the allowance, unless it is unlimited.
    fn spend_allowance(
        instance_id: InstanceId,
        owner: &T::AccountId,
        spender: &T::AccountId,
        amount: T::Balance,
    ) -> DispatchResult {
        <Approvals<T>>::try_mutate((instance_id, owner, spender), |allowance| {
            if *allowance == T::Balance::max_value() {
                return Ok(());
            }
            *allowance = allowance
                .checked_sub(&amount)
                .ok_or(<Error<T>>::InsufficientAllowance)?;
            Ok(())
        })
    }

    /// Move the balance and the proportional share of the claimed amount.
    fn move_balance(
        instance_id: InstanceId,
        from: &T::AccountId,
        to: &T::AccountId,
        amount: T::Balance,
    ) -> DispatchResult {
        let claimed_to_transfer = Self::try_mutate_holder(instance_id, from, |record| {
            let claimed_to_transfer = Self::compute_claimed_to_transfer(record, amount)?;
            // Both fit: `amount` is within the balance, and so the share is within `claimed`.
            record.balance = record.balance.saturating_sub(amount);
            record.claimed = record.claimed.saturating_sub(claimed_to_transfer);
            Ok(claimed_to_transfer)
        })?;

        Self::try_mutate_holder(instance_id, to, |record| {
            record.balance = record
                .balance
                .checked_add(&amount)
                .ok_or(logic::OVERFLOW_ERROR)?;
            record.claimed = record
                .claimed
                .checked_add(&claimed_to_transfer)
                .ok_or(logic::OVERFLOW_ERROR)?;
            Ok(())
        })?;

        Self::deposit_event(Event::Transfer {
            instance_id,
            from: from.clone(),
            to: to.clone(),
            amount,
        });

        Ok(())
    }
}
