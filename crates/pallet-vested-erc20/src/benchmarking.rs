//! The benchmarks for the pallet.

// Allow integer arithmetic in tests.
#![allow(clippy::arithmetic_side_effects)]

use frame_benchmarking::benchmarks;
use frame_support::{assert_ok, dispatch::DispatchResult};
use frame_system::RawOrigin;

use crate::*;

/// The benchmark interface into the environment.
pub trait Interface: super::Config {
    /// The data to be passed from `prepare` to `verify`.
    type Data;

    /// Prepare environment.
    fn prepare() -> Self::Data;

    /// Verify environment,
    fn verify(data: Self::Data) -> DispatchResult;

    /// Obtain an Account ID.
    ///
    /// Different indexes must yield different accounts.
    fn account_id(index: u32) -> <Self as frame_system::Config>::AccountId;

    /// Obtain the underlying asset to create the instances over.
    fn underlying_asset_id() -> <Self as Config>::UnderlyingAssetId;

    /// Obtain the vesting window to create the instances with.
    fn vesting() -> LinearVesting<<Self as Config>::Moment>;

    /// Move the clock to the given moment.
    fn set_now(now: <Self as Config>::Moment);

    /// Provide the account with the given amount of the underlying asset.
    ///
    /// The amount returned by `wrap_amount` must be enough to open a custody with.
    fn fund(who: &<Self as frame_system::Config>::AccountId, amount: <Self as Config>::Balance);

    /// Obtain the amount of the underlying asset to wrap.
    fn wrap_amount() -> <Self as Config>::Balance;
}

benchmarks! {
    where_clause {
        where
            T: Interface,
    }

    create {
        let data = <T as Interface>::prepare();

        let caller = <T as Interface>::account_id(0);
        <T as Interface>::fund(&caller, <T as Interface>::wrap_amount());
        let vesting = <T as Interface>::vesting();
        let instance_id = <NextInstanceId<T>>::get();
    }: _(
        RawOrigin::Signed(caller),
        Default::default(),
        Default::default(),
        18,
        <T as Interface>::underlying_asset_id(),
        vesting.start,
        vesting.end
    )
    verify {
        assert!(<Instances<T>>::contains_key(instance_id));
        assert_ok!(<T as Interface>::verify(data));
    }

    wrap {
        let data = <T as Interface>::prepare();

        let instance_id = create_instance::<T>();
        let payer = <T as Interface>::account_id(0);
        let amount = <T as Interface>::wrap_amount();
        <T as Interface>::fund(&payer, amount);
        <T as Interface>::set_now(mid_vesting::<T>());
    }: _(RawOrigin::Signed(payer.clone()), instance_id, amount, payer.clone())
    verify {
        assert!(<Pallet<T>>::balance_of(instance_id, &payer) > amount);
        assert_ok!(<T as Interface>::verify(data));
    }

    redeem {
        let data = <T as Interface>::prepare();

        let instance_id = create_instance::<T>();
        let holder = <T as Interface>::account_id(0);
        let amount = <T as Interface>::wrap_amount();
        <T as Interface>::fund(&holder, amount);
        <T as Interface>::set_now(<T as Interface>::vesting().start);
        <Pallet<T>>::do_wrap(instance_id, &holder, amount, &holder)?;
        <T as Interface>::set_now(mid_vesting::<T>());
    }: _(RawOrigin::Signed(holder.clone()), instance_id, holder.clone())
    verify {
        assert!(!<Pallet<T>>::claimed_amount(instance_id, &holder).is_zero());
        assert_ok!(<T as Interface>::verify(data));
    }

    transfer {
        let data = <T as Interface>::prepare();

        let (instance_id, from, balance) = prepare_holder::<T>()?;
        let to = <T as Interface>::account_id(1);
        let amount = balance / 3u32.into();
    }: _(RawOrigin::Signed(from.clone()), instance_id, to.clone(), amount)
    verify {
        assert_eq!(<Pallet<T>>::balance_of(instance_id, &to), amount);
        assert!(!<Pallet<T>>::claimed_amount(instance_id, &to).is_zero());
        assert_ok!(<T as Interface>::verify(data));
    }

    transfer_from {
        let data = <T as Interface>::prepare();

        let (instance_id, from, balance) = prepare_holder::<T>()?;
        let spender = <T as Interface>::account_id(1);
        let to = <T as Interface>::account_id(2);
        let amount = balance / 3u32.into();
        <Pallet<T>>::do_approve(instance_id, &from, &spender, balance)?;
    }: _(RawOrigin::Signed(spender.clone()), instance_id, from.clone(), to.clone(), amount)
    verify {
        assert_eq!(<Pallet<T>>::balance_of(instance_id, &to), amount);
        assert_eq!(<Pallet<T>>::allowance(instance_id, &from, &spender), balance - amount);
        assert_ok!(<T as Interface>::verify(data));
    }

    approve {
        let data = <T as Interface>::prepare();

        let instance_id = create_instance::<T>();
        let owner = <T as Interface>::account_id(0);
        let spender = <T as Interface>::account_id(1);
        let amount = <T as Interface>::wrap_amount();
    }: _(RawOrigin::Signed(owner.clone()), instance_id, spender.clone(), amount)
    verify {
        assert_eq!(<Pallet<T>>::allowance(instance_id, &owner, &spender), amount);
        assert_ok!(<T as Interface>::verify(data));
    }

    impl_benchmark_test_suite!(
        Pallet,
        crate::mock::new_test_ext(),
        crate::mock::Test,
    );
}

/// Create an instance with the configured vesting window.
fn create_instance<T: Interface>() -> InstanceId {
    let creator = <T as Interface>::account_id(3);
    <T as Interface>::fund(&creator, <T as Interface>::wrap_amount());

    let info = VestedTokenInfo {
        metadata: TokenMetadata {
            name: Default::default(),
            symbol: Default::default(),
            decimals: 18,
        },
        underlying_asset_id: <T as Interface>::underlying_asset_id(),
        vesting: <T as Interface>::vesting(),
    };
    <Pallet<T>>::create_instance(&creator, info).unwrap()
}

/// The middle of the configured vesting window.
fn mid_vesting<T: Interface>() -> <T as Config>::Moment {
    let vesting = <T as Interface>::vesting();
    vesting.start + (vesting.end - vesting.start) / 2u32.into()
}

/// Prepare a holder that has both a balance and a claimed amount.
fn prepare_holder<T: Interface>() -> Result<
    (
        InstanceId,
        <T as frame_system::Config>::AccountId,
        <T as Config>::Balance,
    ),
    DispatchError,
> {
    let instance_id = create_instance::<T>();
    let holder = <T as Interface>::account_id(0);
    let amount = <T as Interface>::wrap_amount();
    <T as Interface>::fund(&holder, amount);
    <T as Interface>::set_now(mid_vesting::<T>());
    let balance = <Pallet<T>>::do_wrap(instance_id, &holder, amount, &holder)?;
    Ok((instance_id, holder, balance))
}

#[cfg(test)]
impl Interface for crate::mock::Test {
    type Data = std::sync::MutexGuard<'static, ()>;

    fn prepare() -> Self::Data {
        mock::runtime_lock()
    }

    fn verify(data: Self::Data) -> DispatchResult {
        let mock_runtime_guard = data;
        drop(mock_runtime_guard);
        Ok(())
    }

    fn account_id(index: u32) -> <Self as frame_system::Config>::AccountId {
        1000 + mock::AccountId::from(index)
    }

    fn underlying_asset_id() -> <Self as Config>::UnderlyingAssetId {
        mock::NATIVE_ASSET_ID
    }

    fn vesting() -> LinearVesting<<Self as Config>::Moment> {
        LinearVesting {
            start: 1_000,
            end: 2_000,
        }
    }

    fn set_now(now: <Self as Config>::Moment) {
        mock::set_now(now)
    }

    fn fund(who: &<Self as frame_system::Config>::AccountId, amount: <Self as Config>::Balance) {
        mock::fund(who, amount)
    }

    fn wrap_amount() -> <Self as Config>::Balance {
        1000
    }
}
