//! Mock utils.

// Allow simple integer arithmetic in tests.
#![allow(clippy::arithmetic_side_effects)]

use frame_support::traits::Currency;

use super::*;
use crate::{InstanceId, LinearVesting, MetadataTextOf, TokenMetadata, VestedTokenInfo};

pub fn runtime_lock() -> std::sync::MutexGuard<'static, ()> {
    static MOCK_RUNTIME_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

    // Ignore the poisoning for the tests that panic.
    // We only care about concurrency here, not about the poisoning.
    match MOCK_RUNTIME_MUTEX.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

pub trait TestExternalitiesExt {
    fn execute_with_ext<R, E>(&mut self, execute: E) -> R
    where
        E: for<'e> FnOnce(&'e ()) -> R;
}

impl TestExternalitiesExt for frame_support::sp_io::TestExternalities {
    fn execute_with_ext<R, E>(&mut self, execute: E) -> R
    where
        E: for<'e> FnOnce(&'e ()) -> R,
    {
        let guard = runtime_lock();
        let result = self.execute_with(|| execute(&guard));
        drop(guard);
        result
    }
}

/// Set the current time, in seconds.
pub fn set_now(seconds: u64) {
    Timestamp::set_timestamp(seconds * 1000);
}

/// Set the free balance of the account.
pub fn fund(who: &AccountId, amount: Balance) {
    let _ = <Balances as Currency<AccountId>>::make_free_balance_be(who, amount);
}

/// The free balance of the account.
pub fn free_balance(who: &AccountId) -> Balance {
    <Balances as Currency<AccountId>>::free_balance(who)
}

/// The free balance of the instance custody, without the existential deposit that keeps
/// the custody account alive.
pub fn custody_balance(instance_id: InstanceId) -> Balance {
    let custody = VestedErc20::custody_account_id(instance_id);
    free_balance(&custody).saturating_sub(ExistentialDeposit::get())
}

/// Make the bounded metadata text.
pub fn text(value: &str) -> MetadataTextOf<Test> {
    value.as_bytes().to_vec().try_into().unwrap()
}

/// Build the instance configuration over the native asset.
pub fn native_token_info(start: u64, end: u64) -> crate::VestedTokenInfoOf<Test> {
    VestedTokenInfo {
        metadata: TokenMetadata {
            name: text("Vested Native"),
            symbol: text("vNAT"),
            decimals: 18,
        },
        underlying_asset_id: NATIVE_ASSET_ID,
        vesting: LinearVesting { start, end },
    }
}

/// The account that creates the instances in tests.
pub const CREATOR: AccountId = 100;

/// Create an instance over the native asset, with the `CREATOR` paying for the custody.
pub fn create_native_instance(start: u64, end: u64) -> InstanceId {
    fund(&CREATOR, ExistentialDeposit::get());
    VestedErc20::create_instance(&CREATOR, native_token_info(start, end)).unwrap()
}
