//! The mock for the pallet.

use frame_support::{
    parameter_types, sp_io,
    sp_runtime::{
        testing::Header,
        traits::{BlakeTwo256, IdentityLookup},
        BuildStorage,
    },
    traits::{ConstU32, ConstU64},
    PalletId,
};
use sp_core::H256;

use crate::{
    self as pallet_vested_erc20,
    adapters::{SingleCurrencyCustody, UnixTimeSeconds},
};

mod utils;
pub use self::utils::*;

type UncheckedExtrinsic = frame_system::mocking::MockUncheckedExtrinsic<Test>;
type Block = frame_system::mocking::MockBlock<Test>;

// Wide enough for the custody sub-accounts of different instances not to collide.
pub type AccountId = u128;
pub type Balance = u64;
pub type AssetId = u32;

pub const NATIVE_ASSET_ID: AssetId = 0;

frame_support::construct_runtime!(
    pub struct Test
    where
        Block = Block,
        NodeBlock = Block,
        UncheckedExtrinsic = UncheckedExtrinsic,
    {
        System: frame_system,
        Timestamp: pallet_timestamp,
        Balances: pallet_balances,
        VestedErc20: pallet_vested_erc20,
    }
);

impl frame_system::Config for Test {
    type BaseCallFilter = frame_support::traits::Everything;
    type BlockWeights = ();
    type BlockLength = ();
    type DbWeight = ();
    type RuntimeOrigin = RuntimeOrigin;
    type RuntimeCall = RuntimeCall;
    type Index = u64;
    type BlockNumber = u64;
    type Hash = H256;
    type Hashing = BlakeTwo256;
    type AccountId = AccountId;
    type Lookup = IdentityLookup<AccountId>;
    type Header = Header;
    type RuntimeEvent = RuntimeEvent;
    type BlockHashCount = ConstU64<250>;
    type Version = ();
    type PalletInfo = PalletInfo;
    type AccountData = pallet_balances::AccountData<Balance>;
    type OnNewAccount = ();
    type OnKilledAccount = ();
    type SystemWeightInfo = ();
    type SS58Prefix = ();
    type OnSetCode = ();
    type MaxConsumers = ConstU32<16>;
}

impl pallet_timestamp::Config for Test {
    type Moment = u64;
    type OnTimestampSet = ();
    type MinimumPeriod = ConstU64<1>;
    type WeightInfo = ();
}

impl pallet_balances::Config for Test {
    type Balance = Balance;
    type RuntimeEvent = RuntimeEvent;
    type DustRemoval = ();
    type ExistentialDeposit = ExistentialDeposit;
    type AccountStore = System;
    type MaxLocks = ();
    type HoldIdentifier = ();
    type FreezeIdentifier = ();
    type MaxReserves = ();
    type MaxHolds = ConstU32<0>;
    type MaxFreezes = ConstU32<0>;
    type ReserveIdentifier = [u8; 8];
    type WeightInfo = ();
}

parameter_types! {
    pub static ExistentialDeposit: Balance = 1;
}

parameter_types! {
    pub const VestedErc20PalletId: PalletId = PalletId(*b"vstderc2");
    pub const NativeAssetId: AssetId = NATIVE_ASSET_ID;
}

impl pallet_vested_erc20::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type Balance = Balance;
    type Moment = u64;
    type UnderlyingAssetId = AssetId;
    type Custody = SingleCurrencyCustody<Balances, AssetId, NativeAssetId>;
    type Now = UnixTimeSeconds<Timestamp>;
    type PalletId = VestedErc20PalletId;
    type MaxMetadataLength = ConstU32<32>;
    type WeightInfo = ();
}

pub fn new_test_ext() -> sp_io::TestExternalities {
    let genesis_config = GenesisConfig::default();
    new_test_ext_with(genesis_config)
}

// This function basically just builds a genesis storage key/value store according to
// our desired mockup.
pub fn new_test_ext_with(genesis_config: GenesisConfig) -> sp_io::TestExternalities {
    let storage = genesis_config.build_storage().unwrap();
    let mut ext: sp_io::TestExternalities = storage.into();
    // No events are deposited at the genesis block.
    ext.execute_with(|| System::set_block_number(1));
    ext
}
