//! The weights.

use frame_support::weights::Weight;

/// The weight information trait, to be implemented in from the benches.
pub trait WeightInfo {
    /// Weight for the create call.
    fn create() -> Weight;
    /// Weight for the wrap call.
    fn wrap() -> Weight;
    /// Weight for the redeem call.
    fn redeem() -> Weight;
    /// Weight for the transfer call.
    fn transfer() -> Weight;
    /// Weight for the transfer_from call.
    fn transfer_from() -> Weight;
    /// Weight for the approve call.
    fn approve() -> Weight;
}

impl WeightInfo for () {
    fn create() -> Weight {
        Weight::zero()
    }

    fn wrap() -> Weight {
        Weight::zero()
    }

    fn redeem() -> Weight {
        Weight::zero()
    }

    fn transfer() -> Weight {
        Weight::zero()
    }

    fn transfer_from() -> Weight {
        Weight::zero()
    }

    fn approve() -> Weight {
        Weight::zero()
    }
}
