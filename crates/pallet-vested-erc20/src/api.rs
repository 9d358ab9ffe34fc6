//! The runtime APIs.

use codec::{Decode, Encode};
use frame_support::sp_runtime::DispatchError;
use scale_info::TypeInfo;

use crate::types::InstanceId;

/// An error that can occur while evaluating the redeemable amount.
#[derive(Debug, Encode, Decode, PartialEq, Eq, TypeInfo)]
pub enum EvaluationError {
    /// No instance is found for the given id.
    UnknownInstance,
    /// Something went wrong during the computation.
    Computation(DispatchError),
}

sp_api::decl_runtime_apis! {
    /// A runtime API for evaluating the vested token ledger.
    pub trait VestedErc20Api<AccountId, Balance>
    where
        AccountId: Encode,
        Balance: Decode,
    {
        /// Compute the amount of the underlying asset the holder can redeem right now.
        fn redeemable_amount(
            instance_id: InstanceId,
            holder: &AccountId,
        ) -> Result<Balance, EvaluationError>;
    }
}
