//! Store error type.

use seek_types::{BountyId, BountyStatus, WalletAddress};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The wallet already has a bounty in an active state.
    #[error("wallet {wallet} already has an active bounty {existing}")]
    ActiveBountyExists {
        wallet: WalletAddress,
        existing: BountyId,
    },

    #[error("bounty {0} not found")]
    BountyNotFound(BountyId),

    /// A transition that the lifecycle state machine forbids.
    #[error("bounty {id}: cannot transition from {from:?} to {to:?}")]
    InvalidTransition {
        id: BountyId,
        from: BountyStatus,
        to: BountyStatus,
    },

    /// Mission secret absent at reveal time. The bounty must have been
    /// started through the commitment path, so this is an integrity fault.
    #[error("mission secret missing for bounty {0}")]
    SecretMissing(BountyId),

    #[error("mission {0} not found in catalog")]
    MissionNotFound(String),
}
