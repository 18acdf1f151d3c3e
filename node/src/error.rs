//! Node error type.

use seek_identity::IdentityError;
use seek_settlement::SettlementError;
use seek_store::StoreError;
use seek_types::BountyId;
use seek_verification::VerificationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Settlement(#[from] SettlementError),

    /// An attestation that failed verification. The submission is refused
    /// before any state transition; the bounty stays playable.
    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// Submission arrived after the bounty deadline but before the expiry
    /// sweep got to it.
    #[error("bounty {0} has expired")]
    BountyExpired(BountyId),

    /// The catalog has no mission at the requested tier.
    #[error("no mission available for tier {0}")]
    NoMissionForTier(u8),
}
