//! Settlement error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettlementError {
    /// Finalize attempted before the challenge window elapsed. Retry later;
    /// never a hard error.
    #[error("challenge period still active")]
    ChallengePeriodActive,

    /// The contract rejected the transaction (bad commitment, wrong state).
    #[error("contract rejected transaction: {0}")]
    Rejected(String),

    /// RPC transport failure talking to the ledger.
    #[error("settlement transport error: {0}")]
    Transport(String),
}

impl SettlementError {
    /// Whether the finalization worker should keep the record queued
    /// without counting an attempt.
    pub fn is_retry_later(&self) -> bool {
        matches!(self, SettlementError::ChallengePeriodActive)
    }
}
