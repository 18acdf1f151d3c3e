//! Settlement contract boundary.
//!
//! The contract is a black-box ledger: it holds stakes and executes payout
//! and distribution atomically. Each call is a separate authorized
//! transaction scoped to the address-derived bounty account.

use async_trait::async_trait;
use seek_types::{SettlementAccount, SettlementTx};

use crate::error::SettlementError;

#[async_trait]
pub trait SettlementContract: Send + Sync {
    /// Prove the commitment made at bounty start, unlocking the stored
    /// target for on-chain record.
    async fn reveal_mission(
        &self,
        account: &SettlementAccount,
        secret_a: [u8; 32],
        secret_b: [u8; 32],
    ) -> Result<SettlementTx, SettlementError>;

    /// Record the adjudicated outcome and open the challenge window.
    async fn propose_resolution(
        &self,
        account: &SettlementAccount,
        success: bool,
    ) -> Result<SettlementTx, SettlementError>;

    /// Execute payout/distribution. Fails with `ChallengePeriodActive`
    /// until the window has elapsed.
    async fn finalize_bounty(
        &self,
        account: &SettlementAccount,
    ) -> Result<SettlementTx, SettlementError>;
}
