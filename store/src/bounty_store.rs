//! Bounty state store: the authoritative record of each bounty's lifecycle.
//!
//! Enforces the single-active-bounty invariant via a wallet→bounty index:
//! at most one bounty per wallet may be in {Pending, Validating} at any
//! time. Transitions are one-directional; no state accepts a transition
//! from a terminal state.

use rand::RngCore;
use seek_types::{
    AttestationKind, Bounty, BountyId, BountyStatus, MissionId, ProtocolParams, SettlementAccount,
    SettlementTx, Tier, Timestamp, WalletAddress,
};
use std::collections::HashMap;

use crate::error::StoreError;

/// In-memory bounty store.
pub struct BountyStore {
    bounties: HashMap<BountyId, Bounty>,
    /// Wallet → its single active (Pending/Validating) bounty.
    active_by_wallet: HashMap<WalletAddress, BountyId>,
}

impl BountyStore {
    pub fn new() -> Self {
        Self {
            bounties: HashMap::new(),
            active_by_wallet: HashMap::new(),
        }
    }

    /// Create a new `Pending` bounty for `wallet`.
    ///
    /// Fails with `ActiveBountyExists` if the wallet already has a bounty in
    /// an active state; no partial state is created in that case.
    pub fn create(
        &mut self,
        wallet: WalletAddress,
        mission_id: MissionId,
        tier: Tier,
        params: &ProtocolParams,
        now: Timestamp,
    ) -> Result<Bounty, StoreError> {
        if let Some(existing) = self.active_by_wallet.get(&wallet) {
            return Err(StoreError::ActiveBountyExists {
                wallet,
                existing: *existing,
            });
        }

        let id = Self::fresh_id();
        let bounty = Bounty {
            id,
            mission_id,
            wallet: wallet.clone(),
            tier,
            stake: params.stake_for(tier),
            status: BountyStatus::Pending,
            created_at: now,
            expires_at: now.plus(params.timer_secs_for(tier)),
            settlement_account: derive_settlement_account(&wallet, &id),
            settlement_tx: None,
            terminal_at: None,
            attested: false,
            attestation_kind: None,
        };
        self.bounties.insert(id, bounty.clone());
        self.active_by_wallet.insert(wallet, id);
        Ok(bounty)
    }

    /// Guard a photo submission: only a `Pending` bounty may move to
    /// `Validating`.
    pub fn mark_validating(&mut self, id: &BountyId) -> Result<(), StoreError> {
        let bounty = self
            .bounties
            .get_mut(id)
            .ok_or(StoreError::BountyNotFound(*id))?;
        if bounty.status != BountyStatus::Pending {
            return Err(StoreError::InvalidTransition {
                id: *id,
                from: bounty.status,
                to: BountyStatus::Validating,
            });
        }
        bounty.status = BountyStatus::Validating;
        Ok(())
    }

    /// Move a bounty to `Won` or `Lost` with its settlement transaction.
    ///
    /// A second call is rejected, not silently overwritten.
    pub fn set_terminal(
        &mut self,
        id: &BountyId,
        status: BountyStatus,
        settlement_tx: SettlementTx,
        now: Timestamp,
    ) -> Result<(), StoreError> {
        debug_assert!(matches!(status, BountyStatus::Won | BountyStatus::Lost));
        let bounty = self
            .bounties
            .get_mut(id)
            .ok_or(StoreError::BountyNotFound(*id))?;
        if bounty.status.is_terminal() {
            return Err(StoreError::InvalidTransition {
                id: *id,
                from: bounty.status,
                to: status,
            });
        }
        bounty.status = status;
        bounty.settlement_tx = Some(settlement_tx);
        bounty.terminal_at = Some(now);
        self.active_by_wallet.remove(&bounty.wallet);
        Ok(())
    }

    /// Put a `Validating` bounty back to `Pending`.
    ///
    /// Used when the settlement leg of a submission fails after the bounty
    /// was marked in-flight; the wallet gets its bounty back and may
    /// resubmit.
    pub fn revert_validating(&mut self, id: &BountyId) -> Result<(), StoreError> {
        let bounty = self
            .bounties
            .get_mut(id)
            .ok_or(StoreError::BountyNotFound(*id))?;
        if bounty.status != BountyStatus::Validating {
            return Err(StoreError::InvalidTransition {
                id: *id,
                from: bounty.status,
                to: BountyStatus::Pending,
            });
        }
        bounty.status = BountyStatus::Pending;
        Ok(())
    }

    /// Record that the submission carried a device attestation.
    pub fn record_attestation(
        &mut self,
        id: &BountyId,
        kind: AttestationKind,
    ) -> Result<(), StoreError> {
        let bounty = self
            .bounties
            .get_mut(id)
            .ok_or(StoreError::BountyNotFound(*id))?;
        bounty.attested = true;
        bounty.attestation_kind = Some(kind);
        Ok(())
    }

    /// Move every `Pending` bounty past its deadline to `Expired`.
    ///
    /// Returns the expired ids so the caller can purge their secrets.
    pub fn sweep_expired(&mut self, now: Timestamp) -> Vec<BountyId> {
        let mut expired = Vec::new();
        for bounty in self.bounties.values_mut() {
            if bounty.status == BountyStatus::Pending && now >= bounty.expires_at {
                bounty.status = BountyStatus::Expired;
                bounty.terminal_at = Some(now);
                self.active_by_wallet.remove(&bounty.wallet);
                expired.push(bounty.id);
            }
        }
        if !expired.is_empty() {
            tracing::info!(count = expired.len(), "expired pending bounties");
        }
        expired
    }

    /// Delete terminal bounties older than the retention horizon.
    ///
    /// Returns the purged ids so the caller can delete any remaining
    /// mission secrets and index entries.
    pub fn purge_terminal(&mut self, retention_secs: u64, now: Timestamp) -> Vec<BountyId> {
        let purged: Vec<BountyId> = self
            .bounties
            .values()
            .filter(|b| {
                b.status.is_terminal()
                    && b.terminal_at
                        .is_some_and(|t| t.has_expired(retention_secs, now))
            })
            .map(|b| b.id)
            .collect();
        for id in &purged {
            self.bounties.remove(id);
        }
        if !purged.is_empty() {
            tracing::debug!(count = purged.len(), "purged terminal bounties");
        }
        purged
    }

    pub fn get(&self, id: &BountyId) -> Option<&Bounty> {
        self.bounties.get(id)
    }

    /// The wallet's active bounty, if any.
    pub fn active_for_wallet(&self, wallet: &WalletAddress) -> Option<&Bounty> {
        self.active_by_wallet
            .get(wallet)
            .and_then(|id| self.bounties.get(id))
    }

    /// Number of bounties currently in an active state.
    pub fn active_count(&self) -> usize {
        self.active_by_wallet.len()
    }

    pub fn len(&self) -> usize {
        self.bounties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounties.is_empty()
    }

    fn fresh_id() -> BountyId {
        let mut bytes = [0u8; 16];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        BountyId::new(bytes)
    }
}

impl Default for BountyStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive the contract-side bounty account reference from the wallet and
/// bounty id. Deterministic, mirroring the contract's address derivation.
fn derive_settlement_account(wallet: &WalletAddress, id: &BountyId) -> SettlementAccount {
    let digest = seek_crypto::sha256_pair(wallet.as_str().as_bytes(), id.as_bytes());
    SettlementAccount::new(format!("seekacct_{}", hex::encode(&digest[..16])))
}
