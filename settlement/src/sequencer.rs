//! Settlement sequencer: drives the three-phase protocol against the
//! contract.
//!
//! Reveal and propose run synchronously in the photo-submit request path.
//! Finalize must not: the challenge window can exceed any reasonable
//! request latency budget, so the sequencer hands off to the finalization
//! queue and the worker owns the final leg.

use seek_types::{Bounty, SettlementTx, Timestamp};
use std::sync::{Arc, Mutex};

use crate::contract::SettlementContract;
use crate::error::SettlementError;
use crate::queue::{FinalizationQueue, PendingFinalization};

/// The synchronous half of a settlement: reveal and propose transactions,
/// plus when finalize becomes eligible.
#[derive(Clone, Debug)]
pub struct SettlementOutcome {
    pub reveal_tx: SettlementTx,
    pub propose_tx: SettlementTx,
    pub challenge_end: Timestamp,
}

pub struct SettlementSequencer {
    contract: Arc<dyn SettlementContract>,
    queue: Arc<Mutex<FinalizationQueue>>,
    challenge_window_secs: u64,
}

impl SettlementSequencer {
    pub fn new(
        contract: Arc<dyn SettlementContract>,
        queue: Arc<Mutex<FinalizationQueue>>,
        challenge_window_secs: u64,
    ) -> Self {
        Self {
            contract,
            queue,
            challenge_window_secs,
        }
    }

    /// Reveal the committed mission, propose the adjudicated outcome, and
    /// enqueue the deferred finalization.
    ///
    /// Reveal/propose failures surface immediately as request errors and
    /// are not retried here; only the finalize leg is retried, by the
    /// worker.
    pub async fn settle(
        &self,
        bounty: &Bounty,
        secret_a: [u8; 32],
        secret_b: [u8; 32],
        success: bool,
        now: Timestamp,
    ) -> Result<SettlementOutcome, SettlementError> {
        let account = &bounty.settlement_account;

        let reveal_tx = self
            .contract
            .reveal_mission(account, secret_a, secret_b)
            .await?;
        tracing::debug!(bounty = %bounty.id, account = %account, "mission revealed");

        let propose_tx = self.contract.propose_resolution(account, success).await?;
        let challenge_end = now.plus(self.challenge_window_secs);
        tracing::info!(
            bounty = %bounty.id,
            account = %account,
            success,
            challenge_end = challenge_end.as_secs(),
            "resolution proposed, finalization deferred"
        );

        let enqueued = {
            let mut queue = self.queue.lock().expect("finalization queue poisoned");
            queue.enqueue(PendingFinalization {
                account: account.clone(),
                wallet: bounty.wallet.clone(),
                challenge_end,
                attempts: 0,
                enqueued_at: now,
            })
        };
        if !enqueued {
            tracing::debug!(account = %account, "finalization already queued");
        }

        Ok(SettlementOutcome {
            reveal_tx,
            propose_tx,
            challenge_end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use seek_types::{
        BountyId, BountyStatus, MissionId, ProtocolParams, SettlementAccount, Tier, WalletAddress,
    };
    use std::sync::atomic::{AtomicU32, Ordering};

    struct MockContract {
        reveal_calls: AtomicU32,
        propose_calls: AtomicU32,
        fail_reveal: bool,
    }

    impl MockContract {
        fn new(fail_reveal: bool) -> Self {
            Self {
                reveal_calls: AtomicU32::new(0),
                propose_calls: AtomicU32::new(0),
                fail_reveal,
            }
        }
    }

    #[async_trait]
    impl SettlementContract for MockContract {
        async fn reveal_mission(
            &self,
            _account: &SettlementAccount,
            _secret_a: [u8; 32],
            _secret_b: [u8; 32],
        ) -> Result<SettlementTx, SettlementError> {
            self.reveal_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_reveal {
                return Err(SettlementError::Rejected("commitment mismatch".into()));
            }
            Ok(SettlementTx::new("reveal-tx"))
        }

        async fn propose_resolution(
            &self,
            _account: &SettlementAccount,
            _success: bool,
        ) -> Result<SettlementTx, SettlementError> {
            self.propose_calls.fetch_add(1, Ordering::SeqCst);
            Ok(SettlementTx::new("propose-tx"))
        }

        async fn finalize_bounty(
            &self,
            _account: &SettlementAccount,
        ) -> Result<SettlementTx, SettlementError> {
            unreachable!("sequencer never finalizes synchronously")
        }
    }

    fn bounty() -> Bounty {
        let params = ProtocolParams::default();
        Bounty {
            id: BountyId::new([1u8; 16]),
            mission_id: MissionId::new("m-red-hydrant"),
            wallet: WalletAddress::new(format!("skr_{}", "22".repeat(32))),
            tier: Tier::One,
            stake: params.stake_for(Tier::One),
            status: BountyStatus::Validating,
            created_at: Timestamp::new(1000),
            expires_at: Timestamp::new(2200),
            settlement_account: SettlementAccount::new("seekacct_abc"),
            settlement_tx: None,
            terminal_at: None,
            attested: false,
            attestation_kind: None,
        }
    }

    #[tokio::test]
    async fn settle_reveals_proposes_and_enqueues() {
        let contract = Arc::new(MockContract::new(false));
        let queue = Arc::new(Mutex::new(FinalizationQueue::new()));
        let seq = SettlementSequencer::new(contract.clone(), queue.clone(), 300);

        let outcome = seq
            .settle(&bounty(), [1; 32], [2; 32], true, Timestamp::new(5000))
            .await
            .unwrap();

        assert_eq!(contract.reveal_calls.load(Ordering::SeqCst), 1);
        assert_eq!(contract.propose_calls.load(Ordering::SeqCst), 1);
        assert_eq!(outcome.challenge_end, Timestamp::new(5300));
        let queue = queue.lock().unwrap();
        assert_eq!(queue.len(), 1);
        assert!(queue.contains(&SettlementAccount::new("seekacct_abc")));
    }

    #[tokio::test]
    async fn reveal_failure_surfaces_and_skips_propose() {
        let contract = Arc::new(MockContract::new(true));
        let queue = Arc::new(Mutex::new(FinalizationQueue::new()));
        let seq = SettlementSequencer::new(contract.clone(), queue.clone(), 300);

        let result = seq
            .settle(&bounty(), [1; 32], [2; 32], true, Timestamp::new(5000))
            .await;
        assert!(matches!(result, Err(SettlementError::Rejected(_))));
        assert_eq!(contract.propose_calls.load(Ordering::SeqCst), 0);
        assert!(queue.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn double_settle_does_not_duplicate_queue_entry() {
        let contract = Arc::new(MockContract::new(false));
        let queue = Arc::new(Mutex::new(FinalizationQueue::new()));
        let seq = SettlementSequencer::new(contract, queue.clone(), 300);

        let b = bounty();
        seq.settle(&b, [1; 32], [2; 32], true, Timestamp::new(5000))
            .await
            .unwrap();
        seq.settle(&b, [1; 32], [2; 32], true, Timestamp::new(5001))
            .await
            .unwrap();
        assert_eq!(queue.lock().unwrap().len(), 1);
    }
}
