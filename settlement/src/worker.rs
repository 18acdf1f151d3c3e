//! Finalization worker: retries the finalize leg with bounded attempts.
//!
//! Each pass snapshots the due records, then performs I/O per item without
//! holding the queue lock, updating the queue only after each item's
//! outcome is known. A crash mid-pass loses progress on the in-flight item
//! only.

use seek_types::{SettlementAccount, Timestamp};
use std::sync::{Arc, Mutex};

use crate::contract::SettlementContract;
use crate::queue::FinalizationQueue;

/// Outcome counts for one worker pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FinalizePassStats {
    pub finalized: usize,
    /// Contract said the window is still active; record left untouched.
    pub deferred: usize,
    /// Hard failure; attempt counted, record kept for retry.
    pub failed: usize,
    /// Attempt ceiling hit; record removed permanently.
    pub exhausted: usize,
}

pub struct FinalizationWorker {
    contract: Arc<dyn SettlementContract>,
    queue: Arc<Mutex<FinalizationQueue>>,
    max_attempts: u32,
    /// Settlement references that exhausted their attempts. Surfaced by the
    /// operational status report; a stuck settlement is an alert condition,
    /// never a silent drop.
    stuck: Mutex<Vec<SettlementAccount>>,
}

impl FinalizationWorker {
    pub fn new(
        contract: Arc<dyn SettlementContract>,
        queue: Arc<Mutex<FinalizationQueue>>,
        max_attempts: u32,
    ) -> Self {
        Self {
            contract,
            queue,
            max_attempts,
            stuck: Mutex::new(Vec::new()),
        }
    }

    /// Run one poll pass: attempt every due record.
    pub async fn run_once(&self, now: Timestamp) -> FinalizePassStats {
        let due = {
            let queue = self.queue.lock().expect("finalization queue poisoned");
            queue.due(now)
        };

        let mut stats = FinalizePassStats::default();
        for record in due {
            match self.contract.finalize_bounty(&record.account).await {
                Ok(tx) => {
                    let mut queue = self.queue.lock().expect("finalization queue poisoned");
                    queue.remove(&record.account);
                    stats.finalized += 1;
                    tracing::info!(
                        account = %record.account,
                        wallet = %record.wallet,
                        tx = tx.as_str(),
                        "settlement finalized"
                    );
                }
                Err(e) if e.is_retry_later() => {
                    stats.deferred += 1;
                    tracing::debug!(
                        account = %record.account,
                        "challenge period still active, will retry"
                    );
                }
                Err(e) => {
                    let attempts = {
                        let mut queue = self.queue.lock().expect("finalization queue poisoned");
                        queue.record_attempt(&record.account)
                    };
                    let Some(attempts) = attempts else {
                        continue; // removed concurrently
                    };
                    if attempts >= self.max_attempts {
                        let mut queue = self.queue.lock().expect("finalization queue poisoned");
                        queue.remove(&record.account);
                        drop(queue);
                        self.stuck
                            .lock()
                            .expect("stuck list poisoned")
                            .push(record.account.clone());
                        stats.exhausted += 1;
                        tracing::error!(
                            account = %record.account,
                            wallet = %record.wallet,
                            attempts,
                            "finalization exhausted all attempts; settlement stuck, manual intervention required: {e}"
                        );
                    } else {
                        stats.failed += 1;
                        tracing::warn!(
                            account = %record.account,
                            attempts,
                            max = self.max_attempts,
                            "finalization attempt failed: {e}"
                        );
                    }
                }
            }
        }
        stats
    }

    /// Settlement references that will never be retried automatically.
    pub fn stuck_settlements(&self) -> Vec<SettlementAccount> {
        self.stuck.lock().expect("stuck list poisoned").clone()
    }
}
