//! Finalization queue: the sole source of truth for "what still needs
//! settling".
//!
//! Settlement finality is gated by a time lock the caller cannot shortcut,
//! and the process may restart between enqueue and eligibility, so pending
//! finalizations live in this queue rather than in fire-and-forget timers.

use seek_types::{SettlementAccount, Timestamp, WalletAddress};
use std::collections::HashMap;

/// A settlement waiting for its challenge window to elapse.
#[derive(Clone, Debug)]
pub struct PendingFinalization {
    pub account: SettlementAccount,
    pub wallet: WalletAddress,
    /// Earliest time finalize can succeed.
    pub challenge_end: Timestamp,
    /// Failed finalize attempts so far (retry-later rejections not counted).
    pub attempts: u32,
    pub enqueued_at: Timestamp,
}

pub struct FinalizationQueue {
    entries: HashMap<SettlementAccount, PendingFinalization>,
}

impl FinalizationQueue {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Enqueue a settlement for deferred finalization.
    ///
    /// Idempotent: a duplicate enqueue for an already-queued account is a
    /// no-op, not a second entry.
    pub fn enqueue(&mut self, record: PendingFinalization) -> bool {
        if self.entries.contains_key(&record.account) {
            return false;
        }
        self.entries.insert(record.account.clone(), record);
        true
    }

    /// Snapshot the records whose challenge window has elapsed.
    pub fn due(&self, now: Timestamp) -> Vec<PendingFinalization> {
        self.entries
            .values()
            .filter(|r| now >= r.challenge_end)
            .cloned()
            .collect()
    }

    /// Remove a settled (or exhausted) record.
    pub fn remove(&mut self, account: &SettlementAccount) -> Option<PendingFinalization> {
        self.entries.remove(account)
    }

    /// Count a failed attempt, returning the new attempt total.
    pub fn record_attempt(&mut self, account: &SettlementAccount) -> Option<u32> {
        let record = self.entries.get_mut(account)?;
        record.attempts += 1;
        Some(record.attempts)
    }

    pub fn contains(&self, account: &SettlementAccount) -> bool {
        self.entries.contains_key(account)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for FinalizationQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(account: &str, challenge_end: u64) -> PendingFinalization {
        PendingFinalization {
            account: SettlementAccount::new(account),
            wallet: WalletAddress::new(format!("skr_{}", "11".repeat(32))),
            challenge_end: Timestamp::new(challenge_end),
            attempts: 0,
            enqueued_at: Timestamp::new(0),
        }
    }

    #[test]
    fn enqueue_is_idempotent() {
        let mut queue = FinalizationQueue::new();
        assert!(queue.enqueue(record("acct-1", 100)));
        assert!(!queue.enqueue(record("acct-1", 999)));
        assert_eq!(queue.len(), 1);
        // The original record stands.
        let entry = &queue.due(Timestamp::new(1000))[0];
        assert_eq!(entry.challenge_end, Timestamp::new(100));
    }

    #[test]
    fn due_respects_challenge_end() {
        let mut queue = FinalizationQueue::new();
        queue.enqueue(record("acct-1", 100));
        queue.enqueue(record("acct-2", 200));

        assert!(queue.due(Timestamp::new(99)).is_empty());
        assert_eq!(queue.due(Timestamp::new(100)).len(), 1);
        assert_eq!(queue.due(Timestamp::new(200)).len(), 2);
    }

    #[test]
    fn record_attempt_counts_up() {
        let mut queue = FinalizationQueue::new();
        queue.enqueue(record("acct-1", 100));
        assert_eq!(queue.record_attempt(&SettlementAccount::new("acct-1")), Some(1));
        assert_eq!(queue.record_attempt(&SettlementAccount::new("acct-1")), Some(2));
        assert_eq!(queue.record_attempt(&SettlementAccount::new("missing")), None);
    }

    #[test]
    fn remove_clears_entry() {
        let mut queue = FinalizationQueue::new();
        queue.enqueue(record("acct-1", 100));
        assert!(queue.remove(&SettlementAccount::new("acct-1")).is_some());
        assert!(queue.is_empty());
        assert!(queue.remove(&SettlementAccount::new("acct-1")).is_none());
    }
}
