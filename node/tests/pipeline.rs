//! End-to-end pipeline tests: start, submit, adjudicate, settle, finalize,
//! all against in-process mocks of the contract, vision provider, and
//! credential ledger.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use seek_identity::{CredentialLedger, CredentialTokenId, IdentityError};
use seek_node::{NodeConfig, SeekNode};
use seek_settlement::{SettlementContract, SettlementError};
use seek_types::{BountyStatus, SettlementAccount, SettlementTx, Tier, Timestamp, WalletAddress};
use seek_verification::{PhotoMetadata, VerificationError, VisionProvider};

// ── Mocks ───────────────────────────────────────────────────────────────

/// Contract that accepts everything; propose and finalize behavior is
/// configurable.
struct MockContract {
    /// Transport failures to serve before propose succeeds.
    propose_failures: u32,
    /// Transport failures to serve before finalize succeeds. `u32::MAX`
    /// means finalize never succeeds.
    finalize_failures: u32,
    /// Challenge-window rejections to serve before the failures/success.
    window_rejections: u32,
    propose_calls: AtomicU32,
    finalize_calls: AtomicU32,
}

impl MockContract {
    fn accepting() -> Self {
        Self {
            propose_failures: 0,
            finalize_failures: 0,
            window_rejections: 0,
            propose_calls: AtomicU32::new(0),
            finalize_calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl SettlementContract for MockContract {
    async fn reveal_mission(
        &self,
        account: &SettlementAccount,
        _secret_a: [u8; 32],
        _secret_b: [u8; 32],
    ) -> Result<SettlementTx, SettlementError> {
        Ok(SettlementTx::new(format!("reveal-{}", account.as_str())))
    }

    async fn propose_resolution(
        &self,
        account: &SettlementAccount,
        _success: bool,
    ) -> Result<SettlementTx, SettlementError> {
        let call = self.propose_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.propose_failures {
            return Err(SettlementError::Transport("rpc down".into()));
        }
        Ok(SettlementTx::new(format!("propose-{}", account.as_str())))
    }

    async fn finalize_bounty(
        &self,
        account: &SettlementAccount,
    ) -> Result<SettlementTx, SettlementError> {
        let call = self.finalize_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.window_rejections {
            return Err(SettlementError::ChallengePeriodActive);
        }
        if call - self.window_rejections <= self.finalize_failures {
            return Err(SettlementError::Transport("rpc down".into()));
        }
        Ok(SettlementTx::new(format!("finalize-{}", account.as_str())))
    }
}

/// Provider that replies with a fixed verdict and counts calls.
struct ScriptedProvider {
    reply: String,
    calls: AtomicU32,
}

impl ScriptedProvider {
    fn verdict(is_valid: bool, confidence: f64) -> Self {
        Self {
            reply: format!(
                r#"{{"isValid": {is_valid}, "confidence": {confidence},
                    "reasoning": "scripted", "detectedObjects": ["object"],
                    "isScreenshot": false, "matchesTarget": {is_valid}}}"#
            ),
            calls: AtomicU32::new(0),
        }
    }

    fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionProvider for ScriptedProvider {
    async fn analyze(
        &self,
        _image: &[u8],
        _mime: &str,
        _prompt: &str,
    ) -> Result<String, VerificationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

/// Ledger with a fixed set of credential holdings.
struct MockLedger {
    holdings: Mutex<Vec<(WalletAddress, CredentialTokenId)>>,
}

impl MockLedger {
    fn empty() -> Self {
        Self {
            holdings: Mutex::new(Vec::new()),
        }
    }

    fn with(wallet: &WalletAddress, token: &str) -> Self {
        Self {
            holdings: Mutex::new(vec![(wallet.clone(), CredentialTokenId::new(token))]),
        }
    }
}

#[async_trait]
impl CredentialLedger for MockLedger {
    async fn credential_for(
        &self,
        wallet: &WalletAddress,
    ) -> Result<Option<CredentialTokenId>, IdentityError> {
        Ok(self
            .holdings
            .lock()
            .unwrap()
            .iter()
            .find(|(w, _)| w == wallet)
            .map(|(_, t)| t.clone()))
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn node_with(contract: MockContract, provider: Arc<ScriptedProvider>) -> SeekNode {
    SeekNode::new(
        NodeConfig::default(),
        Arc::new(contract),
        provider,
        Arc::new(MockLedger::empty()),
    )
}

fn wallet(byte: u8) -> WalletAddress {
    WalletAddress::new(format!("skr_{}", format!("{:02x}", byte).repeat(32)))
}

/// Metadata that passes every pre-check for a bounty created at
/// `created_at` and submitted at `created_at + 10`.
fn clean_metadata(created_at: Timestamp) -> PhotoMetadata {
    PhotoMetadata {
        captured_at: Some(created_at.plus(5)),
        gps: Some((40.7, -74.0)),
        device_make: Some("Apple".into()),
        device_model: Some("iPhone 15".into()),
    }
}

// ── Scenarios ───────────────────────────────────────────────────────────

#[tokio::test]
async fn win_flows_through_to_deferred_finalization() {
    let provider = Arc::new(ScriptedProvider::verdict(true, 0.95));
    let node = node_with(MockContract::accepting(), provider.clone());

    let t0 = Timestamp::new(1000);
    let started = node
        .service
        .start_bounty(wallet(1), Tier::One, t0)
        .expect("start should succeed");
    assert_eq!(started.bounty.status, BountyStatus::Pending);
    // The commitment hides the mission: 64 hex chars, no mission text.
    assert_eq!(started.commitment.len(), 64);

    let outcome = node
        .service
        .submit_photo(
            &started.bounty.id,
            b"jpeg-bytes",
            "image/jpeg",
            Some(clean_metadata(t0)),
            None,
            t0.plus(10),
        )
        .await
        .expect("submit should succeed");

    assert!(outcome.verdict.is_valid);
    assert_eq!(outcome.bounty.status, BountyStatus::Won);
    assert_eq!(
        outcome.payout_on_win,
        Some(2 * started.bounty.stake)
    );
    assert_eq!(provider.call_count(), 1);

    // Payout is pending until the worker finalizes after the window.
    let status = node.status();
    assert_eq!(status.queued_finalizations, 1);

    let stats = node.run_finalization_pass(outcome.challenge_end).await;
    assert_eq!(stats.finalized, 1);
    assert_eq!(node.status().queued_finalizations, 0);
}

#[tokio::test]
async fn second_start_for_same_wallet_is_conflict() {
    let provider = Arc::new(ScriptedProvider::verdict(true, 0.95));
    let node = node_with(MockContract::accepting(), provider);

    let t0 = Timestamp::new(1000);
    node.service
        .start_bounty(wallet(1), Tier::One, t0)
        .expect("first start should succeed");

    let second = node.service.start_bounty(wallet(1), Tier::Two, t0.plus(1));
    assert!(second.is_err());
    assert_eq!(node.status().active_bounties, 1);

    // A different wallet is unaffected.
    assert!(node
        .service
        .start_bounty(wallet(2), Tier::One, t0.plus(2))
        .is_ok());
}

#[tokio::test]
async fn precapture_photo_rejected_without_adjudication_call() {
    let provider = Arc::new(ScriptedProvider::verdict(true, 0.99));
    let node = node_with(MockContract::accepting(), provider.clone());

    let t0 = Timestamp::new(10_000);
    let started = node
        .service
        .start_bounty(wallet(1), Tier::One, t0)
        .unwrap();

    // Captured well before the bounty existed: a stockpiled photo.
    let metadata = PhotoMetadata {
        captured_at: Some(Timestamp::new(9_000)),
        gps: Some((40.7, -74.0)),
        device_make: Some("Apple".into()),
        device_model: Some("iPhone 15".into()),
    };
    let outcome = node
        .service
        .submit_photo(
            &started.bounty.id,
            b"jpeg-bytes",
            "image/jpeg",
            Some(metadata),
            None,
            t0.plus(10),
        )
        .await
        .unwrap();

    assert!(!outcome.verdict.is_valid);
    assert_eq!(outcome.bounty.status, BountyStatus::Lost);
    // The paid vision call never happened.
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn confident_sounding_verdict_below_tier3_floor_is_a_loss() {
    // isValid=true at 0.72 confidence: above the tier-1 floor, below the
    // tier-3 floor of 0.90.
    let provider = Arc::new(ScriptedProvider::verdict(true, 0.72));
    let node = node_with(MockContract::accepting(), provider);

    let t0 = Timestamp::new(1000);
    let started = node
        .service
        .start_bounty(wallet(1), Tier::Three, t0)
        .unwrap();

    let outcome = node
        .service
        .submit_photo(
            &started.bounty.id,
            b"jpeg-bytes",
            "image/jpeg",
            Some(clean_metadata(t0)),
            None,
            t0.plus(10),
        )
        .await
        .unwrap();

    assert!(!outcome.verdict.is_valid);
    assert_eq!(outcome.verdict.confidence, 0.72);
    assert_eq!(outcome.bounty.status, BountyStatus::Lost);
}

#[tokio::test]
async fn challenge_window_rejection_defers_then_succeeds() {
    let contract = MockContract {
        window_rejections: 1,
        ..MockContract::accepting()
    };
    let provider = Arc::new(ScriptedProvider::verdict(true, 0.95));
    let node = node_with(contract, provider);

    let t0 = Timestamp::new(1000);
    let started = node.service.start_bounty(wallet(1), Tier::One, t0).unwrap();
    let outcome = node
        .service
        .submit_photo(
            &started.bounty.id,
            b"jpeg-bytes",
            "image/jpeg",
            Some(clean_metadata(t0)),
            None,
            t0.plus(10),
        )
        .await
        .unwrap();

    // First pass: contract still reports the window open. No attempt is
    // consumed and nothing is user-visible.
    let stats = node.run_finalization_pass(outcome.challenge_end).await;
    assert_eq!(stats.deferred, 1);
    assert_eq!(node.status().queued_finalizations, 1);

    let stats = node
        .run_finalization_pass(outcome.challenge_end.plus(15))
        .await;
    assert_eq!(stats.finalized, 1);
    assert!(node.status().stuck_settlements.is_empty());
}

#[tokio::test]
async fn exhausted_finalization_surfaces_in_status_report() {
    let contract = MockContract {
        finalize_failures: u32::MAX,
        ..MockContract::accepting()
    };
    let provider = Arc::new(ScriptedProvider::verdict(true, 0.95));
    let node = node_with(contract, provider);

    let t0 = Timestamp::new(1000);
    let started = node.service.start_bounty(wallet(1), Tier::One, t0).unwrap();
    let account = started.bounty.settlement_account.clone();
    let outcome = node
        .service
        .submit_photo(
            &started.bounty.id,
            b"jpeg-bytes",
            "image/jpeg",
            Some(clean_metadata(t0)),
            None,
            t0.plus(10),
        )
        .await
        .unwrap();

    let max = node.config.params.finalize_max_attempts;
    let mut now = outcome.challenge_end;
    for _ in 0..max {
        node.run_finalization_pass(now).await;
        now = now.plus(15);
    }

    let status = node.status();
    assert_eq!(status.queued_finalizations, 0);
    assert_eq!(status.stuck_settlements, vec![account.as_str().to_string()]);

    // Never retried again.
    let stats = node.run_finalization_pass(now).await;
    assert_eq!(stats.finalized + stats.failed + stats.deferred, 0);
}

#[tokio::test]
async fn propose_failure_returns_bounty_for_resubmission() {
    let contract = MockContract {
        propose_failures: 1,
        ..MockContract::accepting()
    };
    let provider = Arc::new(ScriptedProvider::verdict(true, 0.95));
    let node = node_with(contract, provider);

    let t0 = Timestamp::new(1000);
    let started = node.service.start_bounty(wallet(1), Tier::One, t0).unwrap();

    let first = node
        .service
        .submit_photo(
            &started.bounty.id,
            b"jpeg-bytes",
            "image/jpeg",
            Some(clean_metadata(t0)),
            None,
            t0.plus(10),
        )
        .await;
    assert!(first.is_err());

    // The failure rolled everything back: the bounty is pending again and
    // the wallet is not stranded behind a half-settled bounty.
    assert_eq!(
        node.service.get_bounty(&started.bounty.id).unwrap().status,
        BountyStatus::Pending
    );
    assert_eq!(node.status().queued_finalizations, 0);

    // The secret survived the rollback, so a resubmission settles.
    let outcome = node
        .service
        .submit_photo(
            &started.bounty.id,
            b"jpeg-bytes",
            "image/jpeg",
            Some(clean_metadata(t0)),
            None,
            t0.plus(20),
        )
        .await
        .expect("resubmission should settle");
    assert_eq!(outcome.bounty.status, BountyStatus::Won);
}

#[tokio::test]
async fn expired_bounty_refuses_submission() {
    let provider = Arc::new(ScriptedProvider::verdict(true, 0.95));
    let node = node_with(MockContract::accepting(), provider.clone());

    let t0 = Timestamp::new(1000);
    let started = node.service.start_bounty(wallet(1), Tier::Three, t0).unwrap();

    let late = started.bounty.expires_at.plus(1);
    let result = node
        .service
        .submit_photo(
            &started.bounty.id,
            b"jpeg-bytes",
            "image/jpeg",
            Some(clean_metadata(t0)),
            None,
            late,
        )
        .await;
    assert!(result.is_err());
    assert_eq!(provider.call_count(), 0);

    // The sweep then frees the wallet for a new bounty.
    node.service.sweep_expired(late);
    assert!(node
        .service
        .start_bounty(wallet(1), Tier::One, late.plus(1))
        .is_ok());
}

#[tokio::test]
async fn unsupported_mime_is_refused_and_bounty_stays_playable() {
    let provider = Arc::new(ScriptedProvider::verdict(true, 0.95));
    let node = node_with(MockContract::accepting(), provider.clone());

    let t0 = Timestamp::new(1000);
    let started = node.service.start_bounty(wallet(1), Tier::One, t0).unwrap();

    let result = node
        .service
        .submit_photo(
            &started.bounty.id,
            b"<svg/>",
            "image/svg+xml",
            Some(clean_metadata(t0)),
            None,
            t0.plus(10),
        )
        .await;
    assert!(result.is_err());
    assert_eq!(provider.call_count(), 0);
    assert_eq!(
        node.service.get_bounty(&started.bounty.id).unwrap().status,
        BountyStatus::Pending
    );
}

#[tokio::test]
async fn identity_verification_round_trip_through_node() {
    let key = seek_crypto::generate_keypair();
    let player = seek_crypto::wallet_for_key(&key);
    let node = SeekNode::new(
        NodeConfig::default(),
        Arc::new(MockContract::accepting()),
        Arc::new(ScriptedProvider::verdict(true, 0.95)),
        Arc::new(MockLedger::with(&player, "cred-1")),
    );

    let t0 = Timestamp::new(1000);
    let challenge = node.identity.issue_challenge(&player, t0);
    let sig = seek_crypto::sign_message(&key, challenge.message.as_bytes());

    let verification = node
        .identity
        .verify(&player, &challenge.message, &sig, t0.plus(5))
        .await
        .expect("verification should succeed");
    assert!(verification.verified);
    assert!(node.identity.status(&player).verified);
}
