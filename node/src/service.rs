//! Bounty service: the request-path orchestration of the pipeline.
//!
//! `start_bounty` assigns a hidden target and returns only its commitment;
//! `submit_photo` runs attestation, pre-checks, adjudication, and the
//! synchronous half of settlement. The finalize leg is deferred to the
//! worker, so a submission response always reports the payout as pending.

use rand::RngCore;
use seek_settlement::SettlementSequencer;
use seek_store::{BountyStore, MissionCatalog, MissionSecretStore};
use seek_types::{
    Bounty, BountyId, BountyStatus, ProtocolParams, SkrAmount, Tier, Timestamp, WalletAddress,
};
use seek_verification::{
    Adjudicator, AttestationPayload, DeviceAttestationVerifier, MetadataExtractor, PhotoMetadata,
    VerificationResult,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::NodeError;

/// Image formats the vision provider accepts.
const SUPPORTED_MIMES: &[&str] = &["image/jpeg", "image/png", "image/heic", "image/webp"];

/// Response to a start-bounty request. Carries the commitment for the
/// on-chain start transaction and an attestation nonce for hardware-backed
/// capture proofs. The mission itself stays hidden until reveal.
#[derive(Clone, Debug)]
pub struct StartedBounty {
    pub bounty: Bounty,
    /// Hex `sha256(secret_a || secret_b)`.
    pub commitment: String,
    /// Server nonce the device echoes back inside a hardware attestation.
    pub attestation_nonce: String,
}

/// Response to a photo submission.
#[derive(Clone, Debug)]
pub struct SubmissionOutcome {
    pub bounty: Bounty,
    pub verdict: VerificationResult,
    /// When the settlement becomes finalizable. Payout is pending until the
    /// worker finalizes after this point.
    pub challenge_end: Timestamp,
    /// The 2x payout due on a win, `None` on a loss.
    pub payout_on_win: Option<SkrAmount>,
}

pub struct BountyService {
    params: ProtocolParams,
    bounties: Mutex<BountyStore>,
    secrets: Mutex<MissionSecretStore>,
    catalog: Arc<MissionCatalog>,
    adjudicator: Adjudicator,
    extractor: Arc<dyn MetadataExtractor>,
    attestation: DeviceAttestationVerifier,
    /// Per-bounty nonce issued at start for hardware attestation.
    attestation_nonces: Mutex<HashMap<BountyId, String>>,
    sequencer: SettlementSequencer,
}

impl BountyService {
    pub fn new(
        params: ProtocolParams,
        catalog: Arc<MissionCatalog>,
        adjudicator: Adjudicator,
        extractor: Arc<dyn MetadataExtractor>,
        sequencer: SettlementSequencer,
    ) -> Self {
        Self {
            params,
            bounties: Mutex::new(BountyStore::new()),
            secrets: Mutex::new(MissionSecretStore::new()),
            catalog,
            adjudicator,
            extractor,
            attestation: DeviceAttestationVerifier,
            attestation_nonces: Mutex::new(HashMap::new()),
            sequencer,
        }
    }

    /// Start a bounty: pick a hidden mission for the tier, commit to it,
    /// and create the pending bounty record.
    ///
    /// The single-active-bounty conflict surfaces before any secret is
    /// stored, so a refused start leaves no partial state.
    pub fn start_bounty(
        &self,
        wallet: WalletAddress,
        tier: Tier,
        now: Timestamp,
    ) -> Result<StartedBounty, NodeError> {
        let mission_id = self
            .catalog
            .pick_for_tier(tier)
            .ok_or(NodeError::NoMissionForTier(tier.as_u8()))?
            .id
            .clone();

        let commitment = seek_crypto::commit(&mission_id);

        let bounty = self
            .bounties
            .lock()
            .expect("bounty store poisoned")
            .create(wallet, mission_id, tier, &self.params, now)?;

        self.secrets
            .lock()
            .expect("secret store poisoned")
            .put(bounty.id, commitment.secret_a, commitment.secret_b);

        let nonce = fresh_nonce();
        self.attestation_nonces
            .lock()
            .expect("attestation nonce map poisoned")
            .insert(bounty.id, nonce.clone());

        tracing::info!(
            bounty = %bounty.id,
            wallet = %bounty.wallet,
            tier = bounty.tier.as_u8(),
            expires_at = bounty.expires_at.as_secs(),
            "bounty started"
        );

        Ok(StartedBounty {
            bounty,
            commitment: hex::encode(commitment.commitment),
            attestation_nonce: nonce,
        })
    }

    /// Submit a photo for an active bounty and drive it to a terminal
    /// outcome.
    pub async fn submit_photo(
        &self,
        bounty_id: &BountyId,
        photo: &[u8],
        mime: &str,
        client_metadata: Option<PhotoMetadata>,
        attestation: Option<AttestationPayload>,
        now: Timestamp,
    ) -> Result<SubmissionOutcome, NodeError> {
        if !SUPPORTED_MIMES.contains(&mime) {
            return Err(seek_verification::VerificationError::UnsupportedImage(
                mime.to_string(),
            )
            .into());
        }

        let bounty = self
            .bounties
            .lock()
            .expect("bounty store poisoned")
            .get(bounty_id)
            .cloned()
            .ok_or(seek_store::StoreError::BountyNotFound(*bounty_id))?;

        // A submission racing the expiry sweep is refused, not adjudicated.
        if bounty.status == BountyStatus::Pending && now >= bounty.expires_at {
            return Err(NodeError::BountyExpired(*bounty_id));
        }

        let mission = self.catalog.get(&bounty.mission_id)?.clone();

        // Attestation is checked before any state transition so a rejected
        // payload leaves the bounty playable.
        let attestation_kind = match &attestation {
            Some(payload) => {
                let expected = self
                    .attestation_nonces
                    .lock()
                    .expect("attestation nonce map poisoned")
                    .get(bounty_id)
                    .cloned();
                Some(
                    self.attestation
                        .verify(payload, photo, expected.as_deref())?,
                )
            }
            None => None,
        };

        {
            let mut bounties = self.bounties.lock().expect("bounty store poisoned");
            bounties.mark_validating(bounty_id)?;
            if let Some(kind) = attestation_kind {
                bounties.record_attestation(bounty_id, kind)?;
            }
        }

        let metadata = self.extractor.extract(photo, client_metadata.as_ref());
        let verdict = self
            .adjudicator
            .adjudicate(
                photo,
                mime,
                &mission,
                &metadata,
                bounty.tier,
                bounty.created_at,
                now,
                &self.params,
            )
            .await;

        let (secret_a, secret_b) = self
            .secrets
            .lock()
            .expect("secret store poisoned")
            .take_for_reveal(bounty_id)?;

        let settlement = match self
            .sequencer
            .settle(&bounty, secret_a, secret_b, verdict.is_valid, now)
            .await
        {
            Ok(settlement) => settlement,
            Err(e) => {
                // Reveal/propose failures are not retried here; put the
                // secret and the bounty back so the client can resubmit.
                self.secrets
                    .lock()
                    .expect("secret store poisoned")
                    .put(*bounty_id, secret_a, secret_b);
                if let Err(revert) = self
                    .bounties
                    .lock()
                    .expect("bounty store poisoned")
                    .revert_validating(bounty_id)
                {
                    tracing::error!(bounty = %bounty_id, error = %revert, "rollback failed");
                }
                tracing::warn!(
                    bounty = %bounty_id,
                    error = %e,
                    "settlement failed, bounty returned to pending"
                );
                return Err(e.into());
            }
        };

        let status = if verdict.is_valid {
            BountyStatus::Won
        } else {
            BountyStatus::Lost
        };
        let updated = {
            let mut bounties = self.bounties.lock().expect("bounty store poisoned");
            bounties.set_terminal(bounty_id, status, settlement.propose_tx.clone(), now)?;
            bounties
                .get(bounty_id)
                .cloned()
                .ok_or(seek_store::StoreError::BountyNotFound(*bounty_id))?
        };
        self.attestation_nonces
            .lock()
            .expect("attestation nonce map poisoned")
            .remove(bounty_id);

        tracing::info!(
            bounty = %bounty_id,
            wallet = %updated.wallet,
            won = verdict.is_valid,
            confidence = verdict.confidence,
            "bounty adjudicated"
        );

        let payout_on_win = verdict
            .is_valid
            .then(|| seek_settlement::win_payout(updated.stake));

        Ok(SubmissionOutcome {
            bounty: updated,
            verdict,
            challenge_end: settlement.challenge_end,
            payout_on_win,
        })
    }

    pub fn get_bounty(&self, id: &BountyId) -> Option<Bounty> {
        self.bounties
            .lock()
            .expect("bounty store poisoned")
            .get(id)
            .cloned()
    }

    pub fn active_bounty_for(&self, wallet: &WalletAddress) -> Option<Bounty> {
        self.bounties
            .lock()
            .expect("bounty store poisoned")
            .active_for_wallet(wallet)
            .cloned()
    }

    pub fn active_count(&self) -> usize {
        self.bounties
            .lock()
            .expect("bounty store poisoned")
            .active_count()
    }

    /// Expire overdue pending bounties and drop their secrets.
    pub fn sweep_expired(&self, now: Timestamp) -> usize {
        let expired = self
            .bounties
            .lock()
            .expect("bounty store poisoned")
            .sweep_expired(now);
        self.cleanup(&expired);
        expired.len()
    }

    /// Garbage-collect terminal bounties past the retention horizon.
    pub fn purge_terminal(&self, now: Timestamp) -> usize {
        let purged = self
            .bounties
            .lock()
            .expect("bounty store poisoned")
            .purge_terminal(self.params.bounty_retention_secs, now);
        self.cleanup(&purged);
        purged.len()
    }

    fn cleanup(&self, ids: &[BountyId]) {
        if ids.is_empty() {
            return;
        }
        let mut secrets = self.secrets.lock().expect("secret store poisoned");
        let mut nonces = self
            .attestation_nonces
            .lock()
            .expect("attestation nonce map poisoned");
        for id in ids {
            secrets.purge(id);
            nonces.remove(id);
        }
    }
}

fn fresh_nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
