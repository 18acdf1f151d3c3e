//! Request and response bodies for the RPC endpoints.

use seek_types::Bounty;
use seek_verification::{AttestationPayload, PhotoMetadata};
use serde::{Deserialize, Serialize};

// ── Identity ─────────────────────────────────────────────────────────────

// The identity endpoints speak the wallet-facing challenge protocol, which
// uses camelCase keys (`walletAddress`, `boundTokenId`, `verifiedAt`).

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonceRequest {
    pub wallet_address: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NonceResponse {
    pub nonce: String,
    /// The exact message the wallet must sign.
    pub message: String,
    pub ttl_secs: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub wallet_address: String,
    pub message: String,
    /// Hex Ed25519 signature over `message`.
    pub signature: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bound_token_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityStatusResponse {
    pub wallet_address: String,
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bound_token_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<u64>,
}

// ── Bounty ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct StartBountyRequest {
    pub wallet: String,
    /// Tier number 1-3.
    pub tier: u8,
}

#[derive(Serialize)]
pub struct StartBountyResponse {
    pub bounty_id: String,
    pub tier: u8,
    pub stake: u64,
    pub expires_at: u64,
    pub settlement_account: String,
    /// Commitment to the hidden target, for the start transaction.
    pub commitment: String,
    /// Nonce for hardware-backed attestation of the capture.
    pub attestation_nonce: String,
}

#[derive(Deserialize)]
pub struct SubmitPhotoRequest {
    /// Base64-encoded photo bytes.
    pub photo: String,
    pub mime: String,
    #[serde(default)]
    pub metadata: Option<PhotoMetadata>,
    #[serde(default)]
    pub attestation: Option<AttestationPayload>,
}

#[derive(Serialize)]
pub struct SubmitPhotoResponse {
    pub bounty_id: String,
    pub status: String,
    pub is_valid: bool,
    pub confidence: f64,
    pub reasoning: String,
    pub detected_objects: Vec<String>,
    /// When the settlement becomes finalizable.
    pub challenge_end: u64,
    /// Always "pending": payout executes after the challenge window.
    pub payout_state: String,
    pub payout_on_win: Option<u64>,
}

#[derive(Serialize)]
pub struct BountyView {
    pub bounty_id: String,
    pub wallet: String,
    pub tier: u8,
    pub stake: u64,
    pub status: String,
    pub created_at: u64,
    pub expires_at: u64,
    pub settlement_account: String,
    pub settlement_tx: Option<String>,
    pub attested: bool,
    /// Revealed only once the bounty is terminal; the target stays hidden
    /// while the bounty is playable.
    pub mission_id: Option<String>,
}

impl BountyView {
    pub fn from_bounty(bounty: &Bounty) -> Self {
        Self {
            bounty_id: bounty.id.to_string(),
            wallet: bounty.wallet.to_string(),
            tier: bounty.tier.as_u8(),
            stake: bounty.stake,
            status: format!("{:?}", bounty.status).to_lowercase(),
            created_at: bounty.created_at.as_secs(),
            expires_at: bounty.expires_at.as_secs(),
            settlement_account: bounty.settlement_account.to_string(),
            settlement_tx: bounty.settlement_tx.as_ref().map(|t| t.as_str().to_string()),
            attested: bounty.attested,
            mission_id: bounty
                .status
                .is_terminal()
                .then(|| bounty.mission_id.to_string()),
        }
    }
}
