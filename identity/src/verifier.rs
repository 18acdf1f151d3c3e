//! Challenge-response verification with a result cache.
//!
//! Verification order matters: the signed message must match the issued
//! challenge, the signature must check out, and only then is the nonce
//! consumed and the credential ledger consulted. A bad signature leaves
//! the challenge outstanding so the client can retry without a round
//! trip; a valid one burns the nonce whether or not the credential
//! checks pass.

use seek_crypto::verify_wallet_signature;
use seek_types::{Timestamp, WalletAddress};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::IdentityError;
use crate::nonce::{NonceChallenge, NonceStore};
use crate::registry::{CredentialLedger, CredentialTokenId, SybilRegistry};

/// Outcome of a wallet verification, cached once established.
#[derive(Clone, Debug)]
pub struct IdentityVerification {
    pub wallet: WalletAddress,
    pub verified: bool,
    pub token_id: Option<CredentialTokenId>,
    pub verified_at: Option<Timestamp>,
}

impl IdentityVerification {
    fn unverified(wallet: WalletAddress) -> Self {
        Self {
            wallet,
            verified: false,
            token_id: None,
            verified_at: None,
        }
    }
}

pub struct IdentityVerifier {
    ledger: Arc<dyn CredentialLedger>,
    nonces: Mutex<NonceStore>,
    registry: Mutex<SybilRegistry>,
    cache: Mutex<HashMap<WalletAddress, IdentityVerification>>,
    nonce_ttl_secs: u64,
}

impl IdentityVerifier {
    pub fn new(ledger: Arc<dyn CredentialLedger>, nonce_ttl_secs: u64) -> Self {
        Self {
            ledger,
            nonces: Mutex::new(NonceStore::new()),
            registry: Mutex::new(SybilRegistry::new()),
            cache: Mutex::new(HashMap::new()),
            nonce_ttl_secs,
        }
    }

    /// Issue a signing challenge for the claimed wallet.
    pub fn issue_challenge(&self, wallet: &WalletAddress, now: Timestamp) -> NonceChallenge {
        self.nonces
            .lock()
            .expect("nonce store poisoned")
            .issue(wallet, now)
    }

    /// Verify a signed challenge response and, on success, bind the
    /// wallet's credential token.
    pub async fn verify(
        &self,
        wallet: &WalletAddress,
        message: &str,
        signature_hex: &str,
        now: Timestamp,
    ) -> Result<IdentityVerification, IdentityError> {
        {
            let cache = self.cache.lock().expect("identity cache poisoned");
            if let Some(cached) = cache.get(wallet) {
                if cached.verified {
                    return Ok(cached.clone());
                }
            }
        }

        let challenge = {
            let nonces = self.nonces.lock().expect("nonce store poisoned");
            nonces
                .peek(wallet)
                .cloned()
                .ok_or(IdentityError::NoChallengeIssued)?
        };
        if message != challenge.message {
            return Err(IdentityError::MessageMismatch);
        }

        let valid = verify_wallet_signature(wallet, signature_hex, message.as_bytes())
            .map_err(|e| IdentityError::Malformed(e.to_string()))?;
        if !valid {
            return Err(IdentityError::InvalidSignature);
        }

        // Burn the nonce. This rechecks the TTL so a signature produced
        // against a stale challenge is still refused.
        self.nonces
            .lock()
            .expect("nonce store poisoned")
            .consume(wallet, &challenge.nonce, self.nonce_ttl_secs, now)?;

        // Ledger I/O happens with no lock held.
        let token = self
            .ledger
            .credential_for(wallet)
            .await?
            .ok_or(IdentityError::NoCredential)?;

        self.registry
            .lock()
            .expect("sybil registry poisoned")
            .bind(&token, wallet)?;

        let verification = IdentityVerification {
            wallet: wallet.clone(),
            verified: true,
            token_id: Some(token),
            verified_at: Some(now),
        };
        self.cache
            .lock()
            .expect("identity cache poisoned")
            .insert(wallet.clone(), verification.clone());

        tracing::info!(wallet = %verification.wallet, "wallet identity verified");
        Ok(verification)
    }

    /// Cached verification state. Never consults the ledger and never
    /// fails; an unknown wallet is simply unverified.
    pub fn status(&self, wallet: &WalletAddress) -> IdentityVerification {
        self.cache
            .lock()
            .expect("identity cache poisoned")
            .get(wallet)
            .cloned()
            .unwrap_or_else(|| IdentityVerification::unverified(wallet.clone()))
    }

    /// Drop expired challenges. Returns the number removed.
    pub fn sweep_nonces(&self, now: Timestamp) -> usize {
        self.nonces
            .lock()
            .expect("nonce store poisoned")
            .sweep_expired(self.nonce_ttl_secs, now)
    }
}
