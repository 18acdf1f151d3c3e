//! Single-use, time-boxed nonce challenges.

use rand::RngCore;
use seek_types::{Timestamp, WalletAddress};
use std::collections::HashMap;

use crate::error::IdentityError;

/// An outstanding challenge bound to a claimed wallet address.
#[derive(Clone, Debug)]
pub struct NonceChallenge {
    pub nonce: String,
    /// The canonical message the client must sign.
    pub message: String,
    pub issued_at: Timestamp,
}

/// Build the canonical challenge message for a wallet/nonce pair.
pub fn challenge_message(wallet: &WalletAddress, nonce: &str) -> String {
    format!("seek identity verification\nwallet: {wallet}\nnonce: {nonce}")
}

/// Table of outstanding nonces, one per wallet. Swept on a fixed interval
/// to bound memory growth from abandoned challenges.
pub struct NonceStore {
    entries: HashMap<WalletAddress, NonceChallenge>,
}

impl NonceStore {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Issue a fresh challenge for a wallet. Reissue replaces any
    /// outstanding challenge.
    pub fn issue(&mut self, wallet: &WalletAddress, now: Timestamp) -> NonceChallenge {
        let mut bytes = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        let nonce = hex::encode(bytes);
        let challenge = NonceChallenge {
            message: challenge_message(wallet, &nonce),
            nonce,
            issued_at: now,
        };
        self.entries.insert(wallet.clone(), challenge.clone());
        challenge
    }

    /// Read the outstanding challenge without consuming it.
    pub fn peek(&self, wallet: &WalletAddress) -> Option<&NonceChallenge> {
        self.entries.get(wallet)
    }

    /// Consume the wallet's challenge after checking the presented nonce
    /// against it. Removal makes the nonce single-use: a second consume
    /// fails even with a valid signature.
    pub fn consume(
        &mut self,
        wallet: &WalletAddress,
        nonce: &str,
        ttl_secs: u64,
        now: Timestamp,
    ) -> Result<(), IdentityError> {
        let entry = self
            .entries
            .get(wallet)
            .ok_or(IdentityError::NoChallengeIssued)?;
        if entry.issued_at.has_expired(ttl_secs, now) {
            self.entries.remove(wallet);
            return Err(IdentityError::NonceExpired);
        }
        if entry.nonce != nonce {
            return Err(IdentityError::MessageMismatch);
        }
        self.entries.remove(wallet);
        Ok(())
    }

    /// Drop expired challenges. Returns the number removed.
    pub fn sweep_expired(&mut self, ttl_secs: u64, now: Timestamp) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| !entry.issued_at.has_expired(ttl_secs, now));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for NonceStore {
    fn default() -> Self {
        Self::new()
    }
}
