//! Mission secret store: the server-side half of the commit-reveal scheme.
//!
//! Secrets are consumed exactly once: `take_for_reveal` removes the entry,
//! so a committed target is never retained past its on-chain reveal.

use seek_types::BountyId;
use std::collections::HashMap;

use crate::error::StoreError;

/// The two inputs of a committed target, keyed by bounty id.
pub struct MissionSecretStore {
    secrets: HashMap<BountyId, ([u8; 32], [u8; 32])>,
}

impl MissionSecretStore {
    pub fn new() -> Self {
        Self {
            secrets: HashMap::new(),
        }
    }

    /// Store the secret pair created at bounty start.
    pub fn put(&mut self, bounty_id: BountyId, secret_a: [u8; 32], secret_b: [u8; 32]) {
        self.secrets.insert(bounty_id, (secret_a, secret_b));
    }

    /// Consume the secret pair for the settlement reveal call.
    ///
    /// The entry is removed: a second take fails. Absence means the bounty
    /// was never started through the commitment path, which is an integrity
    /// fault, not a user error.
    pub fn take_for_reveal(
        &mut self,
        bounty_id: &BountyId,
    ) -> Result<([u8; 32], [u8; 32]), StoreError> {
        self.secrets
            .remove(bounty_id)
            .ok_or(StoreError::SecretMissing(*bounty_id))
    }

    /// Drop the secret for a bounty that will never be revealed (expired or
    /// purged before submission).
    pub fn purge(&mut self, bounty_id: &BountyId) {
        self.secrets.remove(bounty_id);
    }

    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

impl Default for MissionSecretStore {
    fn default() -> Self {
        Self::new()
    }
}
