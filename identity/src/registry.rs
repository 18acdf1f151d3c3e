//! Credential token ownership and the sybil binding table.

use async_trait::async_trait;
use seek_types::WalletAddress;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::IdentityError;

/// Identifier of a scarce device-bound credential token.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CredentialTokenId(String);

impl CredentialTokenId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CredentialTokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read side of the external credential ledger. Answers which credential
/// token, if any, a wallet currently holds.
#[async_trait]
pub trait CredentialLedger: Send + Sync {
    async fn credential_for(
        &self,
        wallet: &WalletAddress,
    ) -> Result<Option<CredentialTokenId>, IdentityError>;
}

/// First-claim-wins binding of credential tokens to wallets. A token bound
/// to one wallet can never be claimed by another, which stops a single
/// credential from backing many identities.
pub struct SybilRegistry {
    bindings: HashMap<CredentialTokenId, WalletAddress>,
}

impl SybilRegistry {
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind a token to a wallet. Rebinding the same pair is a no-op;
    /// binding to a different wallet is refused.
    pub fn bind(
        &mut self,
        token: &CredentialTokenId,
        wallet: &WalletAddress,
    ) -> Result<(), IdentityError> {
        match self.bindings.get(token) {
            Some(bound) if bound == wallet => Ok(()),
            Some(_) => Err(IdentityError::CredentialBoundElsewhere),
            None => {
                self.bindings.insert(token.clone(), wallet.clone());
                Ok(())
            }
        }
    }

    pub fn wallet_for(&self, token: &CredentialTokenId) -> Option<&WalletAddress> {
        self.bindings.get(token)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for SybilRegistry {
    fn default() -> Self {
        Self::new()
    }
}
