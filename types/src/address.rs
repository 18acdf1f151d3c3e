//! Wallet address type with `skr_` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A SEEK wallet address, always prefixed with `skr_`.
///
/// The portion after the prefix is the wallet's Ed25519 public key,
/// hex-encoded (64 characters). Signature verification decodes the key
/// directly from the address (see `seek-crypto`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// The standard prefix for all SEEK wallet addresses.
    pub const PREFIX: &'static str = "skr_";

    /// Create a new wallet address from a raw string.
    ///
    /// # Panics
    /// Panics if the string does not start with `skr_`.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(s.starts_with(Self::PREFIX), "address must start with skr_");
        Self(s)
    }

    /// Parse a wallet address, rejecting malformed input instead of panicking.
    pub fn parse(raw: &str) -> Option<Self> {
        let addr = Self(raw.to_string());
        addr.is_valid().then_some(addr)
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The hex-encoded public key portion (everything after the prefix).
    pub fn key_hex(&self) -> &str {
        &self.0[Self::PREFIX.len()..]
    }

    /// Validate that this address is well-formed: prefix plus 64 hex chars.
    pub fn is_valid(&self) -> bool {
        let Some(rest) = self.0.strip_prefix(Self::PREFIX) else {
            return false;
        };
        rest.len() == 64 && rest.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
