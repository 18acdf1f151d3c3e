//! Wallet ownership verification with an anti-sybil credential guard.
//!
//! Two-stage proof: a single-use, time-boxed nonce challenge signed by the
//! wallet key, then an ownership check of a scarce device-bound credential
//! token. One credential, one wallet, first claim wins.

pub mod error;
pub mod ledger_client;
pub mod nonce;
pub mod registry;
pub mod verifier;

pub use error::IdentityError;
pub use ledger_client::HttpCredentialLedger;
pub use nonce::{challenge_message, NonceChallenge, NonceStore};
pub use registry::{CredentialLedger, CredentialTokenId, SybilRegistry};
pub use verifier::{IdentityVerification, IdentityVerifier};
