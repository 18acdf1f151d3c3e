//! Identity error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    /// No outstanding challenge for this wallet (never issued, already
    /// consumed, or swept).
    #[error("no active challenge for wallet")]
    NoChallengeIssued,

    #[error("challenge nonce has expired")]
    NonceExpired,

    /// The signed message does not match the canonical challenge message.
    #[error("message does not match the issued challenge")]
    MessageMismatch,

    #[error("signature verification failed")]
    InvalidSignature,

    /// The wallet holds no device-bound credential token.
    #[error("wallet holds no credential token")]
    NoCredential,

    /// The credential token is already registered to a different wallet.
    #[error("credential token already bound to another wallet")]
    CredentialBoundElsewhere,

    #[error("credential ledger error: {0}")]
    Ledger(String),

    #[error("malformed input: {0}")]
    Malformed(String),
}
