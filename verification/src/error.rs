//! Verification error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerificationError {
    /// The vision provider could not be reached or returned a non-success
    /// status.
    #[error("vision provider unreachable: {0}")]
    ProviderUnreachable(String),

    /// The provider reply did not contain a single well-formed JSON object
    /// matching the verdict schema.
    #[error("verdict parse failure: {0}")]
    VerdictParse(String),

    /// The verdict parsed but violated the schema (missing field, value out
    /// of range). Hard failure, never coerced.
    #[error("verdict schema violation: {0}")]
    VerdictSchema(String),

    #[error("attestation rejected: {0}")]
    AttestationRejected(String),

    #[error("unsupported image format: {0}")]
    UnsupportedImage(String),
}
