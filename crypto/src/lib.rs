//! Cryptographic primitives for the SEEK backend: SHA-256 hashing, the
//! mission commit-reveal scheme, and Ed25519 challenge signatures.

pub mod commitment;
pub mod hash;
pub mod sign;

pub use commitment::{commit, commit_with_salt, verify_commitment, MissionCommitment};
pub use hash::{sha256, sha256_pair};
pub use sign::{generate_keypair, sign_message, verify_wallet_signature, wallet_for_key, CryptoError};
