//! Mission commit-reveal scheme.
//!
//! The target assignment must not be inferable from the start-bounty
//! transaction, or a player could fetch a matching stock photo before ever
//! leaving the house. The commitment published at bounty start is
//! `sha256(secret_a || secret_b)` where `secret_a = sha256(mission_id)` and
//! `secret_b` is a random salt. Both secrets are held server-side until the
//! settlement sequencer reveals them on-chain.

use crate::hash::{sha256, sha256_pair};
use rand::RngCore;
use seek_types::MissionId;

/// The output of committing to a mission: the public commitment plus the
/// two secrets needed to open it at reveal time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissionCommitment {
    /// Published with the start-bounty action.
    pub commitment: [u8; 32],
    /// Digest of the mission id.
    pub secret_a: [u8; 32],
    /// Random salt.
    pub secret_b: [u8; 32],
}

/// Commit to a mission with a freshly drawn random salt.
pub fn commit(mission_id: &MissionId) -> MissionCommitment {
    let mut salt = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    commit_with_salt(mission_id, salt)
}

/// Commit to a mission with a caller-supplied salt (deterministic; used by
/// tests and commitment re-verification).
pub fn commit_with_salt(mission_id: &MissionId, salt: [u8; 32]) -> MissionCommitment {
    let secret_a = sha256(mission_id.as_str().as_bytes());
    let commitment = sha256_pair(&secret_a, &salt);
    MissionCommitment {
        commitment,
        secret_a,
        secret_b: salt,
    }
}

/// Check that `(secret_a, secret_b)` opens `commitment`.
pub fn verify_commitment(commitment: &[u8; 32], secret_a: &[u8; 32], secret_b: &[u8; 32]) -> bool {
    sha256_pair(secret_a, secret_b) == *commitment
}
