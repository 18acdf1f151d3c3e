//! Bounty identity, lifecycle state, and settlement references.

use crate::address::WalletAddress;
use crate::amount::SkrAmount;
use crate::mission::MissionId;
use crate::params::Tier;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 16-byte opaque bounty identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BountyId([u8; 16]);

impl BountyId {
    pub fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Parse the 32-char hex form produced by `Display`.
    pub fn parse_hex(s: &str) -> Option<Self> {
        if s.len() != 32 {
            return None;
        }
        let mut bytes = [0u8; 16];
        for (i, chunk) in s.as_bytes().chunks(2).enumerate() {
            let hi = (chunk[0] as char).to_digit(16)?;
            let lo = (chunk[1] as char).to_digit(16)?;
            bytes[i] = (hi * 16 + lo) as u8;
        }
        Some(Self(bytes))
    }
}

impl fmt::Debug for BountyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BountyId({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for BountyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

/// Reference to the contract-side bounty account (address-derived).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SettlementAccount(String);

impl SettlementAccount {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SettlementAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a settlement transaction (signature string).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementTx(String);

impl SettlementTx {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Lifecycle state of a bounty.
///
/// Transitions are one-directional: `Pending → Validating → {Won | Lost}`
/// and `Pending → Expired`. Terminal states accept no further transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BountyStatus {
    /// Started, waiting for a photo submission.
    Pending,
    /// Photo received, adjudication in flight.
    Validating,
    /// Adjudicated a win; payout handled by settlement.
    Won,
    /// Adjudicated a loss; stake distributed by settlement.
    Lost,
    /// Timer lapsed with no submission.
    Expired,
}

impl BountyStatus {
    /// Terminal states accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BountyStatus::Won | BountyStatus::Lost | BountyStatus::Expired)
    }

    /// Active states count against the one-active-bounty-per-wallet limit.
    pub fn is_active(&self) -> bool {
        matches!(self, BountyStatus::Pending | BountyStatus::Validating)
    }
}

/// Which attestation provider vouched for the submitted photo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttestationKind {
    /// Content-hash plus metadata heuristics.
    Standard,
    /// Hardware root of trust with a signature and certificate chain.
    HardwareBacked,
}

/// One instance of a player accepting a staked find-and-photograph challenge.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bounty {
    pub id: BountyId,
    pub mission_id: MissionId,
    pub wallet: WalletAddress,
    pub tier: Tier,
    pub stake: SkrAmount,
    pub status: BountyStatus,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub settlement_account: SettlementAccount,
    /// Set when the bounty reaches a terminal adjudicated state.
    pub settlement_tx: Option<SettlementTx>,
    /// When the bounty entered a terminal state; drives retention GC.
    pub terminal_at: Option<Timestamp>,
    /// Whether the submission carried a device attestation.
    pub attested: bool,
    pub attestation_kind: Option<AttestationKind>,
}

// Inline hex encoding to avoid adding the `hex` crate as a dependency of types.
mod hex {
    pub fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}
