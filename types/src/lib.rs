//! Fundamental types for the SEEK protocol backend.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: wallet addresses, bounty identifiers and lifecycle states,
//! mission catalog entries, protocol parameters, and timestamps.

pub mod address;
pub mod amount;
pub mod bounty;
pub mod mission;
pub mod params;
pub mod time;

pub use address::WalletAddress;
pub use amount::{SkrAmount, SKR_UNIT};
pub use bounty::{AttestationKind, Bounty, BountyId, BountyStatus, SettlementAccount, SettlementTx};
pub use mission::{Mission, MissionId};
pub use params::{ProtocolParams, Tier};
pub use time::Timestamp;
