//! Authoritative in-process state for the bounty pipeline.
//!
//! All maps here are process-local: the design assumes a single writer
//! process. Running more than one instance without a shared store would
//! break the one-active-bounty and one-credential-per-wallet invariants.

pub mod bounty_store;
pub mod catalog;
pub mod error;
pub mod secrets;

pub use bounty_store::BountyStore;
pub use catalog::MissionCatalog;
pub use error::StoreError;
pub use secrets::MissionSecretStore;
