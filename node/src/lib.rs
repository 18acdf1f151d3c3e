//! SEEK bounty node: wires the store, verification pipeline, settlement
//! sequencer, and identity verifier into one running service with its
//! background housekeeping tasks.

pub mod config;
pub mod error;
pub mod node;
pub mod service;
pub mod shutdown;

pub use config::NodeConfig;
pub use error::NodeError;
pub use node::{SeekNode, StatusReport};
pub use service::{BountyService, StartedBounty, SubmissionOutcome};
pub use shutdown::ShutdownController;
