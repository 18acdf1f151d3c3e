//! On-chain settlement plumbing: the three-phase reveal/propose/finalize
//! protocol and the durable queue that waits out the challenge window.

pub mod contract;
pub mod distribution;
pub mod error;
pub mod gateway;
pub mod queue;
pub mod sequencer;
pub mod worker;

pub use contract::SettlementContract;
pub use gateway::HttpSettlementContract;
pub use distribution::{loss_distribution, win_payout, Distribution};
pub use error::SettlementError;
pub use queue::{FinalizationQueue, PendingFinalization};
pub use sequencer::{SettlementOutcome, SettlementSequencer};
pub use worker::{FinalizationWorker, FinalizePassStats};
