//! HTTP API for the SEEK bounty node.
//!
//! Endpoints:
//! - Identity: nonce challenge issue, signed verify, cached status
//! - Bounty: start (commitment only), photo submit, lookup
//! - Operations: node status report

pub mod error;
pub mod handlers;
pub mod server;

pub use error::RpcError;
pub use server::RpcServer;
