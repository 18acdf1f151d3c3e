//! Shared utilities for the SEEK backend.

pub mod logging;

pub use logging::init_tracing;
