//! Photo verification pipeline: cheap anti-fraud pre-checks, vision-model
//! adjudication, and device attestation.
//!
//! Ordering is a cost-control policy: pre-checks are synchronous heuristics
//! over submission metadata and run before the paid vision call; any
//! pre-check failure short-circuits with a terminal verdict.

pub mod adjudicator;
pub mod attestation;
pub mod error;
pub mod metadata;
pub mod precheck;
pub mod result;
pub mod vision;

pub use adjudicator::Adjudicator;
pub use attestation::{AttestationPayload, DeviceAttestationVerifier};
pub use error::VerificationError;
pub use metadata::{MetadataExtractor, PassthroughExtractor, PhotoMetadata};
pub use precheck::{AntiFraudPreChecker, PrecheckPolicy};
pub use result::VerificationResult;
pub use vision::{HttpVisionProvider, VisionProvider};
