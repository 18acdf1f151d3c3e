//! Final verdict type produced by the pipeline.

use serde::{Deserialize, Serialize};

/// The outcome of verifying a submitted photo.
///
/// Produced either by a pre-check rejection (no AI call made) or by the
/// adjudicator after the vision model responds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerificationResult {
    pub is_valid: bool,
    /// Model (or heuristic) confidence in [0, 1].
    pub confidence: f64,
    pub reasoning: String,
    pub detected_objects: Vec<String>,
    pub is_screenshot: bool,
    pub matches_target: bool,
}

impl VerificationResult {
    /// A terminal rejection produced by a pre-check.
    pub fn precheck_rejection(reasoning: impl Into<String>, confidence: f64, is_screenshot: bool) -> Self {
        Self {
            is_valid: false,
            confidence,
            reasoning: reasoning.into(),
            detected_objects: Vec::new(),
            is_screenshot,
            matches_target: false,
        }
    }

    /// The fail-closed verdict for any adjudicator system error. The system
    /// must never default to a win when the adjudicator fails.
    pub fn system_failure(reasoning: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            confidence: 0.0,
            reasoning: reasoning.into(),
            detected_objects: Vec::new(),
            is_screenshot: false,
            matches_target: false,
        }
    }
}
