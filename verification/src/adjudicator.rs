//! Adjudicator: turns a submitted photo into a binary win/loss verdict.
//!
//! Pipeline: pre-checks, sanitized prompt construction, vision call,
//! permissive extraction + strict schema validation, per-tier confidence
//! floor. Any transport or parsing failure fails closed to a loss.

use seek_types::{Mission, ProtocolParams, Tier, Timestamp};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::VerificationError;
use crate::metadata::PhotoMetadata;
use crate::precheck::AntiFraudPreChecker;
use crate::result::VerificationResult;
use crate::vision::VisionProvider;

/// Caps applied to catalog text before prompt interpolation. The catalog is
/// static, but its content still crosses into a model prompt and is treated
/// as untrusted.
const MAX_DESCRIPTION_CHARS: usize = 280;
const MAX_KEYWORD_CHARS: usize = 40;
const MAX_KEYWORDS: usize = 10;

/// Strict schema for the model's verdict. Missing fields or out-of-range
/// values are hard failures, never best-effort coerced.
#[derive(Debug, Deserialize)]
struct VerdictSchema {
    #[serde(rename = "isValid")]
    is_valid: bool,
    confidence: f64,
    reasoning: String,
    #[serde(rename = "detectedObjects")]
    detected_objects: Vec<String>,
    #[serde(rename = "isScreenshot")]
    is_screenshot: bool,
    #[serde(rename = "matchesTarget")]
    matches_target: bool,
}

pub struct Adjudicator {
    provider: Arc<dyn VisionProvider>,
    prechecker: AntiFraudPreChecker,
}

impl Adjudicator {
    pub fn new(provider: Arc<dyn VisionProvider>, prechecker: AntiFraudPreChecker) -> Self {
        Self {
            provider,
            prechecker,
        }
    }

    /// Adjudicate a photo submission against its mission.
    ///
    /// Always returns a verdict: system errors become the fail-closed
    /// `is_valid=false, confidence=0` verdict, never an `Err`.
    pub async fn adjudicate(
        &self,
        photo: &[u8],
        mime: &str,
        mission: &Mission,
        metadata: &PhotoMetadata,
        tier: Tier,
        bounty_created_at: Timestamp,
        now: Timestamp,
        params: &ProtocolParams,
    ) -> VerificationResult {
        if let Some(rejection) = self
            .prechecker
            .run(metadata, bounty_created_at, now, params)
        {
            tracing::info!(
                mission = %mission.id,
                reason = %rejection.reasoning,
                "submission rejected by pre-check, no adjudication call made"
            );
            return rejection;
        }

        let prompt = build_prompt(mission);
        let reply = match self.provider.analyze(photo, mime, &prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(mission = %mission.id, "vision provider failed: {e}");
                return VerificationResult::system_failure(format!("adjudication failed: {e}"));
            }
        };

        let verdict = match parse_verdict(&reply) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(mission = %mission.id, "verdict rejected: {e}");
                return VerificationResult::system_failure(format!("adjudication failed: {e}"));
            }
        };

        self.apply_floor(verdict, tier, params)
    }

    /// Apply the per-tier confidence floor and the model's own screenshot
    /// flag. The floor is the last word: a confident-sounding `isValid` from
    /// the model never survives a sub-floor confidence.
    fn apply_floor(
        &self,
        verdict: VerdictSchema,
        tier: Tier,
        params: &ProtocolParams,
    ) -> VerificationResult {
        let floor = params.confidence_floor_for(tier);
        let below_floor = verdict.confidence < floor;
        let is_valid = verdict.is_valid && !verdict.is_screenshot && !below_floor;

        let reasoning = if verdict.is_valid && below_floor {
            format!(
                "{} (confidence {:.2} below tier {} floor {:.2})",
                verdict.reasoning,
                verdict.confidence,
                tier.as_u8(),
                floor
            )
        } else {
            verdict.reasoning
        };

        VerificationResult {
            is_valid,
            confidence: verdict.confidence,
            reasoning,
            detected_objects: verdict.detected_objects,
            is_screenshot: verdict.is_screenshot,
            matches_target: verdict.matches_target,
        }
    }
}

/// Build the adjudication prompt from sanitized catalog text.
fn build_prompt(mission: &Mission) -> String {
    let description = sanitize(&mission.description, MAX_DESCRIPTION_CHARS);
    let keywords: Vec<String> = mission
        .keywords
        .iter()
        .take(MAX_KEYWORDS)
        .map(|k| sanitize(k, MAX_KEYWORD_CHARS))
        .collect();

    format!(
        "You are verifying a photo for a scavenger bounty. Target: {description}. \
         Acceptable matches: {}. Reply with exactly one JSON object: \
         {{\"isValid\": bool, \"confidence\": number 0-1, \"reasoning\": string, \
         \"detectedObjects\": [string], \"isScreenshot\": bool, \"matchesTarget\": bool}}. \
         Set isScreenshot true if the image is a photo of a screen, a screenshot, \
         or otherwise not a direct camera capture.",
        keywords.join(", ")
    )
}

/// Newline-strip and length-cap a catalog string before interpolation.
fn sanitize(text: &str, max_chars: usize) -> String {
    text.replace(['\n', '\r'], " ").chars().take(max_chars).collect()
}

/// Extract exactly one JSON object from the model's free-text reply.
///
/// Extraction is permissive (tolerates code fences and leading prose by
/// locating the outermost braces); deserialization is strict.
fn parse_verdict(reply: &str) -> Result<VerdictSchema, VerificationError> {
    let start = reply
        .find('{')
        .ok_or_else(|| VerificationError::VerdictParse("no JSON object in reply".into()))?;
    let end = reply
        .rfind('}')
        .ok_or_else(|| VerificationError::VerdictParse("unterminated JSON object".into()))?;
    if end < start {
        return Err(VerificationError::VerdictParse(
            "unterminated JSON object".into(),
        ));
    }

    let verdict: VerdictSchema = serde_json::from_str(&reply[start..=end])
        .map_err(|e| VerificationError::VerdictSchema(e.to_string()))?;

    if !(0.0..=1.0).contains(&verdict.confidence) {
        return Err(VerificationError::VerdictSchema(format!(
            "confidence {} outside [0, 1]",
            verdict.confidence
        )));
    }
    Ok(verdict)
}
