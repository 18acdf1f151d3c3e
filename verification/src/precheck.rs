//! Anti-fraud pre-check pipeline.
//!
//! Ordered, short-circuiting checks over submission metadata. Every
//! rejection is terminal: cheap fraud signals never reach the paid vision
//! call.

use seek_types::{ProtocolParams, Timestamp};

use crate::result::VerificationResult;

/// Device model substrings that indicate a screen capture rather than a
/// camera photo.
const SCREEN_CAPTURE_SIGNATURES: &[&str] = &[
    "screenshot",
    "screen capture",
    "simulator",
    "emulator",
    "windows",
    "macintosh",
];

/// Whether pre-checks run at all.
///
/// `Bypassed` exists for low-trust test environments only and is
/// constructor-injected; a production node is only ever built `Enforced`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrecheckPolicy {
    Enforced,
    Bypassed,
}

pub struct AntiFraudPreChecker {
    policy: PrecheckPolicy,
}

impl AntiFraudPreChecker {
    pub fn new(policy: PrecheckPolicy) -> Self {
        Self { policy }
    }

    /// Run the pipeline. `Some(verdict)` is a terminal rejection; `None`
    /// means the submission may proceed to adjudication.
    pub fn run(
        &self,
        metadata: &crate::metadata::PhotoMetadata,
        bounty_created_at: Timestamp,
        now: Timestamp,
        params: &ProtocolParams,
    ) -> Option<VerificationResult> {
        if self.policy == PrecheckPolicy::Bypassed {
            return None;
        }

        self.check_screenshot(metadata)
            .or_else(|| self.check_precapture(metadata, bounty_created_at, params))
            .or_else(|| self.check_recency(metadata, now, params))
    }

    /// A camera photo carries GPS or device identity; a bare image with
    /// neither is overwhelmingly a screen capture or a stripped re-upload.
    fn check_screenshot(
        &self,
        metadata: &crate::metadata::PhotoMetadata,
    ) -> Option<VerificationResult> {
        if metadata.gps.is_none() && !metadata.has_device_identity() {
            return Some(VerificationResult::precheck_rejection(
                "no GPS and no device metadata: likely screenshot or stripped image",
                0.95,
                true,
            ));
        }

        if let Some(model) = &metadata.device_model {
            let lowered = model.to_lowercase();
            if SCREEN_CAPTURE_SIGNATURES
                .iter()
                .any(|sig| lowered.contains(sig))
            {
                return Some(VerificationResult::precheck_rejection(
                    format!("device model '{model}' matches a screen-capture signature"),
                    0.95,
                    true,
                ));
            }
        }
        None
    }

    /// Reject stale photos and capture times implausibly far in the future
    /// (small positive skew tolerated for clock drift).
    fn check_recency(
        &self,
        metadata: &crate::metadata::PhotoMetadata,
        now: Timestamp,
        params: &ProtocolParams,
    ) -> Option<VerificationResult> {
        let captured_at = metadata.captured_at?;

        if captured_at.elapsed_since(now) > params.photo_max_age_secs {
            return Some(VerificationResult::precheck_rejection(
                format!(
                    "photo is {}s old, exceeding the {}s limit",
                    captured_at.elapsed_since(now),
                    params.photo_max_age_secs
                ),
                0.9,
                false,
            ));
        }

        if now.elapsed_since(captured_at) > params.future_skew_secs {
            return Some(VerificationResult::precheck_rejection(
                "photo capture time is in the future beyond clock-drift tolerance",
                0.9,
                false,
            ));
        }
        None
    }

    /// A capture time preceding the bounty's creation means the photo
    /// existed before the target was assigned: reuse of an old shot.
    fn check_precapture(
        &self,
        metadata: &crate::metadata::PhotoMetadata,
        bounty_created_at: Timestamp,
        params: &ProtocolParams,
    ) -> Option<VerificationResult> {
        let captured_at = metadata.captured_at?;
        let lead = captured_at.elapsed_since(bounty_created_at);
        if lead > params.precapture_tolerance_secs {
            return Some(VerificationResult::precheck_rejection(
                format!("pre-captured image: taken {lead}s before the bounty started"),
                0.9,
                false,
            ));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::PhotoMetadata;

    fn checker() -> AntiFraudPreChecker {
        AntiFraudPreChecker::new(PrecheckPolicy::Enforced)
    }

    fn camera_metadata(captured_at: u64) -> PhotoMetadata {
        PhotoMetadata {
            captured_at: Some(Timestamp::new(captured_at)),
            gps: Some((40.7, -74.0)),
            device_make: Some("Apple".into()),
            device_model: Some("iPhone 15 Pro".into()),
        }
    }

    #[test]
    fn clean_submission_passes() {
        let params = ProtocolParams::default();
        let verdict = checker().run(
            &camera_metadata(1000),
            Timestamp::new(990),
            Timestamp::new(1010),
            &params,
        );
        assert!(verdict.is_none());
    }

    #[test]
    fn bare_image_always_flagged_as_screenshot() {
        let params = ProtocolParams::default();
        let bare = PhotoMetadata::default();
        let verdict = checker()
            .run(&bare, Timestamp::new(0), Timestamp::new(0), &params)
            .expect("must reject");
        assert!(!verdict.is_valid);
        assert!(verdict.is_screenshot);
        assert!(verdict.confidence >= 0.9);
    }

    #[test]
    fn screen_capture_model_string_rejected() {
        let params = ProtocolParams::default();
        let mut meta = camera_metadata(1000);
        meta.device_model = Some("Android SDK built for x86 Emulator".into());
        let verdict = checker()
            .run(&meta, Timestamp::new(990), Timestamp::new(1010), &params)
            .expect("must reject");
        assert!(verdict.is_screenshot);
    }

    #[test]
    fn stale_photo_rejected() {
        let params = ProtocolParams::default();
        let meta = camera_metadata(1000);
        let now = Timestamp::new(1000 + params.photo_max_age_secs + 1);
        let verdict = checker()
            .run(&meta, Timestamp::new(990), now, &params)
            .expect("must reject");
        assert!(!verdict.is_valid);
        assert!(!verdict.is_screenshot);
    }

    #[test]
    fn future_capture_time_rejected() {
        let params = ProtocolParams::default();
        let meta = camera_metadata(2000);
        let now = Timestamp::new(2000 - params.future_skew_secs - 1);
        assert!(checker()
            .run(&meta, Timestamp::new(1900), now, &params)
            .is_some());
    }

    #[test]
    fn small_clock_drift_tolerated() {
        let params = ProtocolParams::default();
        let meta = camera_metadata(1030);
        // Captured 30s "in the future" relative to now: within skew.
        assert!(checker()
            .run(&meta, Timestamp::new(990), Timestamp::new(1000), &params)
            .is_none());
    }

    #[test]
    fn precaptured_photo_rejected() {
        let params = ProtocolParams::default();
        // Taken 10 minutes before the bounty started.
        let meta = camera_metadata(1000);
        let created = Timestamp::new(1000 + 600);
        let verdict = checker()
            .run(&meta, created, created.plus(5), &params)
            .expect("must reject");
        assert!(verdict.reasoning.contains("pre-captured"));
    }

    #[test]
    fn bypassed_policy_skips_everything() {
        let params = ProtocolParams::default();
        let bypass = AntiFraudPreChecker::new(PrecheckPolicy::Bypassed);
        let bare = PhotoMetadata::default();
        assert!(bypass
            .run(&bare, Timestamp::new(0), Timestamp::new(0), &params)
            .is_none());
    }

    #[test]
    fn missing_capture_time_skips_time_checks() {
        // Identity present but no timestamp: screenshot check passes, time
        // checks have nothing to compare.
        let params = ProtocolParams::default();
        let meta = PhotoMetadata {
            captured_at: None,
            gps: Some((1.0, 2.0)),
            device_make: Some("Google".into()),
            device_model: Some("Pixel 9".into()),
        };
        assert!(checker()
            .run(&meta, Timestamp::new(0), Timestamp::new(0), &params)
            .is_none());
    }
}
