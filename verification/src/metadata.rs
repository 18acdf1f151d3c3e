//! Photo metadata boundary.
//!
//! Metadata is a heuristic signal only, never authoritative proof: the
//! pre-checker consumes it, nothing else trusts it.

use seek_types::Timestamp;
use serde::{Deserialize, Serialize};

/// Metadata recovered from (or submitted alongside) a photo.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PhotoMetadata {
    /// When the photo claims to have been captured.
    pub captured_at: Option<Timestamp>,
    /// GPS coordinates (latitude, longitude).
    pub gps: Option<(f64, f64)>,
    pub device_make: Option<String>,
    pub device_model: Option<String>,
}

impl PhotoMetadata {
    /// Whether the photo carries any device identity at all.
    pub fn has_device_identity(&self) -> bool {
        self.device_make.is_some() || self.device_model.is_some()
    }
}

/// Boundary trait: turn raw photo bytes (plus whatever the client sent
/// alongside) into metadata.
pub trait MetadataExtractor: Send + Sync {
    fn extract(&self, photo: &[u8], client_supplied: Option<&PhotoMetadata>) -> PhotoMetadata;
}

/// Extractor that trusts only the client-supplied metadata block.
///
/// A future EXIF-parsing extractor plugs in behind the same trait.
pub struct PassthroughExtractor;

impl MetadataExtractor for PassthroughExtractor {
    fn extract(&self, _photo: &[u8], client_supplied: Option<&PhotoMetadata>) -> PhotoMetadata {
        client_supplied.cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_returns_client_metadata() {
        let supplied = PhotoMetadata {
            captured_at: Some(Timestamp::new(42)),
            gps: Some((51.5, -0.1)),
            device_make: Some("Apple".into()),
            device_model: Some("iPhone 15".into()),
        };
        let out = PassthroughExtractor.extract(b"jpeg", Some(&supplied));
        assert_eq!(out.captured_at, Some(Timestamp::new(42)));
        assert!(out.has_device_identity());
    }

    #[test]
    fn passthrough_defaults_when_absent() {
        let out = PassthroughExtractor.extract(b"jpeg", None);
        assert!(out.captured_at.is_none());
        assert!(!out.has_device_identity());
    }
}
