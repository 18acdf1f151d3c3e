//! Device attestation: optional proof that a photo was captured on a
//! specific device.
//!
//! Two providers form a closed set: `Standard` (content hash plus metadata
//! heuristics) and `HardwareBacked` (adds a device signature over the
//! content hash and a server-issued nonce). Certificate chain validation
//! against a vendor root is a boundary concern; this verifier checks the
//! signature against the leaf key carried in the chain.

use seek_types::{AttestationKind, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::VerificationError;

/// Attestation payload submitted with a photo.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttestationPayload {
    Standard {
        /// Hex SHA-256 of the photo bytes.
        content_hash: String,
        captured_at: Timestamp,
        device_model: String,
    },
    HardwareBacked {
        content_hash: String,
        captured_at: Timestamp,
        device_model: String,
        /// Hex Ed25519 signature over `content_hash || nonce`.
        signature: String,
        /// Hex-encoded certificate chain, leaf first. The leaf entry is the
        /// device's attestation public key.
        cert_chain: Vec<String>,
        /// The server-issued nonce echoed back by the device.
        nonce: String,
    },
}

impl AttestationPayload {
    pub fn kind(&self) -> AttestationKind {
        match self {
            AttestationPayload::Standard { .. } => AttestationKind::Standard,
            AttestationPayload::HardwareBacked { .. } => AttestationKind::HardwareBacked,
        }
    }

    fn content_hash(&self) -> &str {
        match self {
            AttestationPayload::Standard { content_hash, .. } => content_hash,
            AttestationPayload::HardwareBacked { content_hash, .. } => content_hash,
        }
    }
}

pub struct DeviceAttestationVerifier;

impl DeviceAttestationVerifier {
    /// Verify an attestation against the submitted photo bytes.
    ///
    /// `expected_nonce` is the nonce the server issued for this submission;
    /// required for hardware-backed payloads, ignored for standard ones.
    pub fn verify(
        &self,
        payload: &AttestationPayload,
        photo: &[u8],
        expected_nonce: Option<&str>,
    ) -> Result<AttestationKind, VerificationError> {
        let actual_hash = hex::encode(seek_crypto::sha256(photo));
        if !payload.content_hash().eq_ignore_ascii_case(&actual_hash) {
            return Err(VerificationError::AttestationRejected(
                "content hash does not match photo bytes".into(),
            ));
        }

        match payload {
            AttestationPayload::Standard { device_model, .. } => {
                if device_model.trim().is_empty() {
                    return Err(VerificationError::AttestationRejected(
                        "standard attestation requires a device model".into(),
                    ));
                }
                Ok(AttestationKind::Standard)
            }
            AttestationPayload::HardwareBacked {
                content_hash,
                signature,
                cert_chain,
                nonce,
                ..
            } => {
                let expected = expected_nonce.ok_or_else(|| {
                    VerificationError::AttestationRejected(
                        "no server nonce issued for this submission".into(),
                    )
                })?;
                if nonce != expected {
                    return Err(VerificationError::AttestationRejected(
                        "attestation nonce does not match the issued nonce".into(),
                    ));
                }

                let leaf = cert_chain.first().ok_or_else(|| {
                    VerificationError::AttestationRejected("empty certificate chain".into())
                })?;
                let mut message = content_hash.as_bytes().to_vec();
                message.extend_from_slice(nonce.as_bytes());

                let device_wallet = seek_types::WalletAddress::parse(&format!(
                    "{}{}",
                    seek_types::WalletAddress::PREFIX,
                    leaf
                ))
                .ok_or_else(|| {
                    VerificationError::AttestationRejected("malformed leaf key".into())
                })?;

                let valid =
                    seek_crypto::verify_wallet_signature(&device_wallet, signature, &message)
                        .map_err(|e| VerificationError::AttestationRejected(e.to_string()))?;
                if !valid {
                    return Err(VerificationError::AttestationRejected(
                        "device signature verification failed".into(),
                    ));
                }
                Ok(AttestationKind::HardwareBacked)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seek_crypto::{generate_keypair, sign_message};

    const PHOTO: &[u8] = b"camera-bytes";

    fn photo_hash() -> String {
        hex::encode(seek_crypto::sha256(PHOTO))
    }

    #[test]
    fn standard_attestation_verifies() {
        let payload = AttestationPayload::Standard {
            content_hash: photo_hash(),
            captured_at: Timestamp::new(1000),
            device_model: "Pixel 9".into(),
        };
        let kind = DeviceAttestationVerifier
            .verify(&payload, PHOTO, None)
            .unwrap();
        assert_eq!(kind, AttestationKind::Standard);
    }

    #[test]
    fn tampered_photo_rejected() {
        let payload = AttestationPayload::Standard {
            content_hash: photo_hash(),
            captured_at: Timestamp::new(1000),
            device_model: "Pixel 9".into(),
        };
        let result = DeviceAttestationVerifier.verify(&payload, b"other-bytes", None);
        assert!(matches!(
            result,
            Err(VerificationError::AttestationRejected(_))
        ));
    }

    fn hardware_payload(nonce: &str) -> AttestationPayload {
        let device_key = generate_keypair();
        let content_hash = photo_hash();
        let mut message = content_hash.as_bytes().to_vec();
        message.extend_from_slice(nonce.as_bytes());
        AttestationPayload::HardwareBacked {
            content_hash,
            captured_at: Timestamp::new(1000),
            device_model: "iPhone 15 Pro".into(),
            signature: sign_message(&device_key, &message),
            cert_chain: vec![hex::encode(device_key.verifying_key().as_bytes())],
            nonce: nonce.to_string(),
        }
    }

    #[test]
    fn hardware_attestation_verifies() {
        let payload = hardware_payload("nonce-123");
        let kind = DeviceAttestationVerifier
            .verify(&payload, PHOTO, Some("nonce-123"))
            .unwrap();
        assert_eq!(kind, AttestationKind::HardwareBacked);
    }

    #[test]
    fn wrong_nonce_rejected() {
        let payload = hardware_payload("nonce-123");
        assert!(DeviceAttestationVerifier
            .verify(&payload, PHOTO, Some("nonce-456"))
            .is_err());
    }

    #[test]
    fn missing_server_nonce_rejected() {
        let payload = hardware_payload("nonce-123");
        assert!(DeviceAttestationVerifier.verify(&payload, PHOTO, None).is_err());
    }

    #[test]
    fn forged_signature_rejected() {
        let AttestationPayload::HardwareBacked {
            content_hash,
            captured_at,
            device_model,
            cert_chain,
            nonce,
            ..
        } = hardware_payload("nonce-123")
        else {
            unreachable!()
        };
        // Signature from an unrelated key.
        let imposter = generate_keypair();
        let forged = AttestationPayload::HardwareBacked {
            content_hash,
            captured_at,
            device_model,
            signature: sign_message(&imposter, b"whatever"),
            cert_chain,
            nonce,
        };
        assert!(DeviceAttestationVerifier
            .verify(&forged, PHOTO, Some("nonce-123"))
            .is_err());
    }

    #[test]
    fn payload_kind_is_closed_set() {
        let std_payload = AttestationPayload::Standard {
            content_hash: photo_hash(),
            captured_at: Timestamp::new(0),
            device_model: "m".into(),
        };
        assert_eq!(std_payload.kind(), AttestationKind::Standard);
        assert_eq!(
            hardware_payload("n").kind(),
            AttestationKind::HardwareBacked
        );
    }
}
