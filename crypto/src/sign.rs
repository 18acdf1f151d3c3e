//! Ed25519 signing and verification for the identity challenge protocol.
//!
//! Wallet addresses embed the hex-encoded public key, so verification needs
//! only the address, the signed message, and the hex signature.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use seek_types::WalletAddress;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("malformed wallet address: {0}")]
    MalformedAddress(String),

    #[error("malformed signature: {0}")]
    MalformedSignature(String),
}

/// Generate a fresh Ed25519 keypair (used by tests and tooling).
pub fn generate_keypair() -> SigningKey {
    SigningKey::generate(&mut rand::rngs::OsRng)
}

/// The wallet address for a signing key: `skr_` + hex public key.
pub fn wallet_for_key(key: &SigningKey) -> WalletAddress {
    WalletAddress::new(format!(
        "{}{}",
        WalletAddress::PREFIX,
        hex::encode(key.verifying_key().as_bytes())
    ))
}

/// Sign a message, returning the hex-encoded signature.
pub fn sign_message(key: &SigningKey, message: &[u8]) -> String {
    hex::encode(key.sign(message).to_bytes())
}

/// Verify a hex-encoded signature over `message` against the public key
/// embedded in `wallet`.
///
/// Returns `Ok(false)` for a well-formed but invalid signature; `Err` only
/// for malformed inputs.
pub fn verify_wallet_signature(
    wallet: &WalletAddress,
    signature_hex: &str,
    message: &[u8],
) -> Result<bool, CryptoError> {
    let key_bytes: [u8; 32] = hex::decode(wallet.key_hex())
        .map_err(|e| CryptoError::MalformedAddress(e.to_string()))?
        .try_into()
        .map_err(|_| CryptoError::MalformedAddress("key is not 32 bytes".into()))?;
    let Ok(verifying_key) = VerifyingKey::from_bytes(&key_bytes) else {
        return Ok(false);
    };

    let sig_bytes: [u8; 64] = hex::decode(signature_hex)
        .map_err(|e| CryptoError::MalformedSignature(e.to_string()))?
        .try_into()
        .map_err(|_| CryptoError::MalformedSignature("signature is not 64 bytes".into()))?;
    let sig = ed25519_dalek::Signature::from_bytes(&sig_bytes);

    Ok(verifying_key.verify(message, &sig).is_ok())
}
