//! HMAC signature creation and verification for webhook payloads
//!
//! Signatures are computed over the exact raw bytes of a request or
//! response body. Re-serialized JSON is not guaranteed to reproduce
//! byte-identical output, so callers must pass the bytes that travel
//! on the wire.

use crate::utils::error::{Result, WebhookError};
use hmac::{Hmac, Mac, digest::KeyInit as HmacKeyInit};
use sha2::Sha256;

/// Header carrying the payload signature, inbound and outbound
pub const SIGNATURE_HEADER: &str = "X-Webhook-Signature";

type HmacSha256 = Hmac<Sha256>;

/// Compute the HMAC-SHA256 signature of a payload, hex-encoded
pub fn sign(secret: &str, payload: &[u8]) -> Result<String> {
    let mut mac = <HmacSha256 as HmacKeyInit>::new_from_slice(secret.as_bytes())
        .map_err(|e| WebhookError::Crypto(format!("Invalid HMAC key: {}", e)))?;

    mac.update(payload);
    let result = mac.finalize();
    Ok(hex::encode(result.into_bytes()))
}

/// Verify a payload against a provided signature
pub fn verify(secret: &str, payload: &[u8], signature: &str) -> Result<bool> {
    let expected_signature = sign(secret, payload)?;
    Ok(constant_time_eq(&expected_signature, signature))
}

/// Constant-time string comparison
pub(crate) fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (a_byte, b_byte) in a.bytes().zip(b.bytes()) {
        result |= a_byte ^ b_byte;
    }

    result == 0
}
