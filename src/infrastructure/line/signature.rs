//! LINE webhook signature verification.
//!
//! LINE signs each webhook delivery with
//! `base64(HMAC-SHA256(channel_secret, request_body))` in the
//! `X-Line-Signature` header. Verification runs over the raw body bytes,
//! before any JSON parsing.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Check `signature` against the body. Comparison happens inside the MAC
/// in constant time; a malformed base64 signature simply fails.
pub fn verify_signature(channel_secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(expected) = BASE64.decode(signature) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(channel_secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// Produce the signature LINE would send for `body`. Test helper for
/// building valid webhook requests.
pub fn sign(channel_secret: &str, body: &[u8]) -> String {
    // HMAC accepts keys of any length, so this cannot fail.
    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(body);
    BASE64.encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_verifies() {
        let secret = "test-channel-secret";
        let body = br#"{"events":[]}"#;
        let signature = sign(secret, body);
        assert!(verify_signature(secret, body, &signature));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let body = br#"{"events":[]}"#;
        let signature = sign("secret-a", body);
        assert!(!verify_signature("secret-b", body, &signature));
    }

    #[test]
    fn test_tampered_body_rejected() {
        let secret = "test-channel-secret";
        let signature = sign(secret, br#"{"events":[]}"#);
        assert!(!verify_signature(secret, br#"{"events":[{}]}"#, &signature));
    }

    #[test]
    fn test_garbage_signature_rejected() {
        assert!(!verify_signature("secret", b"body", "not base64 at all!!!"));
        assert!(!verify_signature("secret", b"body", ""));
    }
}
