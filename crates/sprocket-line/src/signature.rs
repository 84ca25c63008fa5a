// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook signature verification.
//!
//! LINE signs each webhook delivery with HMAC-SHA256 over the raw request
//! body using the channel secret, base64-encoded into the
//! `x-line-signature` header.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verifies the `x-line-signature` header against the raw request body.
///
/// Returns `false` for any malformed signature; comparison happens inside
/// the MAC so it is constant-time.
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

/// Computes the signature for a body (used by tests and local tooling).
pub fn sign(channel_secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(body);
    BASE64.encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_body_verifies() {
        let secret = "channel-secret";
        let body = br#"{"events": []}"#;
        let signature = sign(secret, body);
        assert!(verify_signature(secret, body, &signature));
    }

    #[test]
    fn tampered_body_fails() {
        let secret = "channel-secret";
        let signature = sign(secret, br#"{"events": []}"#);
        assert!(!verify_signature(secret, br#"{"events": [{}]}"#, &signature));
    }

    #[test]
    fn wrong_secret_fails() {
        let body = br#"{"events": []}"#;
        let signature = sign("secret-a", body);
        assert!(!verify_signature("secret-b", body, &signature));
    }

    #[test]
    fn malformed_base64_fails() {
        assert!(!verify_signature("secret", b"body", "not/valid base64!!"));
    }
}
