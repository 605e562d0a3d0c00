// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `X-Hub-Signature-256` webhook signature verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Header the platform signs webhook bodies with.
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

const PREFIX: &str = "sha256=";

/// Check a `sha256=<hex>` header value against the HMAC-SHA256 of `body`.
///
/// The digest comparison is constant-time.
pub fn verify_signature(body: &[u8], header_value: &str, app_secret: &str) -> bool {
    let Some(hex_digest) = header_value.trim().strip_prefix(PREFIX) else {
        warn!("invalid signature header format (missing sha256= prefix)");
        return false;
    };
    let Ok(expected) = hex::decode(hex_digest) else {
        warn!("signature header is not valid hex");
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(app_secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// Produce the header value the platform would send for `body`.
pub fn sign(body: &[u8], app_secret: &str) -> String {
    // HMAC accepts keys of any length.
    let mut mac = match HmacSha256::new_from_slice(app_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(body);
    format!("{PREFIX}{}", hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "app-secret";
    const BODY: &[u8] = br#"{"entry":[]}"#;

    #[test]
    fn signed_body_verifies() {
        let header = sign(BODY, SECRET);
        assert!(header.starts_with("sha256="));
        assert_eq!(header.len(), "sha256=".len() + 64);
        assert!(verify_signature(BODY, &header, SECRET));
    }

    #[test]
    fn tampered_body_fails() {
        let header = sign(BODY, SECRET);
        assert!(!verify_signature(br#"{"entry":[1]}"#, &header, SECRET));
    }

    #[test]
    fn wrong_secret_fails() {
        let header = sign(BODY, "other-secret");
        assert!(!verify_signature(BODY, &header, SECRET));
    }

    #[test]
    fn malformed_headers_fail() {
        let digest = sign(BODY, SECRET);
        let bare = digest.trim_start_matches("sha256=");
        assert!(!verify_signature(BODY, bare, SECRET));
        assert!(!verify_signature(BODY, "sha256=zz-not-hex", SECRET));
        assert!(!verify_signature(BODY, "sha256=", SECRET));
        assert!(!verify_signature(BODY, "", SECRET));
    }
}
