// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook signature verification.
//!
//! LINE signs every webhook delivery: the `x-line-signature` header is the
//! base64 of HMAC-SHA256 over the raw request body, keyed by the channel
//! secret. Verification must happen on the exact bytes received, before
//! the body is parsed or anything touches the datastore.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Check a webhook signature against the raw body.
///
/// Returns `false` for a malformed header as well as a wrong digest; the
/// comparison itself is constant-time.
pub fn verify_signature(channel_secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(claimed) = BASE64.decode(signature) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(channel_secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&claimed).is_ok()
}

/// Compute the signature header value for a body. The counterpart of
/// [`verify_signature`], used by integration tests to forge valid
/// deliveries.
pub fn sign(channel_secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(body);
    BASE64.encode(mac.finalize().into_bytes())
}
