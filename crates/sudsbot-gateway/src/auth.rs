// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication middleware for the admin API.
//!
//! Admin routes require `Authorization: Bearer <token>`. When no token is
//! configured, all admin requests are rejected (fail-closed). The webhook
//! route never passes through this middleware; it is authenticated by its
//! platform signature instead.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Authentication configuration for the admin surface.
#[derive(Clone)]
pub struct AuthConfig {
    /// Expected bearer token. `None` disables the admin API entirely.
    pub bearer_token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

/// Constant-time token equality, the same primitive the webhook signature
/// check uses. Both tokens are folded through HMAC-SHA256 so the final
/// comparison runs over fixed-length tags.
fn token_matches(expected: &str, presented: &str) -> bool {
    let tag = |token: &str| {
        let Ok(mut mac) = HmacSha256::new_from_slice(b"sudsbot-admin-bearer") else {
            return None;
        };
        mac.update(token.as_bytes());
        Some(mac)
    };
    match (tag(expected), tag(presented)) {
        (Some(expected_mac), Some(presented_mac)) => presented_mac
            .verify_slice(&expected_mac.finalize().into_bytes())
            .is_ok(),
        _ => false,
    }
}

/// Middleware validating the admin bearer token.
pub async fn auth_middleware(
    State(auth): State<AuthConfig>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(ref expected_token) = auth.bearer_token else {
        tracing::error!("admin API has no bearer token configured -- rejecting request");
        return Err(StatusCode::UNAUTHORIZED);
    };

    let presented = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match presented {
        Some(token) if token_matches(expected_token, token) => Ok(next.run(request).await),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}
