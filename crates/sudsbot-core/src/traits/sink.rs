// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification sink trait for outbound user replies.

use async_trait::async_trait;

use crate::error::SudsbotError;
use crate::types::OutboundReply;

/// Delivers templated text (optionally with quick-reply choices) back to the
/// originating user via the external messaging transport.
///
/// Delivery is one-shot and at-most-once: failures are logged by callers and
/// never retried, and never surfaced back into ledger state. The reservation
/// write always commits before `send` is attempted.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Send a reply addressed by the platform's reply handle, authenticated
    /// with the owning store's credential.
    async fn send(
        &self,
        reply_handle: &str,
        credential: &str,
        reply: &OutboundReply,
    ) -> Result<(), SudsbotError>;
}
