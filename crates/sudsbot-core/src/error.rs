// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Sudsbot reservation service.

use thiserror::Error;

/// The primary error type used across all Sudsbot crates.
///
/// Expected reservation outcomes (busy, inactive, not found) are NOT errors;
/// they are modeled as `Admission` variants in `sudsbot-ledger` and resolved
/// locally into templated replies. This enum covers the failures that callers
/// cannot resolve into a specific user-facing message.
#[derive(Debug, Error)]
pub enum SudsbotError {
    /// Configuration errors (invalid TOML, missing secret, store not
    /// registered for an inbound channel). Operator-facing: no user reply
    /// is possible or appropriate.
    #[error("configuration error: {0}")]
    Config(String),

    /// Datastore errors (connection, query failure, migration). Surfaced to
    /// users only as the generic apology template, never as "busy".
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Messaging transport errors (reply endpoint unreachable, non-2xx).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Webhook signature mismatch or bad admin credential.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Unparseable caller input (malformed selection payload, bad admin
    /// request field). Treated the same as "not found" for user replies.
    #[error("bad input: {0}")]
    BadInput(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
