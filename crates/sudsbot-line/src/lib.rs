// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LINE Messaging API channel for Sudsbot.
//!
//! Covers the inbound side (webhook wire types and signature
//! verification) and the outbound side (the reply client implementing
//! `NotificationSink`).

pub mod client;
pub mod signature;
pub mod webhook;

pub use client::{DEFAULT_REPLY_URL, LineClient};
pub use signature::{sign, verify_signature};
pub use webhook::{WebhookEnvelope, WebhookEvent};
