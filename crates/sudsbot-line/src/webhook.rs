// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for inbound LINE webhook deliveries.
//!
//! Only the fields the bot consumes are modeled; unknown fields are
//! ignored so new event types from the platform do not break parsing.

use serde::Deserialize;

/// Top-level webhook body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEnvelope {
    /// Bot user id the delivery was addressed to; resolves the store.
    pub destination: String,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// One event inside a delivery.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    /// One-shot token the reply must quote. Absent on redeliveries and
    /// some event types.
    #[serde(default)]
    pub reply_token: Option<String>,
    #[serde(default)]
    pub source: Option<EventSource>,
    #[serde(default)]
    pub message: Option<EventMessage>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl WebhookEvent {
    /// Text content, when this is a text message event.
    pub fn text(&self) -> Option<&str> {
        match &self.message {
            Some(m) if m.message_type == "text" => m.text.as_deref(),
            _ => None,
        }
    }
}
