// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LINE reply API client.
//!
//! Sends one text message per reply, quoting the event's reply token and
//! authenticating with the owning store's channel access token. Quick
//! replies render as tap-to-send message actions.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use sudsbot_core::traits::NotificationSink;
use sudsbot_core::{OutboundReply, SudsbotError};

/// Default reply endpoint of the Messaging API.
pub const DEFAULT_REPLY_URL: &str = "https://api.line.me/v2/bot/message/reply";

/// Platform cap on quick reply items per message.
const MAX_QUICK_REPLY_ITEMS: usize = 13;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: Vec<TextMessage<'a>>,
}

#[derive(Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
    #[serde(rename = "quickReply", skip_serializing_if = "Option::is_none")]
    quick_reply: Option<QuickReply<'a>>,
}

#[derive(Serialize)]
struct QuickReply<'a> {
    items: Vec<QuickReplyItem<'a>>,
}

#[derive(Serialize)]
struct QuickReplyItem<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    action: MessageAction<'a>,
}

#[derive(Serialize)]
struct MessageAction<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    label: &'a str,
    text: &'a str,
}

/// HTTP client for the reply endpoint.
///
/// Holds no credential: the per-store access token arrives with each
/// `send`, so one client serves every store.
#[derive(Clone)]
pub struct LineClient {
    http: reqwest::Client,
    reply_url: String,
}

impl LineClient {
    pub fn new(reply_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            reply_url: reply_url.into(),
        }
    }

    fn build_request<'a>(reply_token: &'a str, reply: &'a OutboundReply) -> ReplyRequest<'a> {
        let choices = &reply.choices;
        if choices.len() > MAX_QUICK_REPLY_ITEMS {
            warn!(
                count = choices.len(),
                cap = MAX_QUICK_REPLY_ITEMS,
                "quick reply menu truncated to platform cap"
            );
        }
        let quick_reply = (!choices.is_empty()).then(|| QuickReply {
            items: choices
                .iter()
                .take(MAX_QUICK_REPLY_ITEMS)
                .map(|c| QuickReplyItem {
                    kind: "action",
                    action: MessageAction {
                        kind: "message",
                        label: &c.label,
                        text: &c.payload,
                    },
                })
                .collect(),
        });
        ReplyRequest {
            reply_token,
            messages: vec![TextMessage {
                kind: "text",
                text: &reply.text,
                quick_reply,
            }],
        }
    }
}

#[async_trait]
impl NotificationSink for LineClient {
    async fn send(
        &self,
        reply_handle: &str,
        credential: &str,
        reply: &OutboundReply,
    ) -> Result<(), SudsbotError> {
        let request = Self::build_request(reply_handle, reply);
        let response = self
            .http
            .post(&self.reply_url)
            .timeout(REQUEST_TIMEOUT)
            .bearer_auth(credential)
            .json(&request)
            .send()
            .await
            .map_err(|e| SudsbotError::Channel {
                message: "reply request failed".to_string(),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(SudsbotError::Channel {
                message: format!("reply API returned {status}: {detail}"),
                source: None,
            });
        }
        debug!(choices = reply.choices.len(), "reply delivered");
        Ok(())
    }
}
