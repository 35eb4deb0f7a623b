// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording notification sink for deterministic testing.
//!
//! `RecordingSink` implements `NotificationSink`, capturing every reply it
//! is asked to deliver so tests can assert on texts and quick-reply menus
//! without a live messaging platform.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use sudsbot_core::traits::NotificationSink;
use sudsbot_core::{OutboundReply, SudsbotError};

/// One captured delivery.
#[derive(Debug, Clone)]
pub struct SentReply {
    pub reply_handle: String,
    pub credential: String,
    pub reply: OutboundReply,
}

/// A notification sink that records instead of sending.
///
/// Can be switched into a failing mode to exercise best-effort delivery
/// paths.
#[derive(Clone, Default)]
pub struct RecordingSink {
    sent: Arc<Mutex<Vec<SentReply>>>,
    fail: Arc<Mutex<bool>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All replies captured so far, in delivery order.
    pub async fn sent(&self) -> Vec<SentReply> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Make subsequent `send` calls fail with a channel error.
    pub async fn set_failing(&self, failing: bool) {
        *self.fail.lock().await = failing;
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send(
        &self,
        reply_handle: &str,
        credential: &str,
        reply: &OutboundReply,
    ) -> Result<(), SudsbotError> {
        if *self.fail.lock().await {
            return Err(SudsbotError::Channel {
                message: "recording sink set to fail".to_string(),
                source: None,
            });
        }
        self.sent.lock().await.push(SentReply {
            reply_handle: reply_handle.to_string(),
            credential: credential.to_string(),
            reply: reply.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_in_order() {
        let sink = RecordingSink::new();
        sink.send("r1", "tok", &OutboundReply::text("first"))
            .await
            .unwrap();
        sink.send("r2", "tok", &OutboundReply::text("second"))
            .await
            .unwrap();

        let sent = sink.sent().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].reply_handle, "r1");
        assert_eq!(sent[1].reply.text, "second");
    }

    #[tokio::test]
    async fn failing_mode_returns_channel_error() {
        let sink = RecordingSink::new();
        sink.set_failing(true).await;
        let err = sink
            .send("r1", "tok", &OutboundReply::text("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, SudsbotError::Channel { .. }));
        assert_eq!(sink.sent_count().await, 0);
    }
}
