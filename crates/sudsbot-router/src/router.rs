// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook event orchestration.
//!
//! Resolves the owning store, classifies each event, drives the
//! reservation ledger, and renders one templated reply per event. Reply
//! delivery is best-effort: a sink failure is logged and never rolls back
//! ledger state or fails the webhook.

use std::sync::Arc;

use tracing::{debug, error, warn};

use sudsbot_catalog::MessageCatalog;
use sudsbot_core::traits::NotificationSink;
use sudsbot_core::{
    MachineKind, OutboundReply, QuickChoice, Store, SudsbotError, TemplateKey,
};
use sudsbot_ledger::{Admission, ReservationLedger};
use sudsbot_storage::Database;
use sudsbot_storage::queries::{machines, stores};

use crate::classifier::{
    self, DRYER_TRIGGER, Intent, WASHER_TRIGGER, selection_payload,
};

/// Payload of one inbound webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventBody {
    /// A text message from the user.
    Text(String),
    /// Sticker, image, location, anything non-text.
    Other,
}

/// One platform-agnostic inbound event.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    /// One-shot handle the reply must be addressed to. Empty when the
    /// platform offers no reply window (e.g. redelivered events); such
    /// events are processed but no reply is attempted.
    pub reply_handle: String,
    /// Platform user id of the sender, when known.
    pub user_id: Option<String>,
    pub body: EventBody,
}

/// Routes webhook events to ledger operations and templated replies.
pub struct ConversationRouter {
    db: Database,
    ledger: ReservationLedger,
    sink: Arc<dyn NotificationSink>,
}

impl ConversationRouter {
    pub fn new(db: Database, sink: Arc<dyn NotificationSink>) -> Self {
        let ledger = ReservationLedger::new(db.clone());
        Self { db, ledger, sink }
    }

    pub fn ledger(&self) -> &ReservationLedger {
        &self.ledger
    }

    /// Process one webhook delivery.
    ///
    /// `destination` is the bot/channel id the platform addressed; a
    /// destination with no registered store fails closed. Events are
    /// handled in order, each producing at most one reply.
    pub async fn process_webhook(
        &self,
        destination: &str,
        events: Vec<InboundEvent>,
    ) -> Result<(), SudsbotError> {
        let Some(store) = stores::resolve_by_channel(&self.db, destination).await? else {
            warn!(destination, "webhook for unregistered channel rejected");
            return Err(SudsbotError::Unauthorized(format!(
                "no store registered for channel {destination}"
            )));
        };

        let catalog = MessageCatalog::load(&self.db, &store.id).await?;

        for event in events {
            let reply = self.handle_event(&store, &catalog, &event).await;
            if event.reply_handle.is_empty() {
                debug!(store_id = %store.id, "event without reply handle, skipping reply");
                continue;
            }
            if let Err(e) = self
                .sink
                .send(&event.reply_handle, &store.reply_credential, &reply)
                .await
            {
                error!(store_id = %store.id, error = %e, "reply delivery failed");
            }
        }
        Ok(())
    }

    /// Resolve one event into its reply. Storage failures degrade to the
    /// generic error template instead of killing the whole batch.
    async fn handle_event(
        &self,
        store: &Store,
        catalog: &MessageCatalog,
        event: &InboundEvent,
    ) -> OutboundReply {
        let text = match &event.body {
            EventBody::Other => return OutboundReply::text(catalog.text(TemplateKey::NonText)),
            EventBody::Text(text) => text,
        };

        match classifier::classify(text) {
            Intent::GreetOrUnknown => Self::service_menu(catalog),
            Intent::ListWashers => self.machine_menu(store, catalog, MachineKind::Washer).await,
            Intent::ListDryers => self.machine_menu(store, catalog, MachineKind::Dryer).await,
            Intent::SelectMachine { kind, number } => {
                let Some(user_id) = event.user_id.as_deref() else {
                    warn!(store_id = %store.id, "selection without sender id");
                    return Self::service_menu(catalog);
                };
                self.reserve(store, catalog, kind, number, user_id).await
            }
        }
    }

    /// Greeting plus the two top-level service choices.
    fn service_menu(catalog: &MessageCatalog) -> OutboundReply {
        OutboundReply::with_choices(
            catalog.text(TemplateKey::Greeting),
            vec![
                QuickChoice {
                    label: WASHER_TRIGGER.to_string(),
                    payload: WASHER_TRIGGER.to_string(),
                },
                QuickChoice {
                    label: DRYER_TRIGGER.to_string(),
                    payload: DRYER_TRIGGER.to_string(),
                },
            ],
        )
    }

    /// One tappable choice per active machine of the requested kind.
    async fn machine_menu(
        &self,
        store: &Store,
        catalog: &MessageCatalog,
        kind: MachineKind,
    ) -> OutboundReply {
        let active = match machines::list_active(&self.db, &store.id, kind).await {
            Ok(active) => active,
            Err(e) => {
                error!(store_id = %store.id, error = %e, "machine listing failed");
                return OutboundReply::text(catalog.text(TemplateKey::GenericError));
            }
        };
        if active.is_empty() {
            return OutboundReply::text(catalog.text(TemplateKey::NoMachines));
        }

        let key = match kind {
            MachineKind::Washer => TemplateKey::ChooseWasher,
            MachineKind::Dryer => TemplateKey::ChooseDryer,
        };
        let choices = active
            .iter()
            .map(|m| QuickChoice {
                label: m.display_name.clone(),
                payload: selection_payload(m.kind, m.number),
            })
            .collect();
        OutboundReply::with_choices(catalog.text(key), choices)
    }

    async fn reserve(
        &self,
        store: &Store,
        catalog: &MessageCatalog,
        kind: MachineKind,
        number: i64,
        user_id: &str,
    ) -> OutboundReply {
        match self.ledger.try_reserve(&store.id, kind, number, user_id).await {
            Ok(Admission::Admitted(r)) => OutboundReply::text(catalog.render(
                TemplateKey::Confirmation,
                &[
                    ("duration", &r.duration_minutes.to_string()),
                    ("display_name", &r.display_name),
                ],
            )),
            Ok(Admission::Busy { display_name }) => OutboundReply::text(
                catalog.render(TemplateKey::Busy, &[("display_name", &display_name)]),
            ),
            Ok(Admission::Inactive { display_name }) => OutboundReply::text(
                catalog.render(TemplateKey::Inactive, &[("display_name", &display_name)]),
            ),
            Ok(Admission::NotFound) => OutboundReply::text(catalog.text(TemplateKey::NotFound)),
            Err(e) => {
                error!(store_id = %store.id, kind = %kind, number, error = %e, "admission failed");
                OutboundReply::text(catalog.text(TemplateKey::GenericError))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sudsbot_catalog::default_text;
    use sudsbot_test_utils::{RecordingSink, TEST_CHANNEL_ID, TEST_CREDENTIAL, TestEnv};

    fn text_event(text: &str, user: &str) -> InboundEvent {
        InboundEvent {
            reply_handle: format!("reply-{user}"),
            user_id: Some(user.to_string()),
            body: EventBody::Text(text.to_string()),
        }
    }

    async fn setup() -> (TestEnv, RecordingSink, ConversationRouter) {
        let env = TestEnv::new().await.unwrap();
        let sink = RecordingSink::new();
        let router = ConversationRouter::new(env.db.clone(), Arc::new(sink.clone()));
        (env, sink, router)
    }

    #[tokio::test]
    async fn unknown_text_gets_greeting_menu() {
        let (_env, sink, router) = setup().await;
        router
            .process_webhook(TEST_CHANNEL_ID, vec![text_event("hello", "u1")])
            .await
            .unwrap();

        let sent = sink.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].reply_handle, "reply-u1");
        assert_eq!(sent[0].credential, TEST_CREDENTIAL);
        assert_eq!(sent[0].reply.text, default_text(TemplateKey::Greeting));
        let payloads: Vec<_> = sent[0].reply.choices.iter().map(|c| c.payload.as_str()).collect();
        assert_eq!(payloads, vec!["ซักผ้า", "อบผ้า"]);
    }

    #[tokio::test]
    async fn washer_list_offers_only_enabled_machines_in_order() {
        let (env, sink, router) = setup().await;
        env.seed_machine(MachineKind::Washer, 2, 30, true).await.unwrap();
        env.seed_machine(MachineKind::Washer, 1, 30, true).await.unwrap();
        env.seed_machine(MachineKind::Washer, 3, 30, false).await.unwrap();
        env.seed_machine(MachineKind::Dryer, 1, 40, true).await.unwrap();

        router
            .process_webhook(TEST_CHANNEL_ID, vec![text_event("ซักผ้า", "u1")])
            .await
            .unwrap();

        let sent = sink.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].reply.text, default_text(TemplateKey::ChooseWasher));
        let choices = &sent[0].reply.choices;
        assert_eq!(choices.len(), 2);
        assert_eq!(choices[0].label, "Washer 1");
        assert_eq!(choices[0].payload, "ซัก_เลือก_1");
        assert_eq!(choices[1].payload, "ซัก_เลือก_2");
    }

    #[tokio::test]
    async fn empty_machine_list_says_no_machines() {
        let (_env, sink, router) = setup().await;
        router
            .process_webhook(TEST_CHANNEL_ID, vec![text_event("อบผ้า", "u1")])
            .await
            .unwrap();

        let sent = sink.sent().await;
        assert_eq!(sent[0].reply.text, default_text(TemplateKey::NoMachines));
        assert!(sent[0].reply.choices.is_empty());
    }

    #[tokio::test]
    async fn selection_reserves_and_confirms() {
        let (env, sink, router) = setup().await;
        env.seed_machine(MachineKind::Washer, 1, 30, true).await.unwrap();

        router
            .process_webhook(TEST_CHANNEL_ID, vec![text_event("ซัก_เลือก_1", "u1")])
            .await
            .unwrap();

        let sent = sink.sent().await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].reply.text.contains("30"));
        assert!(sent[0].reply.text.contains("Washer 1"));

        let pending = router.ledger().list_pending(&env.store.id).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].user_id, "u1");
    }

    #[tokio::test]
    async fn second_selection_in_same_batch_is_busy() {
        let (env, sink, router) = setup().await;
        env.seed_machine(MachineKind::Washer, 1, 30, true).await.unwrap();

        router
            .process_webhook(
                TEST_CHANNEL_ID,
                vec![
                    text_event("ซัก_เลือก_1", "u1"),
                    text_event("ซัก_เลือก_1", "u2"),
                ],
            )
            .await
            .unwrap();

        let sent = sink.sent().await;
        assert_eq!(sent.len(), 2);
        assert!(sent[0].reply.text.contains("Washer 1"));
        assert_eq!(
            sent[1].reply.text,
            sudsbot_catalog::render(
                default_text(TemplateKey::Busy),
                &[("display_name", "Washer 1")]
            )
        );

        let pending = router.ledger().list_pending(&env.store.id).await.unwrap();
        assert_eq!(pending.len(), 1);
    }

    #[tokio::test]
    async fn disabled_and_unknown_machines_reply_without_reserving() {
        let (env, sink, router) = setup().await;
        env.seed_machine(MachineKind::Dryer, 2, 40, false).await.unwrap();

        router
            .process_webhook(
                TEST_CHANNEL_ID,
                vec![
                    text_event("อบ_เลือก_2", "u1"),
                    text_event("อบ_เลือก_9", "u1"),
                ],
            )
            .await
            .unwrap();

        let sent = sink.sent().await;
        assert!(sent[0].reply.text.contains("Dryer 2"));
        assert_eq!(sent[1].reply.text, default_text(TemplateKey::NotFound));
        let pending = router.ledger().list_pending(&env.store.id).await.unwrap();
        assert!(pending.is_empty());
    }

    #[tokio::test]
    async fn non_text_event_gets_non_text_template() {
        let (_env, sink, router) = setup().await;
        router
            .process_webhook(
                TEST_CHANNEL_ID,
                vec![InboundEvent {
                    reply_handle: "reply-1".to_string(),
                    user_id: Some("u1".to_string()),
                    body: EventBody::Other,
                }],
            )
            .await
            .unwrap();

        let sent = sink.sent().await;
        assert_eq!(sent[0].reply.text, default_text(TemplateKey::NonText));
    }

    #[tokio::test]
    async fn unregistered_channel_fails_closed() {
        let (_env, sink, router) = setup().await;
        let err = router
            .process_webhook("other-channel", vec![text_event("hello", "u1")])
            .await
            .unwrap_err();
        assert!(matches!(err, SudsbotError::Unauthorized(_)));
        assert_eq!(sink.sent_count().await, 0);
    }

    #[tokio::test]
    async fn store_template_override_is_used() {
        let (env, sink, router) = setup().await;
        env.seed_template("greeting", "Welcome to {x}!").await.unwrap();

        router
            .process_webhook(TEST_CHANNEL_ID, vec![text_event("hi", "u1")])
            .await
            .unwrap();

        let sent = sink.sent().await;
        // Unresolved placeholders stay verbatim.
        assert_eq!(sent[0].reply.text, "Welcome to {x}!");
    }

    #[tokio::test]
    async fn sink_failure_does_not_fail_webhook_or_roll_back() {
        let (env, sink, router) = setup().await;
        env.seed_machine(MachineKind::Washer, 1, 30, true).await.unwrap();
        sink.set_failing(true).await;

        router
            .process_webhook(TEST_CHANNEL_ID, vec![text_event("ซัก_เลือก_1", "u1")])
            .await
            .unwrap();

        // The reservation committed even though delivery failed.
        let pending = router.ledger().list_pending(&env.store.id).await.unwrap();
        assert_eq!(pending.len(), 1);
    }

    #[tokio::test]
    async fn missing_reply_handle_skips_delivery_but_still_reserves() {
        let (env, sink, router) = setup().await;
        env.seed_machine(MachineKind::Washer, 1, 30, true).await.unwrap();

        router
            .process_webhook(
                TEST_CHANNEL_ID,
                vec![InboundEvent {
                    reply_handle: String::new(),
                    user_id: Some("u1".to_string()),
                    body: EventBody::Text("ซัก_เลือก_1".to_string()),
                }],
            )
            .await
            .unwrap();

        assert_eq!(sink.sent_count().await, 0);
        let pending = router.ledger().list_pending(&env.store.id).await.unwrap();
        assert_eq!(pending.len(), 1);
    }
}
