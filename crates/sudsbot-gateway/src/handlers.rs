// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook and health handlers.
//!
//! The webhook handler verifies the platform signature over the raw body
//! before the body is parsed or any state is touched; a bad signature is
//! rejected with 401 and zero datastore access.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{error, warn};

use sudsbot_core::{HealthStatus, SudsbotError};
use sudsbot_line::webhook::{WebhookEnvelope, WebhookEvent};
use sudsbot_line::verify_signature;
use sudsbot_router::{EventBody, InboundEvent};

use crate::server::GatewayState;

/// Error response body shared by all endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub(crate) fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

/// Map a processing error onto an HTTP response.
pub(crate) fn map_error(e: SudsbotError) -> Response {
    match e {
        SudsbotError::Unauthorized(message) => error_response(StatusCode::NOT_FOUND, message),
        SudsbotError::BadInput(message) => error_response(StatusCode::BAD_REQUEST, message),
        other => {
            error!(error = %other, "request failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// GET /health
///
/// Unauthenticated liveness endpoint; checks the datastore is reachable.
pub async fn get_public_health(State(state): State<GatewayState>) -> Response {
    let status = match state.db.health_check().await {
        Ok(HealthStatus::Healthy) => "ok".to_string(),
        Ok(HealthStatus::Degraded(detail)) | Ok(HealthStatus::Unhealthy(detail)) => detail,
        Err(e) => {
            error!(error = %e, "health check failed");
            return error_response(StatusCode::SERVICE_UNAVAILABLE, "datastore unreachable");
        }
    };
    (
        StatusCode::OK,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
        .into_response()
}

/// POST /webhook
///
/// Entry point for LINE deliveries. Order matters: signature over raw
/// bytes first, then parse, then route.
pub async fn post_webhook(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get("x-line-signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if !verify_signature(&state.channel_secret, &body, signature) {
        warn!("webhook delivery with invalid signature rejected");
        return error_response(StatusCode::UNAUTHORIZED, "invalid signature");
    }

    let envelope: WebhookEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(error = %e, "unparseable webhook body");
            return error_response(StatusCode::BAD_REQUEST, "malformed webhook body");
        }
    };

    let events: Vec<InboundEvent> = envelope.events.iter().filter_map(to_inbound).collect();
    match state
        .router
        .process_webhook(&envelope.destination, events)
        .await
    {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({"status": "ok"}))).into_response(),
        Err(e) => map_error(e),
    }
}

/// Lower a wire event into the router's channel-agnostic form.
///
/// Message events carry their text or count as non-text; a follow event
/// (user adds the bot) opens the service menu. Everything else is
/// dropped.
fn to_inbound(event: &WebhookEvent) -> Option<InboundEvent> {
    let reply_handle = event.reply_token.clone().unwrap_or_default();
    let user_id = event.source.as_ref().and_then(|s| s.user_id.clone());
    match event.event_type.as_str() {
        "message" => {
            let body = match event.text() {
                Some(text) => EventBody::Text(text.to_string()),
                None => EventBody::Other,
            };
            Some(InboundEvent {
                reply_handle,
                user_id,
                body,
            })
        }
        "follow" => Some(InboundEvent {
            reply_handle,
            user_id,
            body: EventBody::Text(String::new()),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_event(json: &str) -> WebhookEvent {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn text_message_lowers_to_text_body() {
        let event = message_event(
            r#"{"type": "message", "replyToken": "rt",
                "source": {"userId": "U1"},
                "message": {"type": "text", "text": "ซักผ้า"}}"#,
        );
        let inbound = to_inbound(&event).unwrap();
        assert_eq!(inbound.reply_handle, "rt");
        assert_eq!(inbound.user_id.as_deref(), Some("U1"));
        assert_eq!(inbound.body, EventBody::Text("ซักผ้า".to_string()));
    }

    #[test]
    fn sticker_message_lowers_to_other() {
        let event = message_event(
            r#"{"type": "message", "replyToken": "rt",
                "message": {"type": "sticker"}}"#,
        );
        assert_eq!(to_inbound(&event).unwrap().body, EventBody::Other);
    }

    #[test]
    fn follow_event_opens_the_menu() {
        let event = message_event(r#"{"type": "follow", "replyToken": "rt"}"#);
        assert_eq!(
            to_inbound(&event).unwrap().body,
            EventBody::Text(String::new())
        );
    }

    #[test]
    fn unfollow_event_is_dropped() {
        let event = message_event(r#"{"type": "unfollow"}"#);
        assert!(to_inbound(&event).is_none());
    }

    #[test]
    fn error_response_serializes() {
        let resp = ErrorResponse {
            error: "something went wrong".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("something went wrong"));
    }
}
