// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state. Three surfaces:
//! unauthenticated health, the signature-authenticated webhook, and the
//! bearer-authenticated admin API.

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use sudsbot_core::SudsbotError;
use sudsbot_router::ConversationRouter;
use sudsbot_storage::Database;

use crate::admin;
use crate::auth::{AuthConfig, auth_middleware};
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub db: Database,
    pub router: Arc<ConversationRouter>,
    /// Channel secret webhook signatures are verified against.
    pub channel_secret: String,
    /// Admin surface authentication.
    pub auth: AuthConfig,
}

/// Gateway server configuration (mirrors ServerConfig from sudsbot-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Build the full route tree.
pub fn app(state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_public_health))
        .route("/webhook", post(handlers::post_webhook))
        .with_state(state.clone());

    let admin_routes = Router::new()
        .route(
            "/admin/v1/stores",
            post(admin::create_store).get(admin::list_stores),
        )
        .route("/admin/v1/stores/{id}/machines", get(admin::list_machines))
        .route(
            "/admin/v1/stores/{id}/machines/{kind}/{number}",
            put(admin::upsert_machine),
        )
        .route(
            "/admin/v1/stores/{id}/templates",
            get(admin::list_templates),
        )
        .route(
            "/admin/v1/stores/{id}/templates/{key}",
            put(admin::upsert_template),
        )
        .route(
            "/admin/v1/stores/{id}/reservations",
            get(admin::list_reservations),
        )
        .route(
            "/admin/v1/stores/{id}/reservations/{rid}/cancel",
            post(admin::cancel_reservation),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind and serve until the task is cancelled.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), SudsbotError> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener =
        tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| SudsbotError::Channel {
                message: format!("failed to bind gateway to {addr}: {e}"),
                source: Some(Box::new(e)),
            })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app(state))
        .await
        .map_err(|e| SudsbotError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use sudsbot_core::MachineKind;
    use sudsbot_test_utils::{RecordingSink, TEST_CHANNEL_ID, TestEnv};

    const CHANNEL_SECRET: &str = "webhook-secret";
    const ADMIN_TOKEN: &str = "admin-token";

    async fn setup() -> (TestEnv, RecordingSink, Router) {
        let env = TestEnv::new().await.unwrap();
        let sink = RecordingSink::new();
        let router = Arc::new(ConversationRouter::new(
            env.db.clone(),
            Arc::new(sink.clone()),
        ));
        let state = GatewayState {
            db: env.db.clone(),
            router,
            channel_secret: CHANNEL_SECRET.to_string(),
            auth: AuthConfig {
                bearer_token: Some(ADMIN_TOKEN.to_string()),
            },
        };
        (env, sink, app(state))
    }

    fn webhook_body(text: &str) -> String {
        serde_json::json!({
            "destination": TEST_CHANNEL_ID,
            "events": [{
                "type": "message",
                "replyToken": "rt-1",
                "source": {"userId": "U1"},
                "message": {"type": "text", "text": text}
            }]
        })
        .to_string()
    }

    fn webhook_request(body: &str, signature: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/webhook")
            .header("content-type", "application/json")
            .header("x-line-signature", signature)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let (_env, _sink, app) = setup().await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn signed_webhook_creates_a_reservation() {
        let (env, sink, app) = setup().await;
        env.seed_machine(MachineKind::Washer, 1, 30, true)
            .await
            .unwrap();

        let body = webhook_body("ซัก_เลือก_1");
        let signature = sudsbot_line::sign(CHANNEL_SECRET, body.as_bytes());
        let response = app
            .oneshot(webhook_request(&body, &signature))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let pending = sudsbot_storage::queries::reservations::list_pending(
            &env.db,
            &env.store.id,
            &sudsbot_storage::now_ts(),
        )
        .await
        .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(sink.sent_count().await, 1);
    }

    #[tokio::test]
    async fn bad_signature_is_rejected_before_any_processing() {
        let (env, sink, app) = setup().await;
        env.seed_machine(MachineKind::Washer, 1, 30, true)
            .await
            .unwrap();

        let body = webhook_body("ซัก_เลือก_1");
        let response = app
            .oneshot(webhook_request(&body, "Zm9yZ2VkIHNpZ25hdHVyZQ=="))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let pending = sudsbot_storage::queries::reservations::list_pending(
            &env.db,
            &env.store.id,
            &sudsbot_storage::now_ts(),
        )
        .await
        .unwrap();
        assert!(pending.is_empty());
        assert_eq!(sink.sent_count().await, 0);
    }

    #[tokio::test]
    async fn webhook_for_unknown_destination_is_not_found() {
        let (_env, _sink, app) = setup().await;
        let body = serde_json::json!({
            "destination": "unregistered-channel",
            "events": []
        })
        .to_string();
        let signature = sudsbot_line::sign(CHANNEL_SECRET, body.as_bytes());
        let response = app
            .oneshot(webhook_request(&body, &signature))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn admin_requires_bearer_token() {
        let (_env, _sink, app) = setup().await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/admin/v1/stores")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_machine_upsert_and_listing() {
        let (env, _sink, app) = setup().await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!(
                        "/admin/v1/stores/{}/machines/washer/2",
                        env.store.id
                    ))
                    .header("authorization", format!("Bearer {ADMIN_TOKEN}"))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"duration_minutes": 45}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/admin/v1/stores/{}/machines", env.store.id))
                    .header("authorization", format!("Bearer {ADMIN_TOKEN}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let machines: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let listed = machines.as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["number"], 2);
        assert_eq!(listed[0]["duration_minutes"], 45);
        assert_eq!(listed[0]["display_name"], "Washer 2");
    }

    #[tokio::test]
    async fn admin_rejects_unknown_machine_kind() {
        let (env, _sink, app) = setup().await;
        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!(
                        "/admin/v1/stores/{}/machines/ironing/1",
                        env.store.id
                    ))
                    .header("authorization", format!("Bearer {ADMIN_TOKEN}"))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"duration_minutes": 20}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn admin_cancel_is_idempotent_over_http() {
        let (env, _sink, app) = setup().await;
        env.seed_machine(MachineKind::Dryer, 1, 40, true)
            .await
            .unwrap();

        let body = webhook_body("อบ_เลือก_1");
        let signature = sudsbot_line::sign(CHANNEL_SECRET, body.as_bytes());
        app.clone()
            .oneshot(webhook_request(&body, &signature))
            .await
            .unwrap();

        let pending = sudsbot_storage::queries::reservations::list_pending(
            &env.db,
            &env.store.id,
            &sudsbot_storage::now_ts(),
        )
        .await
        .unwrap();
        let rid = pending[0].id.clone();

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri(format!(
                            "/admin/v1/stores/{}/reservations/{rid}/cancel",
                            env.store.id
                        ))
                        .header("authorization", format!("Bearer {ADMIN_TOKEN}"))
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }
}
