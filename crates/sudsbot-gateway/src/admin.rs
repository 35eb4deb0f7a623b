// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin REST API handlers.
//!
//! Store provisioning, machine and template configuration, and the
//! reservation dashboard. All routes sit behind the bearer middleware in
//! [`crate::auth`]. Reply credentials are never echoed back in responses.

use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::info;

use sudsbot_core::{MachineConfig, MachineKind, Reservation, Store, TemplateKey};
use sudsbot_catalog::MessageCatalog;
use sudsbot_ledger::Cancellation;
use sudsbot_storage::now_ts;
use sudsbot_storage::queries::{machines, stores, templates};

use crate::handlers::{error_response, map_error};
use crate::server::GatewayState;

#[derive(Debug, Deserialize)]
pub struct CreateStoreRequest {
    /// Explicit id; generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    /// Bot user id webhook deliveries are addressed to.
    pub channel_id: String,
    /// Channel access token used for replies. Write-only: never returned.
    pub reply_credential: String,
}

/// Store representation without the reply credential.
#[derive(Debug, Serialize)]
pub struct StoreResponse {
    pub id: String,
    pub name: String,
    pub channel_id: String,
    pub created_at: String,
}

impl From<Store> for StoreResponse {
    fn from(store: Store) -> Self {
        Self {
            id: store.id,
            name: store.name,
            channel_id: store.channel_id,
            created_at: store.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpsertMachineRequest {
    pub duration_minutes: i64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Button label; defaults to "<Kind> <number>".
    #[serde(default)]
    pub display_name: Option<String>,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct UpsertTemplateRequest {
    pub text: String,
}

/// Effective template text plus whether the store overrides the default.
#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    pub key: String,
    pub text: String,
    pub overridden: bool,
}

async fn require_store(state: &GatewayState, id: &str) -> Result<Store, Response> {
    match stores::get_store(&state.db, id).await {
        Ok(Some(store)) => Ok(store),
        Ok(None) => Err(error_response(
            StatusCode::NOT_FOUND,
            format!("no store with id {id}"),
        )),
        Err(e) => Err(map_error(e)),
    }
}

/// POST /admin/v1/stores
pub async fn create_store(
    State(state): State<GatewayState>,
    Json(body): Json<CreateStoreRequest>,
) -> Response {
    if body.name.trim().is_empty()
        || body.channel_id.trim().is_empty()
        || body.reply_credential.trim().is_empty()
    {
        return error_response(
            StatusCode::BAD_REQUEST,
            "name, channel_id, and reply_credential must be non-empty",
        );
    }
    match stores::resolve_by_channel(&state.db, &body.channel_id).await {
        Ok(Some(existing)) => {
            return error_response(
                StatusCode::CONFLICT,
                format!("channel already registered to store {}", existing.id),
            );
        }
        Ok(None) => {}
        Err(e) => return map_error(e),
    }

    let store = Store {
        id: body
            .id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        name: body.name,
        channel_id: body.channel_id,
        reply_credential: body.reply_credential,
        created_at: now_ts(),
    };
    if let Err(e) = stores::create_store(&state.db, &store).await {
        return map_error(e);
    }
    info!(store_id = %store.id, "store provisioned");
    (StatusCode::CREATED, Json(StoreResponse::from(store))).into_response()
}

/// GET /admin/v1/stores
pub async fn list_stores(State(state): State<GatewayState>) -> Response {
    match stores::list_stores(&state.db).await {
        Ok(all) => Json(
            all.into_iter()
                .map(StoreResponse::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => map_error(e),
    }
}

/// GET /admin/v1/stores/{id}/machines
pub async fn list_machines(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Response {
    if let Err(resp) = require_store(&state, &id).await {
        return resp;
    }
    match machines::list_all(&state.db, &id).await {
        Ok(all) => Json(all).into_response(),
        Err(e) => map_error(e),
    }
}

/// PUT /admin/v1/stores/{id}/machines/{kind}/{number}
///
/// Creates or replaces one machine slot. Disabling (instead of deleting)
/// is how a machine is taken out of service; its reservation history
/// stays intact.
pub async fn upsert_machine(
    State(state): State<GatewayState>,
    Path((id, kind, number)): Path<(String, String, i64)>,
    Json(body): Json<UpsertMachineRequest>,
) -> Response {
    if let Err(resp) = require_store(&state, &id).await {
        return resp;
    }
    let Ok(kind) = MachineKind::from_str(&kind) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!("unknown machine kind {kind}; expected washer or dryer"),
        );
    };
    if number <= 0 {
        return error_response(StatusCode::BAD_REQUEST, "machine number must be positive");
    }
    if body.duration_minutes <= 0 {
        return error_response(StatusCode::BAD_REQUEST, "duration_minutes must be positive");
    }

    let kind_label = match kind {
        MachineKind::Washer => "Washer",
        MachineKind::Dryer => "Dryer",
    };
    let machine = MachineConfig {
        store_id: id,
        kind,
        number,
        duration_minutes: body.duration_minutes,
        enabled: body.enabled,
        display_name: body
            .display_name
            .unwrap_or_else(|| format!("{kind_label} {number}")),
    };
    match machines::upsert_machine(&state.db, &machine).await {
        Ok(()) => {
            info!(store_id = %machine.store_id, kind = %machine.kind, number, "machine upserted");
            Json(machine).into_response()
        }
        Err(e) => map_error(e),
    }
}

/// GET /admin/v1/stores/{id}/templates
///
/// Effective text for every key, flagging which are store overrides.
pub async fn list_templates(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Response {
    if let Err(resp) = require_store(&state, &id).await {
        return resp;
    }
    let overrides = match templates::list_for_store(&state.db, &id).await {
        Ok(rows) => rows,
        Err(e) => return map_error(e),
    };
    let catalog = match MessageCatalog::load(&state.db, &id).await {
        Ok(catalog) => catalog,
        Err(e) => return map_error(e),
    };

    let listing: Vec<TemplateResponse> = TemplateKey::iter()
        .map(|key| TemplateResponse {
            key: key.to_string(),
            text: catalog.text(key).to_string(),
            overridden: overrides.iter().any(|(k, _)| *k == key.to_string()),
        })
        .collect();
    Json(listing).into_response()
}

/// PUT /admin/v1/stores/{id}/templates/{key}
pub async fn upsert_template(
    State(state): State<GatewayState>,
    Path((id, key)): Path<(String, String)>,
    Json(body): Json<UpsertTemplateRequest>,
) -> Response {
    if let Err(resp) = require_store(&state, &id).await {
        return resp;
    }
    let Ok(parsed) = TemplateKey::from_str(&key) else {
        return error_response(StatusCode::BAD_REQUEST, format!("unknown template key {key}"));
    };
    if body.text.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "template text must be non-empty");
    }
    match templates::upsert_template(&state.db, &id, &parsed.to_string(), &body.text).await {
        Ok(()) => Json(TemplateResponse {
            key: parsed.to_string(),
            text: body.text,
            overridden: true,
        })
        .into_response(),
        Err(e) => map_error(e),
    }
}

/// GET /admin/v1/stores/{id}/reservations
///
/// Pending, unexpired reservations, soonest-finishing first.
pub async fn list_reservations(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Response {
    if let Err(resp) = require_store(&state, &id).await {
        return resp;
    }
    match state.router.ledger().list_pending(&id).await {
        Ok(pending) => Json(pending).into_response(),
        Err(e) => map_error(e),
    }
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub status: String,
    pub reservation: Option<Reservation>,
}

/// POST /admin/v1/stores/{id}/reservations/{rid}/cancel
///
/// Idempotent: cancelling an already-cancelled reservation succeeds.
pub async fn cancel_reservation(
    State(state): State<GatewayState>,
    Path((id, rid)): Path<(String, String)>,
) -> Response {
    if let Err(resp) = require_store(&state, &id).await {
        return resp;
    }
    let ledger = state.router.ledger();
    match ledger.cancel(&id, &rid).await {
        Ok(Cancellation::Done) => {
            let reservation = match ledger.get(&id, &rid).await {
                Ok(reservation) => reservation,
                Err(e) => return map_error(e),
            };
            Json(CancelResponse {
                status: "cancelled".to_string(),
                reservation,
            })
            .into_response()
        }
        Ok(Cancellation::NotFound) => error_response(
            StatusCode::NOT_FOUND,
            format!("no reservation with id {rid}"),
        ),
        Err(e) => map_error(e),
    }
}
