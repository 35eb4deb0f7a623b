// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common domain types shared across the Sudsbot workspace.
//!
//! All timestamps are UTC RFC3339 strings with millisecond precision
//! (`%Y-%m-%dT%H:%M:%S%.3fZ`), so lexicographic comparison is chronological.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Timestamp format used for every persisted instant.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// A tenant record: one physical laundromat location.
///
/// Created by provisioning, read on every inbound event, never mutated by
/// the reservation core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    /// Opaque store identifier.
    pub id: String,
    /// Human-readable store name.
    pub name: String,
    /// The messaging platform's identifier for the bot endpoint events are
    /// delivered to. Unique across all stores.
    pub channel_id: String,
    /// Outbound-notification credential (bearer token for the reply API).
    pub reply_credential: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// Machine kind: washer or dryer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MachineKind {
    Washer,
    Dryer,
}

impl MachineKind {
    /// The Thai service word used in quick-reply selection payloads
    /// (`ซัก_เลือก_3` selects washer 3).
    pub fn service_word(&self) -> &'static str {
        match self {
            MachineKind::Washer => "ซัก",
            MachineKind::Dryer => "อบ",
        }
    }

    /// Resolve a service word back to a kind. Single owner of the mapping.
    pub fn from_service_word(word: &str) -> Option<Self> {
        match word {
            "ซัก" => Some(MachineKind::Washer),
            "อบ" => Some(MachineKind::Dryer),
            _ => None,
        }
    }
}

/// One physical machine's configuration.
///
/// `(store_id, kind, number)` is unique. Edited by the admin surface, read
/// by the conversation router and the reservation ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineConfig {
    pub store_id: String,
    pub kind: MachineKind,
    /// Positive machine number, scoped to (store, kind).
    pub number: i64,
    /// Cycle duration in minutes.
    pub duration_minutes: i64,
    /// Disabled machines reject all admissions.
    pub enabled: bool,
    /// Free-text display name used in menus and notifications.
    pub display_name: String,
}

/// Reservation lifecycle status.
///
/// `pending` is the only state that blocks new admissions. Natural expiry is
/// never written back: readers treat `pending` with a past `end_at` as free.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Cancelled,
}

/// One active or historical use of a machine (a.k.a. timer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    pub store_id: String,
    /// Opaque owning user identifier from the messaging platform.
    pub user_id: String,
    pub machine_kind: MachineKind,
    pub machine_number: i64,
    /// Denormalized machine display name for notification rendering.
    pub display_name: String,
    pub duration_minutes: i64,
    /// Computed end instant (`created_at + duration_minutes`).
    pub end_at: String,
    pub status: ReservationStatus,
    pub created_at: String,
}

/// Symbolic names for the fixed catalog of user-facing messages.
///
/// Stores may override any key; missing keys fall back to built-in defaults.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TemplateKey {
    /// First contact / unrecognized text: present the two top-level choices.
    Greeting,
    /// Reservation admitted. Placeholders: `{duration}`, `{display_name}`.
    Confirmation,
    /// Machine already has a pending reservation. Placeholder: `{display_name}`.
    Busy,
    /// Machine is disabled. Placeholder: `{display_name}`.
    Inactive,
    /// Selected machine does not exist.
    NotFound,
    /// Non-text inbound event.
    NonText,
    /// Datastore or unexpected failure: generic apology.
    GenericError,
    /// Washer selection prompt.
    ChooseWasher,
    /// Dryer selection prompt.
    ChooseDryer,
    /// No enabled machines of the requested kind.
    NoMachines,
}

/// One quick-reply button offered to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickChoice {
    /// Button label shown to the user.
    pub label: String,
    /// Text sent back verbatim when the button is tapped.
    pub payload: String,
}

/// A fully rendered outbound reply: text plus optional quick-reply choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundReply {
    pub text: String,
    pub choices: Vec<QuickChoice>,
}

impl OutboundReply {
    /// A plain text reply with no choices.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            choices: Vec::new(),
        }
    }

    /// A reply carrying quick-reply choices.
    pub fn with_choices(text: impl Into<String>, choices: Vec<QuickChoice>) -> Self {
        Self {
            text: text.into(),
            choices,
        }
    }
}

/// Health status reported by component health checks (`sudsbot status`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Degraded(String),
    Unhealthy(String),
}
