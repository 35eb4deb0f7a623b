// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Sudsbot reservation service.
//!
//! Exposes three surfaces: an unauthenticated health endpoint, the
//! signature-verified LINE webhook, and a bearer-protected admin REST API
//! for store, machine, template, and reservation management.

pub mod admin;
pub mod auth;
pub mod handlers;
pub mod server;

pub use auth::AuthConfig;
pub use server::{GatewayState, ServerConfig, app, start_server};
