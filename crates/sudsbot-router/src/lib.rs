// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation routing for the Sudsbot reservation service.
//!
//! Classifies inbound chat text into intents and orchestrates ledger
//! operations and templated replies per webhook event.

pub mod classifier;
pub mod router;

pub use classifier::{Intent, classify, parse_selection, selection_payload};
pub use router::{ConversationRouter, EventBody, InboundEvent};
