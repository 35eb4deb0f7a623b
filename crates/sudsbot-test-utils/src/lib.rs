// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Sudsbot integration tests.
//!
//! Provides a recording notification sink and a temp-database harness for
//! fast, deterministic, CI-runnable tests without external services.

pub mod harness;
pub mod mock_sink;

pub use harness::{TEST_CHANNEL_ID, TEST_CREDENTIAL, TestEnv};
pub use mock_sink::{RecordingSink, SentReply};
