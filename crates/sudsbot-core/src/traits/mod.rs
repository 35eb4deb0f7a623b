// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions at the seams of the reservation core.

pub mod sink;

pub use sink::NotificationSink;
