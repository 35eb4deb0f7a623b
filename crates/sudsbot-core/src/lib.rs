// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Sudsbot laundromat reservation service.
//!
//! This crate provides the domain types, error taxonomy, and trait
//! definitions used throughout the Sudsbot workspace. The reservation
//! ledger, conversation router, and transport crates all build on the
//! types defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SudsbotError;
pub use traits::NotificationSink;
pub use types::{
    HealthStatus, MachineConfig, MachineKind, OutboundReply, QuickChoice, Reservation,
    ReservationStatus, Store, TemplateKey,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sudsbot_error_has_all_variants() {
        // Verify all 6 error variants exist and can be constructed.
        let _config = SudsbotError::Config("test".into());
        let _storage = SudsbotError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _channel = SudsbotError::Channel {
            message: "test".into(),
            source: None,
        };
        let _unauthorized = SudsbotError::Unauthorized("test".into());
        let _bad_input = SudsbotError::BadInput("test".into());
        let _internal = SudsbotError::Internal("test".into());
    }

    #[test]
    fn error_display_names_the_category() {
        let err = SudsbotError::Config("missing line.channel_secret".into());
        assert!(err.to_string().starts_with("configuration error"));

        let err = SudsbotError::Unauthorized("signature mismatch".into());
        assert!(err.to_string().starts_with("unauthorized"));
    }

    #[test]
    fn health_status_variants() {
        let healthy = HealthStatus::Healthy;
        let degraded = HealthStatus::Degraded("slow".into());
        let unhealthy = HealthStatus::Unhealthy("down".into());

        assert_eq!(healthy, HealthStatus::Healthy);
        assert_ne!(degraded, healthy);
        assert_ne!(unhealthy, healthy);
    }

    #[test]
    fn notification_sink_is_object_safe() {
        fn _assert_dyn(_: &dyn NotificationSink) {}
    }
}
