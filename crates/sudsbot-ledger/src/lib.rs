// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reservation ledger: atomic admission, cancellation, and pending views.

pub mod ledger;

pub use ledger::{Admission, Cancellation, ReservationLedger};
