// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-writer documentation and enforcement.
//!
//! All writes in sudsbot-storage are serialized through `tokio-rusqlite`'s
//! single background thread. The `Database` struct IS the single writer.
//! Query modules accept `&Database` and call through `conn.call()`.
//!
//! **Do NOT create additional Connection instances for writes.**

// How the single writer is enforced:
// - `Database` wraps a single `tokio_rusqlite::Connection`
// - every query function accepts `&Database` and goes through
//   `database.connection().call()`
// - tokio-rusqlite runs all closures on one background thread, in order
// - the admission check-then-insert in `sudsbot-ledger` relies on this:
//   the whole decision runs inside one closure, so two concurrent
//   admissions for the same machine cannot interleave
