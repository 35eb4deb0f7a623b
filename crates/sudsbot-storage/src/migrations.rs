// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded database migrations using refinery.
//!
//! SQL migration files are compiled into the binary at build time via
//! `embed_migrations!`. Migrations run automatically on database open.

use sudsbot_core::SudsbotError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Run all pending migrations on the connection's background thread.
///
/// Refinery tracks applied migrations in its own `refinery_schema_history`
/// table, so re-running on every open is safe.
pub async fn run_migrations(conn: &tokio_rusqlite::Connection) -> Result<(), SudsbotError> {
    conn.call(|conn| embedded::migrations::runner().run(conn).map(|_| ()))
        .await
        .map_err(|e| SudsbotError::Storage {
            source: Box::new(e),
        })
}
