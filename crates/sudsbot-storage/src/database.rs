// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use std::path::Path;

use sudsbot_core::types::TIMESTAMP_FORMAT;
use sudsbot_core::{HealthStatus, SudsbotError};
use tracing::debug;

/// Convert a tokio-rusqlite error into `SudsbotError::Storage`.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> SudsbotError {
    SudsbotError::Storage {
        source: Box::new(e),
    }
}

/// Current UTC instant in the persisted timestamp format.
pub fn now_ts() -> String {
    chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Handle to the SQLite database.
///
/// Wraps a single `tokio_rusqlite::Connection`; all query modules accept
/// `&Database` and go through [`Database::connection`], so every access is
/// serialized on one background thread. This single-writer model is what
/// makes the admission transaction in `sudsbot-ledger` atomic.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path` with WAL mode enabled and
    /// run all pending migrations.
    pub async fn open(path: &str) -> Result<Self, SudsbotError> {
        Self::open_with(path, true).await
    }

    /// Open with an explicit WAL mode choice (from `storage.wal_mode`).
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, SudsbotError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| SudsbotError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| SudsbotError::Storage {
                source: Box::new(e),
            })?;

        let journal = if wal_mode { "WAL" } else { "DELETE" };
        let pragmas = format!(
            "PRAGMA journal_mode={journal};
             PRAGMA synchronous=NORMAL;
             PRAGMA foreign_keys=ON;
             PRAGMA busy_timeout=5000;"
        );
        conn.call(move |conn| {
            conn.execute_batch(&pragmas)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        crate::migrations::run_migrations(&conn).await?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// Returns the underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Lightweight liveness probe used by `sudsbot status`.
    pub async fn health_check(&self) -> Result<HealthStatus, SudsbotError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    /// Checkpoint the WAL and release the connection.
    pub async fn close(self) -> Result<(), SudsbotError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}
