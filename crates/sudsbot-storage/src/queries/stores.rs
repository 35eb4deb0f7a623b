// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store registry operations.
//!
//! Stores are created by provisioning and read on every inbound event;
//! the reservation core never mutates them.

use rusqlite::params;
use sudsbot_core::SudsbotError;

use crate::database::Database;
use crate::models::Store;

fn store_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Store> {
    Ok(Store {
        id: row.get(0)?,
        name: row.get(1)?,
        channel_id: row.get(2)?,
        reply_credential: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Create a new store. Fails if the channel id is already registered to
/// another store (UNIQUE constraint).
pub async fn create_store(db: &Database, store: &Store) -> Result<(), SudsbotError> {
    let store = store.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO stores (id, name, channel_id, reply_credential, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    store.id,
                    store.name,
                    store.channel_id,
                    store.reply_credential,
                    store.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Resolve the store owning an inbound channel identifier.
///
/// Exact indexed-equality lookup on the UNIQUE `channel_id` column. Returns
/// `None` when no store is registered for the channel; callers must fail
/// closed and not proceed to any write.
pub async fn resolve_by_channel(
    db: &Database,
    channel_id: &str,
) -> Result<Option<Store>, SudsbotError> {
    let channel_id = channel_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, channel_id, reply_credential, created_at
                 FROM stores WHERE channel_id = ?1",
            )?;
            match stmt.query_row(params![channel_id], store_from_row) {
                Ok(store) => Ok(Some(store)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a store by its identifier.
pub async fn get_store(db: &Database, id: &str) -> Result<Option<Store>, SudsbotError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, channel_id, reply_credential, created_at
                 FROM stores WHERE id = ?1",
            )?;
            match stmt.query_row(params![id], store_from_row) {
                Ok(store) => Ok(Some(store)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List all stores, newest first. Admin surface only.
pub async fn list_stores(db: &Database) -> Result<Vec<Store>, SudsbotError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, channel_id, reply_credential, created_at
                 FROM stores ORDER BY created_at DESC",
            )?;
            let rows = stmt.query_map([], store_from_row)?;
            let mut stores = Vec::new();
            for row in rows {
                stores.push(row?);
            }
            Ok(stores)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
