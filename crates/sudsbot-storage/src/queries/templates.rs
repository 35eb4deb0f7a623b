// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-store message template overrides.
//!
//! Rows are raw (key, text) pairs; key validation against the fixed
//! template catalog happens at the admin boundary, and unknown keys read
//! back from the database are skipped by `sudsbot-catalog`.

use rusqlite::params;
use sudsbot_core::SudsbotError;

use crate::database::Database;

/// Create or replace one template override for a store.
pub async fn upsert_template(
    db: &Database,
    store_id: &str,
    key: &str,
    text: &str,
) -> Result<(), SudsbotError> {
    let store_id = store_id.to_string();
    let key = key.to_string();
    let text = text.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO templates (store_id, key, text) VALUES (?1, ?2, ?3)
                 ON CONFLICT (store_id, key) DO UPDATE SET text = excluded.text",
                params![store_id, key, text],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List a store's template overrides as (key, text) pairs.
pub async fn list_for_store(
    db: &Database,
    store_id: &str,
) -> Result<Vec<(String, String)>, SudsbotError> {
    let store_id = store_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare("SELECT key, text FROM templates WHERE store_id = ?1 ORDER BY key")?;
            let rows = stmt.query_map(params![store_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;
            let mut templates = Vec::new();
            for row in rows {
                templates.push(row?);
            }
            Ok(templates)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
