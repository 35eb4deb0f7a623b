// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Machine catalog operations.
//!
//! Machines are edited by the admin surface and read by the conversation
//! router (to build choice menus) and the reservation ledger (admission).

use rusqlite::params;
use sudsbot_core::SudsbotError;

use crate::database::Database;
use crate::models::{MachineConfig, MachineKind};

/// Map a machines row. Shared with the ledger's admission transaction.
pub fn machine_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MachineConfig> {
    let kind: String = row.get(1)?;
    Ok(MachineConfig {
        store_id: row.get(0)?,
        kind: kind.parse().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?,
        number: row.get(2)?,
        duration_minutes: row.get(3)?,
        enabled: row.get(4)?,
        display_name: row.get(5)?,
    })
}

const MACHINE_COLUMNS: &str =
    "store_id, kind, number, duration_minutes, enabled, display_name";

/// Create or update a machine configuration.
///
/// Upsert on the (store, kind, number) primary key so the admin surface has
/// one write path for both provisioning and edits. There is no delete
/// operation; machines are disabled instead.
pub async fn upsert_machine(db: &Database, machine: &MachineConfig) -> Result<(), SudsbotError> {
    let m = machine.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO machines (store_id, kind, number, duration_minutes, enabled, display_name)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT (store_id, kind, number) DO UPDATE SET
                     duration_minutes = excluded.duration_minutes,
                     enabled = excluded.enabled,
                     display_name = excluded.display_name",
                params![
                    m.store_id,
                    m.kind.to_string(),
                    m.number,
                    m.duration_minutes,
                    m.enabled,
                    m.display_name,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List enabled machines of a kind, ordered by machine number ascending.
///
/// This ordering is what the user's quick-reply menu is built from.
pub async fn list_active(
    db: &Database,
    store_id: &str,
    kind: MachineKind,
) -> Result<Vec<MachineConfig>, SudsbotError> {
    let store_id = store_id.to_string();
    let kind = kind.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MACHINE_COLUMNS} FROM machines
                 WHERE store_id = ?1 AND kind = ?2 AND enabled = 1
                 ORDER BY number ASC"
            ))?;
            let rows = stmt.query_map(params![store_id, kind], machine_from_row)?;
            let mut machines = Vec::new();
            for row in rows {
                machines.push(row?);
            }
            Ok(machines)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List every machine of a store (enabled or not), washers before dryers,
/// then by number. Admin surface only.
pub async fn list_all(db: &Database, store_id: &str) -> Result<Vec<MachineConfig>, SudsbotError> {
    let store_id = store_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MACHINE_COLUMNS} FROM machines
                 WHERE store_id = ?1
                 ORDER BY kind DESC, number ASC"
            ))?;
            let rows = stmt.query_map(params![store_id], machine_from_row)?;
            let mut machines = Vec::new();
            for row in rows {
                machines.push(row?);
            }
            Ok(machines)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Exact machine lookup, used after the user selects a specific machine.
pub async fn find_machine(
    db: &Database,
    store_id: &str,
    kind: MachineKind,
    number: i64,
) -> Result<Option<MachineConfig>, SudsbotError> {
    let store_id = store_id.to_string();
    let kind = kind.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MACHINE_COLUMNS} FROM machines
                 WHERE store_id = ?1 AND kind = ?2 AND number = ?3"
            ))?;
            match stmt.query_row(params![store_id, kind, number], machine_from_row) {
                Ok(machine) => Ok(Some(machine)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}
