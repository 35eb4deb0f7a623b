// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reservation row access: cancellation, pending listing, lookups.
//!
//! Admission (the check-then-insert state machine) lives in
//! `sudsbot-ledger`, which runs its whole decision inside one closure on
//! this database's single writer thread. The helpers here cover every other
//! read and write against the reservations table.

use rusqlite::params;
use sudsbot_core::SudsbotError;

use crate::database::Database;
use crate::models::Reservation;

/// Map a reservations row. Shared with the ledger's admission transaction.
pub fn reservation_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reservation> {
    let kind: String = row.get(3)?;
    let status: String = row.get(8)?;
    Ok(Reservation {
        id: row.get(0)?,
        store_id: row.get(1)?,
        user_id: row.get(2)?,
        machine_kind: kind.parse().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?,
        machine_number: row.get(4)?,
        display_name: row.get(5)?,
        duration_minutes: row.get(6)?,
        end_at: row.get(7)?,
        status: status.parse().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
        })?,
        created_at: row.get(9)?,
    })
}

/// Column list matching [`reservation_from_row`].
pub const RESERVATION_COLUMNS: &str = "id, store_id, user_id, machine_kind, machine_number, \
     display_name, duration_minutes, end_at, status, created_at";

/// Cancel a reservation. Idempotent: cancelling an already-cancelled
/// reservation returns `true` as well; only an unknown id yields `false`.
pub async fn cancel(db: &Database, store_id: &str, id: &str) -> Result<bool, SudsbotError> {
    let store_id = store_id.to_string();
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let affected = conn.execute(
                "UPDATE reservations SET status = 'cancelled'
                 WHERE id = ?1 AND store_id = ?2",
                params![id, store_id],
            )?;
            Ok(affected > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List pending, unexpired reservations for a store, soonest-finishing
/// first. Rows whose `end_at` has passed are treated as free and omitted
/// (lazy expiry: natural completion is never written back).
pub async fn list_pending(
    db: &Database,
    store_id: &str,
    now: &str,
) -> Result<Vec<Reservation>, SudsbotError> {
    let store_id = store_id.to_string();
    let now = now.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {RESERVATION_COLUMNS} FROM reservations
                 WHERE store_id = ?1 AND status = 'pending' AND end_at > ?2
                 ORDER BY end_at ASC"
            ))?;
            let rows = stmt.query_map(params![store_id, now], reservation_from_row)?;
            let mut reservations = Vec::new();
            for row in rows {
                reservations.push(row?);
            }
            Ok(reservations)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a reservation by id.
pub async fn get_reservation(
    db: &Database,
    store_id: &str,
    id: &str,
) -> Result<Option<Reservation>, SudsbotError> {
    let store_id = store_id.to_string();
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {RESERVATION_COLUMNS} FROM reservations
                 WHERE id = ?1 AND store_id = ?2"
            ))?;
            match stmt.query_row(params![id, store_id], reservation_from_row) {
                Ok(r) => Ok(Some(r)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Count pending, unexpired reservations for one machine. Used by tests to
/// assert the at-most-one invariant.
pub async fn count_blocking(
    db: &Database,
    store_id: &str,
    kind: &str,
    number: i64,
    now: &str,
) -> Result<i64, SudsbotError> {
    let store_id = store_id.to_string();
    let kind = kind.to_string();
    let now = now.to_string();
    db.connection()
        .call(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM reservations
                 WHERE store_id = ?1 AND machine_kind = ?2 AND machine_number = ?3
                   AND status = 'pending' AND end_at > ?4",
                params![store_id, kind, number, now],
                |row| row.get(0),
            )?;
            Ok(count)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
