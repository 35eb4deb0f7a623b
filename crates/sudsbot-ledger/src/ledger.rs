// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The reservation admission state machine.
//!
//! A reservation moves `pending -> cancelled` (explicit) or silently ages
//! out when wall-clock time passes its `end_at` (no terminal write; readers
//! treat an expired pending row as free). `pending` with a future `end_at`
//! is the only state that blocks new admissions.
//!
//! The check-then-insert in [`ReservationLedger::try_reserve`] runs inside
//! one transaction on the storage layer's single writer thread, so two
//! near-simultaneous selections of the same idle machine cannot both be
//! admitted. This closes the double-booking race the naive read-then-write
//! sequence would have.

use rusqlite::params;
use tracing::{debug, info};

use sudsbot_core::types::TIMESTAMP_FORMAT;
use sudsbot_core::{MachineKind, Reservation, ReservationStatus, SudsbotError};
use sudsbot_storage::Database;
use sudsbot_storage::database::map_tr_err;
use sudsbot_storage::queries::machines::machine_from_row;
use sudsbot_storage::queries::reservations;

/// Outcome of an admission attempt.
///
/// These are expected results, not errors; callers resolve each into a
/// templated user reply. Datastore failures surface separately as
/// `SudsbotError::Storage` and must never be conflated with `Busy`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Reservation created; carries duration and display name for
    /// notification rendering.
    Admitted(Reservation),
    /// The machine already has a pending, unexpired reservation.
    Busy { display_name: String },
    /// The machine is configured but disabled.
    Inactive { display_name: String },
    /// No machine configured under (store, kind, number).
    NotFound,
}

/// Outcome of a cancellation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cancellation {
    /// The reservation is cancelled. Also returned for a double-cancel:
    /// the operation is idempotent.
    Done,
    /// No reservation exists under the id for this store.
    NotFound,
}

/// Creates, queries, and cancels timed reservations, enforcing the
/// one-active-reservation-per-machine invariant.
#[derive(Clone)]
pub struct ReservationLedger {
    db: Database,
}

impl ReservationLedger {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Attempt to reserve a machine for a user.
    ///
    /// Algorithm, in order, all inside one transaction on the single
    /// writer thread:
    /// 1. Look up the machine config; absent -> `NotFound`.
    /// 2. Disabled -> `Inactive` (regardless of pending state).
    /// 3. Any pending reservation with a future `end_at` -> `Busy`.
    /// 4. Insert a new `pending` reservation ending `duration_minutes`
    ///    from now and return it.
    pub async fn try_reserve(
        &self,
        store_id: &str,
        kind: MachineKind,
        number: i64,
        user_id: &str,
    ) -> Result<Admission, SudsbotError> {
        let store_id = store_id.to_string();
        let user_id = user_id.to_string();
        let kind_str = kind.to_string();
        let id = uuid::Uuid::new_v4().to_string();
        let now = chrono::Utc::now();
        let now_str = now.format(TIMESTAMP_FORMAT).to_string();

        let admission = self
            .db
            .connection()
            .call(move |conn| {
                let tx = conn.transaction()?;

                let machine = {
                    let mut stmt = tx.prepare(
                        "SELECT store_id, kind, number, duration_minutes, enabled, display_name
                         FROM machines WHERE store_id = ?1 AND kind = ?2 AND number = ?3",
                    )?;
                    match stmt.query_row(params![store_id, kind_str, number], machine_from_row) {
                        Ok(m) => Some(m),
                        Err(rusqlite::Error::QueryReturnedNoRows) => None,
                        Err(e) => return Err(e),
                    }
                };

                let Some(machine) = machine else {
                    tx.commit()?;
                    return Ok(Admission::NotFound);
                };
                if !machine.enabled {
                    tx.commit()?;
                    return Ok(Admission::Inactive {
                        display_name: machine.display_name,
                    });
                }

                // Lazy expiry: a pending row whose end_at has passed no
                // longer blocks.
                let blocking: i64 = tx.query_row(
                    "SELECT COUNT(*) FROM reservations
                     WHERE store_id = ?1 AND machine_kind = ?2 AND machine_number = ?3
                       AND status = 'pending' AND end_at > ?4",
                    params![store_id, kind_str, number, now_str],
                    |row| row.get(0),
                )?;
                if blocking > 0 {
                    tx.commit()?;
                    return Ok(Admission::Busy {
                        display_name: machine.display_name,
                    });
                }

                let end_at = (now + chrono::Duration::minutes(machine.duration_minutes))
                    .format(TIMESTAMP_FORMAT)
                    .to_string();
                let reservation = Reservation {
                    id: id.clone(),
                    store_id: store_id.clone(),
                    user_id: user_id.clone(),
                    machine_kind: machine.kind,
                    machine_number: machine.number,
                    display_name: machine.display_name.clone(),
                    duration_minutes: machine.duration_minutes,
                    end_at,
                    status: ReservationStatus::Pending,
                    created_at: now_str.clone(),
                };
                tx.execute(
                    "INSERT INTO reservations (id, store_id, user_id, machine_kind,
                         machine_number, display_name, duration_minutes, end_at, status, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                    params![
                        reservation.id,
                        reservation.store_id,
                        reservation.user_id,
                        kind_str,
                        reservation.machine_number,
                        reservation.display_name,
                        reservation.duration_minutes,
                        reservation.end_at,
                        reservation.status.to_string(),
                        reservation.created_at,
                    ],
                )?;
                tx.commit()?;
                Ok(Admission::Admitted(reservation))
            })
            .await
            .map_err(map_tr_err)?;

        match &admission {
            Admission::Admitted(r) => info!(
                store_id = %r.store_id,
                kind = %r.machine_kind,
                number = r.machine_number,
                end_at = %r.end_at,
                "reservation admitted"
            ),
            other => debug!(kind = %kind, number, outcome = ?other, "admission rejected"),
        }
        Ok(admission)
    }

    /// Cancel a reservation by id, idempotently.
    pub async fn cancel(&self, store_id: &str, id: &str) -> Result<Cancellation, SudsbotError> {
        if reservations::cancel(&self.db, store_id, id).await? {
            info!(store_id, id, "reservation cancelled");
            Ok(Cancellation::Done)
        } else {
            Ok(Cancellation::NotFound)
        }
    }

    /// Pending, unexpired reservations for a store, soonest-finishing first.
    pub async fn list_pending(&self, store_id: &str) -> Result<Vec<Reservation>, SudsbotError> {
        reservations::list_pending(&self.db, store_id, &sudsbot_storage::now_ts()).await
    }

    /// Look up one reservation.
    pub async fn get(
        &self,
        store_id: &str,
        id: &str,
    ) -> Result<Option<Reservation>, SudsbotError> {
        reservations::get_reservation(&self.db, store_id, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sudsbot_core::{MachineConfig, Store};
    use sudsbot_storage::now_ts;
    use sudsbot_storage::queries::{machines, reservations, stores};
    use tempfile::tempdir;

    async fn setup() -> (ReservationLedger, Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("ledger.db").to_str().unwrap())
            .await
            .unwrap();
        stores::create_store(
            &db,
            &Store {
                id: "s1".into(),
                name: "test".into(),
                channel_id: "chan-1".into(),
                reply_credential: "tok".into(),
                created_at: now_ts(),
            },
        )
        .await
        .unwrap();
        machines::upsert_machine(
            &db,
            &MachineConfig {
                store_id: "s1".into(),
                kind: MachineKind::Washer,
                number: 1,
                duration_minutes: 30,
                enabled: true,
                display_name: "Washer 1".into(),
            },
        )
        .await
        .unwrap();
        (ReservationLedger::new(db.clone()), db, dir)
    }

    fn admitted(admission: Admission) -> Reservation {
        match admission {
            Admission::Admitted(r) => r,
            other => panic!("expected Admitted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn admits_idle_machine_and_computes_end() {
        let (ledger, db, _dir) = setup().await;
        let before = chrono::Utc::now();
        let r = admitted(
            ledger
                .try_reserve("s1", MachineKind::Washer, 1, "u1")
                .await
                .unwrap(),
        );
        assert_eq!(r.status, ReservationStatus::Pending);
        assert_eq!(r.duration_minutes, 30);
        assert_eq!(r.display_name, "Washer 1");

        let end = chrono::DateTime::parse_from_rfc3339(&r.end_at).unwrap();
        let expected = before + chrono::Duration::minutes(30);
        let skew = (end.with_timezone(&chrono::Utc) - expected)
            .num_seconds()
            .abs();
        assert!(skew <= 5, "end_at should be ~now+30min, skew {skew}s");

        let count = reservations::count_blocking(&db, "s1", "washer", 1, &now_ts())
            .await
            .unwrap();
        assert_eq!(count, 1);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn second_admission_is_busy() {
        let (ledger, db, _dir) = setup().await;
        admitted(
            ledger
                .try_reserve("s1", MachineKind::Washer, 1, "u1")
                .await
                .unwrap(),
        );
        let second = ledger
            .try_reserve("s1", MachineKind::Washer, 1, "u2")
            .await
            .unwrap();
        assert_eq!(
            second,
            Admission::Busy {
                display_name: "Washer 1".into()
            }
        );

        // Invariant: never more than one blocking row per machine.
        let count = reservations::count_blocking(&db, "s1", "washer", 1, &now_ts())
            .await
            .unwrap();
        assert_eq!(count, 1);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn disabled_machine_is_inactive_regardless_of_pending_state() {
        let (ledger, db, _dir) = setup().await;
        machines::upsert_machine(
            &db,
            &MachineConfig {
                store_id: "s1".into(),
                kind: MachineKind::Washer,
                number: 1,
                duration_minutes: 30,
                enabled: false,
                display_name: "Washer 1".into(),
            },
        )
        .await
        .unwrap();

        let outcome = ledger
            .try_reserve("s1", MachineKind::Washer, 1, "u3")
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Admission::Inactive {
                display_name: "Washer 1".into()
            }
        );
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn unknown_machine_is_not_found() {
        let (ledger, db, _dir) = setup().await;
        let outcome = ledger
            .try_reserve("s1", MachineKind::Dryer, 7, "u1")
            .await
            .unwrap();
        assert_eq!(outcome, Admission::NotFound);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn cancel_frees_the_machine_and_is_idempotent() {
        let (ledger, db, _dir) = setup().await;
        let r = admitted(
            ledger
                .try_reserve("s1", MachineKind::Washer, 1, "u1")
                .await
                .unwrap(),
        );

        assert_eq!(ledger.cancel("s1", &r.id).await.unwrap(), Cancellation::Done);
        // Double-cancel reports Done, not an error.
        assert_eq!(ledger.cancel("s1", &r.id).await.unwrap(), Cancellation::Done);
        assert_eq!(
            ledger.cancel("s1", "no-such-id").await.unwrap(),
            Cancellation::NotFound
        );

        // The machine is free again.
        let again = ledger
            .try_reserve("s1", MachineKind::Washer, 1, "u4")
            .await
            .unwrap();
        assert!(matches!(again, Admission::Admitted(_)));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn expired_pending_reservation_does_not_block() {
        let (ledger, db, _dir) = setup().await;
        let r = admitted(
            ledger
                .try_reserve("s1", MachineKind::Washer, 1, "u1")
                .await
                .unwrap(),
        );

        // Age the reservation past its end without any status write.
        let id = r.id.clone();
        db.connection()
            .call(move |conn| {
                conn.execute(
                    "UPDATE reservations SET end_at = '2000-01-01T00:00:00.000Z' WHERE id = ?1",
                    params![id],
                )?;
                Ok::<_, rusqlite::Error>(())
            })
            .await
            .unwrap();

        let again = ledger
            .try_reserve("s1", MachineKind::Washer, 1, "u2")
            .await
            .unwrap();
        assert!(
            matches!(again, Admission::Admitted(_)),
            "stale pending row must be treated as free"
        );

        // And the stale row is not listed as pending.
        let pending = ledger.list_pending("s1").await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_ne!(pending[0].id, r.id);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_pending_orders_by_end_ascending() {
        let (ledger, db, _dir) = setup().await;
        machines::upsert_machine(
            &db,
            &MachineConfig {
                store_id: "s1".into(),
                kind: MachineKind::Dryer,
                number: 1,
                duration_minutes: 10,
                enabled: true,
                display_name: "Dryer 1".into(),
            },
        )
        .await
        .unwrap();

        // Washer runs 30 min, dryer 10 min: dryer finishes first.
        admitted(
            ledger
                .try_reserve("s1", MachineKind::Washer, 1, "u1")
                .await
                .unwrap(),
        );
        admitted(
            ledger
                .try_reserve("s1", MachineKind::Dryer, 1, "u2")
                .await
                .unwrap(),
        );

        let pending = ledger.list_pending("s1").await.unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].machine_kind, MachineKind::Dryer);
        assert_eq!(pending[1].machine_kind, MachineKind::Washer);
        db.close().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_admissions_admit_exactly_one() {
        let (ledger, db, _dir) = setup().await;

        let attempts = (0..10).map(|i| {
            let ledger = ledger.clone();
            tokio::spawn(async move {
                ledger
                    .try_reserve("s1", MachineKind::Washer, 1, &format!("u{i}"))
                    .await
                    .unwrap()
            })
        });
        let outcomes = futures::future::join_all(attempts).await;

        let admitted_count = outcomes
            .iter()
            .filter(|o| matches!(o.as_ref().unwrap(), Admission::Admitted(_)))
            .count();
        assert_eq!(admitted_count, 1, "exactly one concurrent admission wins");

        let count = reservations::count_blocking(&db, "s1", "washer", 1, &now_ts())
            .await
            .unwrap();
        assert_eq!(count, 1);
        db.close().await.unwrap();
    }
}
