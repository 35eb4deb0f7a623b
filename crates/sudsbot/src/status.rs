// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sudsbot status` command implementation.
//!
//! Opens the configured datastore read path and reports per-store machine
//! and pending-reservation counts. Works whether or not the server is
//! running; WAL mode allows a concurrent reader.

use serde::Serialize;

use sudsbot_config::SudsbotConfig;
use sudsbot_core::{HealthStatus, SudsbotError};
use sudsbot_ledger::ReservationLedger;
use sudsbot_storage::Database;
use sudsbot_storage::queries::{machines, stores};

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub healthy: bool,
    pub database_path: String,
    pub stores: Vec<StoreStatus>,
}

#[derive(Debug, Serialize)]
pub struct StoreStatus {
    pub id: String,
    pub name: String,
    pub machines: usize,
    pub pending_reservations: usize,
}

/// Run the `sudsbot status` command.
pub async fn run_status(config: &SudsbotConfig, json: bool) -> Result<(), SudsbotError> {
    let db = Database::open_with(&config.storage.database_path, config.storage.wal_mode).await?;
    let healthy = matches!(db.health_check().await?, HealthStatus::Healthy);
    let ledger = ReservationLedger::new(db.clone());

    let mut report = StatusReport {
        healthy,
        database_path: config.storage.database_path.clone(),
        stores: Vec::new(),
    };
    for store in stores::list_stores(&db).await? {
        let machine_count = machines::list_all(&db, &store.id).await?.len();
        let pending = ledger.list_pending(&store.id).await?.len();
        report.stores.push(StoreStatus {
            id: store.id,
            name: store.name,
            machines: machine_count,
            pending_reservations: pending,
        });
    }
    db.close().await?;

    if json {
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|e| SudsbotError::Internal(format!("failed to render status: {e}")))?;
        println!("{rendered}");
        return Ok(());
    }

    println!(
        "datastore: {} ({})",
        report.database_path,
        if report.healthy { "healthy" } else { "unhealthy" }
    );
    if report.stores.is_empty() {
        println!("no stores provisioned");
    }
    for store in &report.stores {
        println!(
            "  {} ({}): {} machines, {} pending reservations",
            store.name, store.id, store.machines, store.pending_reservations
        );
    }
    Ok(())
}
