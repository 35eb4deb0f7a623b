// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Temp-database test environment.
//!
//! `TestEnv` opens a fresh migrated SQLite database in a temp directory and
//! seeds one store, with helpers for adding machines and template
//! overrides. The temp directory lives as long as the env value.

use tempfile::TempDir;

use sudsbot_core::{MachineConfig, MachineKind, Store, SudsbotError};
use sudsbot_storage::queries::{machines, stores, templates};
use sudsbot_storage::{Database, now_ts};

/// Channel id the seeded store listens on.
pub const TEST_CHANNEL_ID: &str = "test-channel";
/// Reply credential of the seeded store.
pub const TEST_CREDENTIAL: &str = "test-reply-token";

pub struct TestEnv {
    pub db: Database,
    pub store: Store,
    _dir: TempDir,
}

impl TestEnv {
    /// Open a fresh database and seed one store.
    pub async fn new() -> Result<Self, SudsbotError> {
        let dir = TempDir::new().map_err(|e| SudsbotError::Storage {
            source: Box::new(e),
        })?;
        let path = dir.path().join("sudsbot-test.db");
        let db = Database::open(path.to_string_lossy().as_ref()).await?;

        let store = Store {
            id: "store-test".to_string(),
            name: "Test Laundromat".to_string(),
            channel_id: TEST_CHANNEL_ID.to_string(),
            reply_credential: TEST_CREDENTIAL.to_string(),
            created_at: now_ts(),
        };
        stores::create_store(&db, &store).await?;

        Ok(Self {
            db,
            store,
            _dir: dir,
        })
    }

    /// Add or replace a machine on the seeded store.
    pub async fn seed_machine(
        &self,
        kind: MachineKind,
        number: i64,
        duration_minutes: i64,
        enabled: bool,
    ) -> Result<MachineConfig, SudsbotError> {
        let kind_label = match kind {
            MachineKind::Washer => "Washer",
            MachineKind::Dryer => "Dryer",
        };
        let machine = MachineConfig {
            store_id: self.store.id.clone(),
            kind,
            number,
            duration_minutes,
            enabled,
            display_name: format!("{kind_label} {number}"),
        };
        machines::upsert_machine(&self.db, &machine).await?;
        Ok(machine)
    }

    /// Override a template text on the seeded store.
    pub async fn seed_template(&self, key: &str, text: &str) -> Result<(), SudsbotError> {
        templates::upsert_template(&self.db, &self.store.id, key, text).await
    }
}
