// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-store message catalog: built-in defaults overlaid with store rows.
//!
//! The catalog is loaded once per inbound webhook batch and dropped with
//! it. It is deliberately NOT a process-wide cache: admin template edits
//! must take effect on the next message without a restart, and a long-lived
//! map shared across tenants risks serving one store's text to another.

use std::collections::HashMap;

use strum::IntoEnumIterator;
use tracing::warn;

use sudsbot_core::{SudsbotError, TemplateKey};
use sudsbot_storage::Database;
use sudsbot_storage::queries::templates;

use crate::defaults::default_text;

/// Pure `{name}` placeholder substitution.
///
/// Unresolved placeholders are left verbatim; this is a display-layer
/// nicety, not a contract, so no error is raised for extra or missing
/// pairs.
pub fn render(template: &str, placeholders: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in placeholders {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}

/// A fully resolved template set for one store.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    texts: HashMap<TemplateKey, String>,
}

impl MessageCatalog {
    /// The built-in default set, with no store overrides applied.
    pub fn builtin() -> Self {
        let texts = TemplateKey::iter()
            .map(|key| (key, default_text(key).to_string()))
            .collect();
        Self { texts }
    }

    /// Load the catalog for a store: defaults overlaid with the store's
    /// override rows (store rows win on key collision).
    ///
    /// Rows with keys outside the fixed catalog are skipped with a warning
    /// rather than failing the whole event.
    pub async fn load(db: &Database, store_id: &str) -> Result<Self, SudsbotError> {
        let mut catalog = Self::builtin();
        for (key, text) in templates::list_for_store(db, store_id).await? {
            match key.parse::<TemplateKey>() {
                Ok(parsed) => {
                    catalog.texts.insert(parsed, text);
                }
                Err(_) => {
                    warn!(store_id, key, "skipping unknown template key");
                }
            }
        }
        Ok(catalog)
    }

    /// The resolved text for a key.
    pub fn text(&self, key: TemplateKey) -> &str {
        // Every key is seeded by builtin(), so the lookup cannot miss.
        self.texts
            .get(&key)
            .map(String::as_str)
            .unwrap_or_else(|| default_text(key))
    }

    /// Render a key's text with placeholder substitution.
    pub fn render(&self, key: TemplateKey, placeholders: &[(&str, &str)]) -> String {
        render(self.text(key), placeholders)
    }
}
