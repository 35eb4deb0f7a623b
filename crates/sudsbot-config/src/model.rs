// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Sudsbot reservation service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Sudsbot configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values; `line.channel_secret` is the one value `serve` cannot run without.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SudsbotConfig {
    /// Service identity and logging settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// HTTP server bind settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// LINE messaging platform settings.
    #[serde(default)]
    pub line: LineConfig,

    /// Admin API settings.
    #[serde(default)]
    pub admin: AdminConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name of the service instance.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "sudsbot".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP server bind configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// LINE messaging platform configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LineConfig {
    /// Per-deployment channel secret used to verify webhook signatures.
    /// `None` makes `serve` refuse to start.
    #[serde(default)]
    pub channel_secret: Option<String>,

    /// Reply API endpoint. Overridable for tests.
    #[serde(default = "default_reply_url")]
    pub reply_url: String,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            channel_secret: None,
            reply_url: default_reply_url(),
        }
    }
}

fn default_reply_url() -> String {
    "https://api.line.me/v2/bot/message/reply".to_string()
}

/// Admin API configuration.
///
/// The admin surface is a static shared secret, but it is enforced
/// server-side: without a configured token the admin routes reject
/// every request.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AdminConfig {
    /// Bearer token for the admin API. `None` disables admin access.
    #[serde(default)]
    pub bearer_token: Option<String>,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL journal mode (recommended).
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|d| d.join("sudsbot/sudsbot.db").display().to_string())
        .unwrap_or_else(|| "sudsbot.db".to_string())
}

fn default_wal_mode() -> bool {
    true
}

impl std::fmt::Display for SudsbotConfig {
    /// Renders the config as TOML with secrets redacted.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut redacted = self.clone();
        if redacted.line.channel_secret.is_some() {
            redacted.line.channel_secret = Some("[redacted]".to_string());
        }
        if redacted.admin.bearer_token.is_some() {
            redacted.admin.bearer_token = Some("[redacted]".to_string());
        }
        match toml::to_string_pretty(&redacted) {
            Ok(s) => write!(f, "{s}"),
            Err(_) => write!(f, "<unrenderable config>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = SudsbotConfig::default();
        assert_eq!(config.service.name, "sudsbot");
        assert_eq!(config.service.log_level, "info");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert!(config.line.channel_secret.is_none());
        assert!(config.line.reply_url.starts_with("https://api.line.me/"));
        assert!(config.admin.bearer_token.is_none());
        assert!(config.storage.wal_mode);
    }

    #[test]
    fn display_redacts_secrets() {
        let mut config = SudsbotConfig::default();
        config.line.channel_secret = Some("super-secret".to_string());
        config.admin.bearer_token = Some("admin123".to_string());

        let rendered = config.to_string();
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("admin123"));
        assert!(rendered.contains("[redacted]"));
    }
}
