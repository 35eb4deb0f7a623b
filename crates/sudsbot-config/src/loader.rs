// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./sudsbot.toml` > `~/.config/sudsbot/sudsbot.toml`
//! > `/etc/sudsbot/sudsbot.toml`, with environment variable overrides via the
//! `SUDSBOT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SudsbotConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/sudsbot/sudsbot.toml` (system-wide)
/// 3. `~/.config/sudsbot/sudsbot.toml` (user XDG config)
/// 4. `./sudsbot.toml` (local directory)
/// 5. `SUDSBOT_*` environment variables
pub fn load_config() -> Result<SudsbotConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<SudsbotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SudsbotConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SudsbotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SudsbotConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SudsbotConfig::default()))
        .merge(Toml::file("/etc/sudsbot/sudsbot.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("sudsbot/sudsbot.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("sudsbot.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `SUDSBOT_LINE_CHANNEL_SECRET` must map
/// to `line.channel_secret`, not `line.channel.secret`.
fn env_provider() -> Env {
    Env::prefixed("SUDSBOT_").map(|key| {
        // `key` is the lowercased env var name with the prefix stripped.
        let mapped = key
            .as_str()
            .replacen("service_", "service.", 1)
            .replacen("server_", "server.", 1)
            .replacen("line_", "line.", 1)
            .replacen("admin_", "admin.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.service.name, "sudsbot");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = load_config_from_str(
            r#"
[server]
port = 8080

[line]
channel_secret = "s3cret"
"#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.line.channel_secret.as_deref(), Some("s3cret"));
        // Untouched sections keep defaults.
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let result = load_config_from_str(
            r#"
[line]
channel_secrt = "typo"
"#,
        );
        assert!(result.is_err(), "deny_unknown_fields should reject typos");
    }
}
