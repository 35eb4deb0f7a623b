// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses and non-empty secrets.

use crate::diagnostic::ConfigError;
use crate::model::SudsbotConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects all validation errors rather than failing fast.
pub fn validate_config(config: &SudsbotConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    // An empty secret would make every webhook verification fail in a way
    // that looks like forged traffic; reject it up front.
    if let Some(secret) = &config.line.channel_secret
        && secret.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "line.channel_secret must not be empty when set".to_string(),
        });
    }

    if !config.line.reply_url.starts_with("http://") && !config.line.reply_url.starts_with("https://")
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "line.reply_url must be an http(s) URL, got `{}`",
                config.line.reply_url
            ),
        });
    }

    if let Some(token) = &config.admin.bearer_token
        && token.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "admin.bearer_token must not be empty when set".to_string(),
        });
    }

    let level = config.service.log_level.as_str();
    if !["trace", "debug", "info", "warn", "error"].contains(&level) {
        errors.push(ConfigError::Validation {
            message: format!(
                "service.log_level must be one of trace/debug/info/warn/error, got `{level}`"
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
