// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sudsbot serve` command implementation.
//!
//! Opens the datastore, wires the LINE reply client into the conversation
//! router, and serves the webhook and admin API until a shutdown signal
//! arrives.

use std::sync::Arc;

use tracing::{info, warn};

use sudsbot_config::SudsbotConfig;
use sudsbot_core::SudsbotError;
use sudsbot_core::traits::NotificationSink;
use sudsbot_gateway::{AuthConfig, GatewayState, ServerConfig};
use sudsbot_line::LineClient;
use sudsbot_router::ConversationRouter;
use sudsbot_storage::Database;

/// Runs the `sudsbot serve` command.
pub async fn run_serve(config: SudsbotConfig) -> Result<(), SudsbotError> {
    init_tracing(&config.service.log_level);

    info!("starting sudsbot serve");

    let Some(channel_secret) = config.line.channel_secret.clone() else {
        return Err(SudsbotError::Config(
            "line.channel_secret is required to serve (set SUDSBOT_LINE_CHANNEL_SECRET)"
                .to_string(),
        ));
    };
    if config.admin.bearer_token.is_none() {
        warn!("admin.bearer_token not set; the admin API will reject all requests");
    }

    let db = Database::open_with(&config.storage.database_path, config.storage.wal_mode).await?;
    info!(path = %config.storage.database_path, "datastore ready");

    let sink: Arc<dyn NotificationSink> = Arc::new(LineClient::new(config.line.reply_url.clone()));
    let router = Arc::new(ConversationRouter::new(db.clone(), sink));

    let state = GatewayState {
        db: db.clone(),
        router,
        channel_secret,
        auth: AuthConfig {
            bearer_token: config.admin.bearer_token.clone(),
        },
    };
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    tokio::select! {
        result = sudsbot_gateway::start_server(&server_config, state) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    db.close().await?;
    info!("sudsbot serve shutdown complete");
    Ok(())
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sudsbot={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
