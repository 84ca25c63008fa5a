// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sprocket serve` command implementation.
//!
//! Wires the configured adapters together — SQLite storage, the selected
//! NLU provider behind the router, the LINE channel client — and runs the
//! webhook ingress until a shutdown signal arrives.

use std::sync::Arc;

use tracing::{info, warn};

use sprocket_agent::DialogEngine;
use sprocket_config::SprocketConfig;
use sprocket_core::error::SprocketError;
use sprocket_gateway::{GatewayState, start_server};
use sprocket_line::LineClient;
use sprocket_nlu::NluRouter;
use sprocket_storage::{Database, SqliteCatalog, SqliteConversationStore};

/// Runs the `sprocket serve` command.
pub async fn run_serve(config: SprocketConfig) -> Result<(), SprocketError> {
    init_tracing(&config.service.log_level);

    info!(service = config.service.name.as_str(), "starting sprocket serve");

    // Storage: conversation store and read-only catalog share one database.
    let db = Database::open(&config.storage.database_path).await?;
    let store = Arc::new(SqliteConversationStore::new(db.clone()));
    let catalog = Arc::new(SqliteCatalog::new(db));

    // NLU: provider selected once from configuration; failures degrade to
    // the rule engine inside the router.
    let nlu = Arc::new(NluRouter::from_config(&config.nlu)?);
    info!(provider = nlu.provider_name(), "nlu provider selected");

    // Outbound channel.
    let Some(token) = config.line.channel_access_token.as_deref() else {
        eprintln!(
            "error: LINE channel access token required. Set line.channel_access_token \
             in sprocket.toml or SPROCKET_LINE_CHANNEL_ACCESS_TOKEN."
        );
        return Err(SprocketError::Config(
            "line.channel_access_token is not set".into(),
        ));
    };
    let channel = Arc::new(LineClient::new(token)?);

    if config.line.channel_secret.is_none() {
        warn!("line.channel_secret is not set; webhook signature verification is DISABLED");
    }

    let engine = Arc::new(DialogEngine::new(
        store,
        catalog.clone(),
        catalog.clone(),
        catalog,
        nlu,
        channel,
        config.dialog.history_limit,
    ));

    let state = GatewayState::new(engine, config.line.channel_secret.clone());

    tokio::select! {
        result = start_server(&config.server.host, config.server.port, state) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
            Ok(())
        }
    }
}

/// Initializes the tracing subscriber from the configured log level.
///
/// `RUST_LOG` overrides the config value when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
