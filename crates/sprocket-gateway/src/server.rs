// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the ingress.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::info;

use sprocket_agent::DialogEngine;
use sprocket_core::SprocketError;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The dialog engine driving each inbound turn.
    pub engine: Arc<DialogEngine>,
    /// Channel secret for webhook signature verification. `None` disables
    /// verification (local development only).
    pub channel_secret: Option<String>,
    /// Process start time for uptime reporting.
    pub start_time: Instant,
}

impl GatewayState {
    pub fn new(engine: Arc<DialogEngine>, channel_secret: Option<String>) -> Self {
        Self {
            engine,
            channel_secret,
            start_time: Instant::now(),
        }
    }
}

/// Builds the ingress router.
///
/// Routes:
/// - POST /webhook/line (signature-verified when a secret is configured)
/// - GET /health (unauthenticated)
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/webhook/line", post(handlers::post_line_webhook))
        .route("/health", get(handlers::get_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds and serves the ingress until the process is stopped.
pub async fn start_server(
    host: &str,
    port: u16,
    state: GatewayState,
) -> Result<(), SprocketError> {
    let app = build_router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SprocketError::Channel {
            message: format!("failed to bind ingress to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    info!("webhook ingress listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| SprocketError::Channel {
            message: format!("ingress server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
