// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers: the LINE webhook and the health endpoint.
//!
//! The webhook accepts a batch of events, fans them out concurrently, and
//! acknowledges with 200 once every event has been attempted. A failure in
//! one event's processing is caught and logged; it never affects the other
//! events or the acknowledgement.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, error, warn};

use sprocket_line::webhook::{WebhookEvent, WebhookPayload};
use sprocket_line::signature::verify_signature;

use crate::server::GatewayState;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// POST /webhook/line
///
/// Verifies the `x-line-signature` (when a channel secret is configured),
/// parses the event batch, and processes every event independently.
pub async fn post_line_webhook(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(secret) = state.channel_secret.as_deref() {
        let signature = headers
            .get("x-line-signature")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !verify_signature(secret, &body, signature) {
            warn!("webhook rejected: invalid signature");
            return (StatusCode::UNAUTHORIZED, "invalid signature").into_response();
        }
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "webhook rejected: malformed payload");
            return (StatusCode::BAD_REQUEST, "invalid payload").into_response();
        }
    };

    // Fan out: events are independent; per-account ordering is the dialog
    // engine's job, not the ingress's.
    let tasks = payload
        .events
        .into_iter()
        .map(|event| handle_event(&state, event));
    join_all(tasks).await;

    (StatusCode::OK, "OK").into_response()
}

/// Processes one event, catching and logging any failure.
async fn handle_event(state: &GatewayState, mut event: WebhookEvent) {
    if !event.is_text_message() {
        // Accepted and ignored: stickers, images, follows, and so on.
        debug!(event_type = event.event_type.as_str(), "ignoring non-text event");
        return;
    }

    let Some(account_id) = event.account_id().map(str::to_string) else {
        warn!("text event without a source account id");
        return;
    };
    let Some(text) = event.text().map(str::to_string) else {
        return;
    };
    let reply_token = event.take_reply_token();

    if let Err(e) = state
        .engine
        .handle_text_turn(&account_id, &text, reply_token)
        .await
    {
        error!(account_id = account_id.as_str(), error = %e, "event processing failed");
    }
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}
