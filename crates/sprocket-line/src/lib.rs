// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LINE Messaging API channel for the Sprocket assistant.
//!
//! Covers the three platform touchpoints: webhook payload parsing,
//! `x-line-signature` verification, and the outbound reply/push client.

pub mod client;
pub mod notify;
pub mod signature;
pub mod webhook;

pub use client::LineClient;
pub use notify::{notify_order_status, render_template};
pub use signature::{sign, verify_signature};
pub use webhook::{EventMessage, EventSource, WebhookEvent, WebhookPayload};
