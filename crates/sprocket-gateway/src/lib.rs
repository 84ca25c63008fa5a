// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP webhook ingress for the Sprocket assistant.
//!
//! One POST endpoint receives the messaging platform's event batches and
//! fans them out to the dialog engine; a health endpoint serves liveness
//! checks.

pub mod handlers;
pub mod server;

pub use server::{GatewayState, build_router, start_server};
