// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dialog pipeline for the Sprocket assistant.
//!
//! [`DialogEngine`] drives each inbound turn end to end; [`dispatch`]
//! contains the deterministic intent-to-action mapping; [`replies`] holds
//! every user-visible string.

pub mod dispatch;
pub mod engine;
pub mod replies;

pub use dispatch::{DialogOutcome, dispatch};
pub use engine::DialogEngine;
