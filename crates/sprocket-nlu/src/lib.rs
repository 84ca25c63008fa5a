// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! NLU layer for the Sprocket assistant.
//!
//! Turns free text into an intent plus entities through one of several
//! pluggable backends, with a deterministic rule engine as both a
//! first-class provider and the universal fallback. The [`NluRouter`] is
//! the only entry point the dialog pipeline uses; it never fails.

pub mod cache;
pub mod local;
pub mod parse;
pub mod placeholder;
pub mod remote;
pub mod router;
pub mod rules;

pub use cache::ClassificationCache;
pub use local::LocalLlm;
pub use placeholder::{DialogflowNlu, GoogleNlu};
pub use remote::RemoteChat;
pub use router::NluRouter;
pub use rules::RuleEngine;
