// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! NLU provider trait for pluggable natural-language-understanding backends.

use async_trait::async_trait;

use crate::error::SprocketError;
use crate::types::{NluResult, TurnContext};

/// A pluggable NLU backend turning free text into an intent plus entities.
///
/// Providers may fail for any reason (transport, timeout, malformed payload,
/// missing credentials, unimplemented backend); the router above them is
/// responsible for degrading to the deterministic rule engine. Providers
/// themselves never fall back.
#[async_trait]
pub trait NluProvider: Send + Sync {
    /// Short stable name used in logs and configuration.
    fn name(&self) -> &'static str;

    /// Classifies one user message.
    async fn classify(&self, text: &str, turn: &TurnContext)
    -> Result<NluResult, SprocketError>;
}
