// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Placeholder NLU providers.
//!
//! Defined in the provider set but unimplemented; selecting them always
//! fails over to the rule engine.

use async_trait::async_trait;

use sprocket_core::error::SprocketError;
use sprocket_core::traits::NluProvider;
use sprocket_core::types::{NluResult, TurnContext};

/// Google Cloud NLU backend. Not implemented.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoogleNlu;

#[async_trait]
impl NluProvider for GoogleNlu {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn classify(
        &self,
        _text: &str,
        _turn: &TurnContext,
    ) -> Result<NluResult, SprocketError> {
        Err(SprocketError::nlu("google NLU backend is not implemented"))
    }
}

/// Dialogflow ES backend. Not implemented.
#[derive(Debug, Clone, Copy, Default)]
pub struct DialogflowNlu;

#[async_trait]
impl NluProvider for DialogflowNlu {
    fn name(&self) -> &'static str {
        "dialogflow"
    }

    async fn classify(
        &self,
        _text: &str,
        _turn: &TurnContext,
    ) -> Result<NluResult, SprocketError> {
        Err(SprocketError::nlu("dialogflow NLU backend is not implemented"))
    }
}
