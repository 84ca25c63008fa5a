// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock NLU providers for deterministic testing.
//!
//! `MockNlu` pops scripted outcomes from a FIFO queue; `FailingNlu` always
//! errors, for exercising the fallback path.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use sprocket_core::error::SprocketError;
use sprocket_core::traits::NluProvider;
use sprocket_core::types::{NluResult, TurnContext};

/// One scripted classification outcome.
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    Ok(NluResult),
    Err(String),
}

/// A mock NLU provider returning pre-configured outcomes in order.
///
/// When the queue is empty, a default `unclear` result is returned. An
/// optional per-call delay makes turn overlap reproducible in concurrency
/// tests.
pub struct MockNlu {
    outcomes: Mutex<VecDeque<ScriptedOutcome>>,
    delay: Option<Duration>,
}

impl MockNlu {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            delay: None,
        }
    }

    /// Creates a mock pre-loaded with successful results.
    pub fn with_results(results: Vec<NluResult>) -> Self {
        Self {
            outcomes: Mutex::new(results.into_iter().map(ScriptedOutcome::Ok).collect()),
            delay: None,
        }
    }

    /// Adds an artificial classification delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn push_ok(&self, result: NluResult) {
        self.outcomes.lock().await.push_back(ScriptedOutcome::Ok(result));
    }

    pub async fn push_err(&self, message: impl Into<String>) {
        self.outcomes
            .lock()
            .await
            .push_back(ScriptedOutcome::Err(message.into()));
    }

    fn default_result() -> NluResult {
        NluResult {
            intent: "unclear".into(),
            confidence: 0.5,
            entities: Default::default(),
            message: "mock reply".into(),
        }
    }
}

impl Default for MockNlu {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NluProvider for MockNlu {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn classify(
        &self,
        _text: &str,
        _turn: &TurnContext,
    ) -> Result<NluResult, SprocketError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.outcomes.lock().await.pop_front() {
            Some(ScriptedOutcome::Ok(result)) => Ok(result),
            Some(ScriptedOutcome::Err(message)) => Err(SprocketError::nlu(message)),
            None => Ok(Self::default_result()),
        }
    }
}

/// An NLU provider that always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingNlu;

#[async_trait]
impl NluProvider for FailingNlu {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn classify(
        &self,
        _text: &str,
        _turn: &TurnContext,
    ) -> Result<NluResult, SprocketError> {
        Err(SprocketError::nlu("simulated provider outage"))
    }
}
