// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! NLU routing with deterministic degrade.
//!
//! Exactly one provider is active, chosen once at startup from
//! configuration. `resolve` never fails: any provider error — transport,
//! timeout, malformed payload, missing credentials, unimplemented backend —
//! degrades synchronously to the rule engine.

use std::sync::Arc;

use tracing::{debug, warn};

use sprocket_config::model::{NluConfig, NluProviderKind};
use sprocket_core::error::SprocketError;
use sprocket_core::traits::NluProvider;
use sprocket_core::types::{NluResult, TurnContext};

use crate::local::LocalLlm;
use crate::placeholder::{DialogflowNlu, GoogleNlu};
use crate::remote::RemoteChat;
use crate::rules::RuleEngine;

/// Routes classification requests to the active provider, falling back to
/// the rule engine on any failure.
pub struct NluRouter {
    provider: Arc<dyn NluProvider>,
    rules: RuleEngine,
}

impl NluRouter {
    /// Creates a router around an already-constructed provider.
    pub fn new(provider: Arc<dyn NluProvider>) -> Self {
        Self {
            provider,
            rules: RuleEngine::new(),
        }
    }

    /// Builds the configured provider and wraps it in a router.
    pub fn from_config(config: &NluConfig) -> Result<Self, SprocketError> {
        let provider: Arc<dyn NluProvider> = match config.provider {
            NluProviderKind::Remote => Arc::new(RemoteChat::new(&config.remote)?),
            NluProviderKind::Local => Arc::new(LocalLlm::new(&config.local)?),
            NluProviderKind::Rules => Arc::new(RuleEngine::new()),
            NluProviderKind::Google => Arc::new(GoogleNlu),
            NluProviderKind::Dialogflow => Arc::new(DialogflowNlu),
        };
        Ok(Self::new(provider))
    }

    /// Name of the active provider (for logs and diagnostics).
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Classifies one message. Never fails.
    pub async fn resolve(&self, text: &str, turn: &TurnContext) -> NluResult {
        match self.provider.classify(text, turn).await {
            Ok(result) => {
                debug!(
                    provider = self.provider.name(),
                    intent = result.intent.as_str(),
                    confidence = result.confidence,
                    "nlu classification"
                );
                result
            }
            Err(e) => {
                warn!(
                    provider = self.provider.name(),
                    error = %e,
                    "nlu provider failed, falling back to rule engine"
                );
                self.rules.understand(text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sprocket_core::types::DialogState;

    /// A provider that always fails, for fallback testing.
    struct BrokenProvider;

    #[async_trait]
    impl NluProvider for BrokenProvider {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn classify(
            &self,
            _text: &str,
            _turn: &TurnContext,
        ) -> Result<NluResult, SprocketError> {
            Err(SprocketError::nlu("simulated outage"))
        }
    }

    fn turn() -> TurnContext {
        TurnContext::new(DialogState::Idle)
    }

    #[tokio::test]
    async fn failing_provider_degrades_to_rule_engine_exactly() {
        let router = NluRouter::new(Arc::new(BrokenProvider));
        let rules = RuleEngine::new();

        for text in [
            "你好",
            "查詢訂單 TP2501011234",
            "查詢產品",
            "牙盤還有庫存嗎",
            "幫助",
            "嗚啦啦啦",
        ] {
            let routed = router.resolve(text, &turn()).await;
            let direct = rules.understand(text);
            assert_eq!(routed, direct, "fallback must equal rule engine for {text:?}");
        }
    }

    #[tokio::test]
    async fn healthy_provider_result_passes_through() {
        struct FixedProvider;

        #[async_trait]
        impl NluProvider for FixedProvider {
            fn name(&self) -> &'static str {
                "fixed"
            }

            async fn classify(
                &self,
                _text: &str,
                _turn: &TurnContext,
            ) -> Result<NluResult, SprocketError> {
                Ok(NluResult {
                    intent: "contact_support".into(),
                    confidence: 0.99,
                    entities: Default::default(),
                    message: "轉接客服".into(),
                })
            }
        }

        let router = NluRouter::new(Arc::new(FixedProvider));
        let result = router.resolve("我要客服", &turn()).await;
        assert_eq!(result.intent, "contact_support");
    }

    #[tokio::test]
    async fn placeholder_selection_falls_back() {
        let config = NluConfig {
            provider: NluProviderKind::Dialogflow,
            ..Default::default()
        };
        let router = NluRouter::from_config(&config).unwrap();
        assert_eq!(router.provider_name(), "dialogflow");

        let result = router.resolve("你好", &turn()).await;
        assert_eq!(result.intent, "greeting");
    }

    #[tokio::test]
    async fn rules_provider_needs_no_fallback() {
        let config = NluConfig {
            provider: NluProviderKind::Rules,
            ..Default::default()
        };
        let router = NluRouter::from_config(&config).unwrap();
        let result = router.resolve("查詢訂單 TP2501011234", &turn()).await;
        assert_eq!(result.intent, "query_order");
        assert_eq!(result.order_number(), Some("TP2501011234"));
    }
}
