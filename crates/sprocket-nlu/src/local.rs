// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP-hosted local LLM provider (Ollama generate API).
//!
//! Wraps a single-shot `/api/generate` call with a request-level timeout,
//! bounded linear-backoff retry, and a bounded FIFO classification cache
//! keyed by normalized input text. The cache is consulted before calling
//! out and populated after a successful parse.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use sprocket_config::model::LocalNluConfig;
use sprocket_core::error::SprocketError;
use sprocket_core::traits::NluProvider;
use sprocket_core::types::{NluResult, TurnContext};

use crate::cache::ClassificationCache;
use crate::parse::parse_nlu_payload;

/// Sampling options sent with every generate request.
const TEMPERATURE: f32 = 0.3;
const TOP_P: f32 = 0.9;
const NUM_PREDICT: u32 = 256;

/// Local LLM classification provider.
pub struct LocalLlm {
    client: reqwest::Client,
    base_url: String,
    model: String,
    timeout: Duration,
    max_attempts: u32,
    cache: Mutex<ClassificationCache>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    top_p: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

impl LocalLlm {
    /// Creates a provider from configuration.
    pub fn new(config: &LocalNluConfig) -> Result<Self, SprocketError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SprocketError::Nlu {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout,
            max_attempts: config.max_attempts.max(1),
            cache: Mutex::new(ClassificationCache::new(config.cache_capacity)),
        })
    }

    fn build_prompt(&self, text: &str, turn: &TurnContext) -> String {
        format!(
            "你是一個專業的自行車零件 B2B 客服助手。判斷用戶意圖並提取關鍵信息。\n\n\
             意圖類型：\n\
             1. query_order - 查詢訂單（提取訂單號）\n\
             2. query_product - 查詢產品（提取產品名稱）\n\
             3. query_stock - 查詢庫存（提取產品名稱）\n\
             4. greeting - 問候\n\
             5. get_help - 獲取幫助\n\
             6. contact_support - 聯繫客服\n\
             7. unclear - 無法理解\n\n\
             只回應一個 JSON 物件：\n\
             {{\"intent\": \"意圖名稱\", \"confidence\": 0.0, \"entities\": \
             {{\"order_number\": \"訂單號（如有）\", \"product_name\": \"產品名稱（如有）\", \
             \"category_name\": \"分類名稱（如有）\"}}, \"message\": \"給用戶的回覆\"}}\n\n\
             目前對話狀態：{}\n\
             用戶訊息：{}",
            turn.state, text
        )
    }

    async fn attempt(&self, prompt: &str) -> Result<NluResult, SprocketError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: TEMPERATURE,
                top_p: TOP_P,
                num_predict: NUM_PREDICT,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SprocketError::Timeout {
                        duration: self.timeout,
                    }
                } else {
                    SprocketError::Nlu {
                        message: format!("generate request failed: {e}"),
                        source: Some(Box::new(e)),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SprocketError::nlu(format!(
                "generate returned {status}: {body}"
            )));
        }

        let body: GenerateResponse =
            response.json().await.map_err(|e| SprocketError::Nlu {
                message: format!("malformed generate response: {e}"),
                source: Some(Box::new(e)),
            })?;

        parse_nlu_payload(&body.response)
    }
}

#[async_trait]
impl NluProvider for LocalLlm {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn classify(
        &self,
        text: &str,
        turn: &TurnContext,
    ) -> Result<NluResult, SprocketError> {
        if let Some(hit) = self.cache.lock().await.get(text) {
            debug!("classification cache hit");
            return Ok(hit);
        }

        let prompt = self.build_prompt(text, turn);
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                // Linear backoff: 1000 ms before attempt 2, 2000 ms before
                // attempt 3, and so on.
                let backoff = Duration::from_millis(u64::from(attempt - 1) * 1000);
                warn!(attempt, backoff_ms = backoff.as_millis() as u64, "retrying local NLU");
                tokio::time::sleep(backoff).await;
            }

            match self.attempt(&prompt).await {
                Ok(result) => {
                    self.cache.lock().await.insert(text, result.clone());
                    return Ok(result);
                }
                Err(e) => {
                    warn!(attempt, error = %e, "local NLU attempt failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| SprocketError::nlu("local NLU failed with no attempts")))
    }
}
