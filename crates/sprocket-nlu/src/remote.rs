// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hosted chat-completions NLU provider.
//!
//! Talks to an OpenAI-style `/chat/completions` endpoint. A missing API key
//! surfaces immediately as a configuration error so the router can fall
//! back; malformed content is a failed classification. Unlike the local
//! provider there is no retry loop here — the router degrades straight to
//! the rule engine.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use sprocket_config::model::RemoteNluConfig;
use sprocket_core::error::SprocketError;
use sprocket_core::traits::NluProvider;
use sprocket_core::types::{NluResult, TurnContext};

use crate::parse::parse_nlu_payload;

const SYSTEM_PROMPT: &str = "你是一個專業的自行車零件 B2B 客服助手。幫助用戶理解意圖並提取關鍵信息。\n\n\
用戶意圖類型：\n\
1. query_order - 查詢訂單（提取訂單號）\n\
2. query_product - 查詢產品（提取產品名稱）\n\
3. query_stock - 查詢庫存（提取產品名稱）\n\
4. greeting - 問候\n\
5. get_help - 獲取幫助\n\
6. contact_support - 聯繫客服\n\
7. unclear - 無法理解\n\n\
請回應 JSON 格式：\n\
{\"intent\": \"意圖名稱\", \"confidence\": 0.0, \"entities\": {\"order_number\": \"訂單號（如有）\", \
\"product_name\": \"產品名稱（如有）\", \"category_name\": \"分類名稱（如有）\"}, \"message\": \"給用戶的回覆\"}";

/// Hosted chat API classification provider.
pub struct RemoteChat {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl RemoteChat {
    /// Creates a provider from configuration.
    pub fn new(config: &RemoteNluConfig) -> Result<Self, SprocketError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SprocketError::Nlu {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl NluProvider for RemoteChat {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn classify(
        &self,
        text: &str,
        _turn: &TurnContext,
    ) -> Result<NluResult, SprocketError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SprocketError::Config("nlu.remote.api_key is not set".into()))?;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
            temperature: 0.7,
            max_tokens: 500,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SprocketError::Nlu {
                message: format!("chat request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SprocketError::nlu(format!("chat returned {status}: {body}")));
        }

        let body: ChatResponse = response.json().await.map_err(|e| SprocketError::Nlu {
            message: format!("malformed chat response: {e}"),
            source: Some(Box::new(e)),
        })?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| SprocketError::nlu("chat response has no choices"))?;

        parse_nlu_payload(&content)
    }
}
