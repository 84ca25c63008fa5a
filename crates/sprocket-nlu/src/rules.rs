// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic keyword rule engine.
//!
//! Used both as the `rules` provider and as the universal fallback when any
//! other backend fails. Evaluates fixed, ordered keyword rules against the
//! lower-cased input; the order-intent rule is checked before the
//! product/stock rules.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use sprocket_core::error::SprocketError;
use sprocket_core::traits::NluProvider;
use sprocket_core::types::{
    ENTITY_ORDER_NUMBER, ENTITY_PRODUCT_NAME, NluResult, TurnContext,
};

const ORDER_KEYWORDS: &[&str] = &["訂單", "order"];
const ORDER_QUERY_VERBS: &[&str] = &["查詢", "查", "看"];
const PRODUCT_KEYWORDS: &[&str] = &["產品", "商品", "product"];
const PRODUCT_QUERY_VERBS: &[&str] = &["查詢", "查", "有"];
const STOCK_KEYWORDS: &[&str] = &["庫存", "stock"];
const GREETING_KEYWORDS: &[&str] = &["你好", "嗨", "hello", "hi"];
const HELP_KEYWORDS: &[&str] = &["幫助", "help", "功能"];

/// Fixed product vocabulary for entity extraction; first match wins.
const PRODUCT_VOCABULARY: &[&str] = &["牙盤", "曲柄", "導輪", "螺絲"];

/// Order numbers are 6+ uppercase letters/digits, matched against the raw
/// input (not the lower-cased copy used for keyword rules) so prefixes like
/// `TP` survive.
static ORDER_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z0-9]{6,}").expect("order number pattern"));

pub const GREETING_MESSAGE: &str = "您好！我是 Sprocket 客服助手，很高興為您服務！";

pub const HELP_MESSAGE: &str = "我可以幫您：\n1. 查詢訂單資訊\n2. 搜尋產品\n3. 查詢庫存\n4. 聯繫客服\n5. 查詢 LINE User ID\n請告訴我您需要什麼協助？";

pub const UNCLEAR_MESSAGE: &str =
    "抱歉，我不太理解您的意思。您可以說「訂單查詢」、「產品搜尋」或「幫助」來獲取協助。";

/// Deterministic keyword classifier with zero cost and zero latency.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEngine;

impl RuleEngine {
    pub fn new() -> Self {
        Self
    }

    /// Classifies a message. Infallible: every input maps to some intent,
    /// with `unclear` as the catch-all.
    pub fn understand(&self, text: &str) -> NluResult {
        let lower = text.to_lowercase();

        if contains_any(&lower, ORDER_KEYWORDS) && contains_any(&lower, ORDER_QUERY_VERBS) {
            return NluResult {
                intent: "query_order".into(),
                confidence: 0.8,
                entities: extract_order_number(text),
                message: "我將幫您查詢訂單資訊".into(),
            };
        }

        if contains_any(&lower, PRODUCT_KEYWORDS) && contains_any(&lower, PRODUCT_QUERY_VERBS) {
            return NluResult {
                intent: "query_product".into(),
                confidence: 0.8,
                entities: BTreeMap::new(),
                message: "我將幫您搜尋產品".into(),
            };
        }

        if contains_any(&lower, STOCK_KEYWORDS) {
            return NluResult {
                intent: "query_stock".into(),
                confidence: 0.7,
                entities: extract_product_name(&lower),
                message: "我將幫您查詢庫存資訊".into(),
            };
        }

        if contains_any(&lower, GREETING_KEYWORDS) {
            return NluResult {
                intent: "greeting".into(),
                confidence: 0.9,
                entities: BTreeMap::new(),
                message: GREETING_MESSAGE.into(),
            };
        }

        if contains_any(&lower, HELP_KEYWORDS) {
            return NluResult {
                intent: "get_help".into(),
                confidence: 0.8,
                entities: BTreeMap::new(),
                message: HELP_MESSAGE.into(),
            };
        }

        NluResult {
            intent: "unclear".into(),
            confidence: 0.5,
            entities: BTreeMap::new(),
            message: UNCLEAR_MESSAGE.into(),
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn extract_order_number(raw: &str) -> BTreeMap<String, String> {
    let mut entities = BTreeMap::new();
    if let Some(m) = ORDER_NUMBER.find(raw) {
        entities.insert(ENTITY_ORDER_NUMBER.to_string(), m.as_str().to_string());
    }
    entities
}

fn extract_product_name(lower: &str) -> BTreeMap<String, String> {
    let mut entities = BTreeMap::new();
    for keyword in PRODUCT_VOCABULARY {
        if lower.contains(keyword) {
            entities.insert(ENTITY_PRODUCT_NAME.to_string(), (*keyword).to_string());
            break;
        }
    }
    entities
}

#[async_trait]
impl NluProvider for RuleEngine {
    fn name(&self) -> &'static str {
        "rules"
    }

    async fn classify(
        &self,
        text: &str,
        _turn: &TurnContext,
    ) -> Result<NluResult, SprocketError> {
        Ok(self.understand(text))
    }
}
