// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider response parsing.
//!
//! LLM backends are asked for a single JSON object but routinely wrap it in
//! markdown code fences or surrounding prose. Parsing strips fence markers,
//! extracts the first balanced `{...}` block, and normalizes the loose
//! payload into a fully-populated [`NluResult`]. A missing `intent` field is
//! a hard parse failure; everything else is defaulted.

use std::collections::BTreeMap;

use serde::Deserialize;

use sprocket_core::error::SprocketError;
use sprocket_core::types::{
    ENTITY_CATEGORY_NAME, ENTITY_ORDER_NUMBER, ENTITY_PRODUCT_NAME, NluResult,
};

use crate::rules::UNCLEAR_MESSAGE;

/// The loose payload shape providers actually return.
#[derive(Debug, Deserialize)]
struct RawNluPayload {
    #[serde(default)]
    intent: Option<String>,
    #[serde(default)]
    confidence: Option<f32>,
    #[serde(default)]
    entities: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(default)]
    message: Option<String>,
}

/// Parses a raw provider response into a normalized [`NluResult`].
///
/// Missing fields are defaulted (`confidence` to 0.5, `entities` to empty,
/// `message` to the generic clarification line); a missing or empty `intent`
/// is an error so the caller counts the attempt as failed.
pub fn parse_nlu_payload(raw: &str) -> Result<NluResult, SprocketError> {
    let without_fences = strip_code_fences(raw);
    let object = extract_json_object(&without_fences)
        .ok_or_else(|| SprocketError::nlu("provider response contains no JSON object"))?;

    let payload: RawNluPayload = serde_json::from_str(object).map_err(|e| SprocketError::Nlu {
        message: format!("malformed provider payload: {e}"),
        source: Some(Box::new(e)),
    })?;

    let intent = payload
        .intent
        .filter(|i| !i.trim().is_empty())
        .ok_or_else(|| SprocketError::nlu("provider payload is missing `intent`"))?;

    Ok(NluResult {
        intent,
        confidence: payload.confidence.unwrap_or(0.5).clamp(0.0, 1.0),
        entities: payload.entities.map(normalize_entities).unwrap_or_default(),
        message: payload
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| UNCLEAR_MESSAGE.to_string()),
    })
}

/// Drops markdown code-fence marker lines (```json ... ```).
fn strip_code_fences(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extracts the first balanced `{...}` block, string-literal aware.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Coerces entity values to strings, drops nulls, and maps the camelCase key
/// spellings some models produce onto the canonical snake_case keys.
fn normalize_entities(raw: BTreeMap<String, serde_json::Value>) -> BTreeMap<String, String> {
    let mut entities = BTreeMap::new();
    for (key, value) in raw {
        let value = match value {
            serde_json::Value::String(s) if !s.trim().is_empty() => s,
            serde_json::Value::Number(n) => n.to_string(),
            _ => continue,
        };
        let key = match key.as_str() {
            "orderNumber" => ENTITY_ORDER_NUMBER.to_string(),
            "productName" => ENTITY_PRODUCT_NAME.to_string(),
            "categoryName" => ENTITY_CATEGORY_NAME.to_string(),
            _ => key,
        };
        entities.insert(key, value);
    }
    entities
}
