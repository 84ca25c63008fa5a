// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LINE webhook payload types.
//!
//! Deserializes the camelCase webhook JSON into channel-agnostic pieces the
//! dialog pipeline consumes. Anything that is not a text message is
//! accepted and ignored by the caller.

use serde::Deserialize;

use sprocket_core::types::ReplyToken;

/// The body of one webhook POST: a batch of events.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// One inbound event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub message: Option<EventMessage>,
    #[serde(default)]
    pub source: Option<EventSource>,
    #[serde(default)]
    pub reply_token: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// The message attached to a message event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// The sender of an event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(rename = "type", default)]
    pub source_type: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl WebhookEvent {
    /// Whether this event carries a user text message.
    pub fn is_text_message(&self) -> bool {
        self.event_type == "message"
            && self
                .message
                .as_ref()
                .is_some_and(|m| m.message_type == "text" && m.text.is_some())
    }

    /// The text of a text-message event.
    pub fn text(&self) -> Option<&str> {
        if self.event_type != "message" {
            return None;
        }
        self.message
            .as_ref()
            .filter(|m| m.message_type == "text")
            .and_then(|m| m.text.as_deref())
    }

    /// The sending account's id.
    pub fn account_id(&self) -> Option<&str> {
        self.source.as_ref().and_then(|s| s.user_id.as_deref())
    }

    /// Takes the event's one-shot reply capability.
    ///
    /// The raw token leaves the event exactly once; a second call returns
    /// `None`, which keeps the single-use discipline visible at the type
    /// level from here on.
    pub fn take_reply_token(&mut self) -> Option<ReplyToken> {
        self.reply_token.take().map(ReplyToken::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT_EVENT: &str = r#"{
        "destination": "xxx",
        "events": [{
            "type": "message",
            "message": {"type": "text", "id": "468789577898262530", "text": "查詢訂單 TP2501011234"},
            "timestamp": 1735689600000,
            "source": {"type": "user", "userId": "U4af4980629111111111111111111111"},
            "replyToken": "38ef843bde154d9b91c21320ffd17a0f"
        }]
    }"#;

    #[test]
    fn text_event_deserializes() {
        let payload: WebhookPayload = serde_json::from_str(TEXT_EVENT).unwrap();
        assert_eq!(payload.events.len(), 1);

        let event = &payload.events[0];
        assert!(event.is_text_message());
        assert_eq!(event.text(), Some("查詢訂單 TP2501011234"));
        assert_eq!(event.account_id(), Some("U4af4980629111111111111111111111"));
    }

    #[test]
    fn sticker_event_is_not_text() {
        let json = r#"{
            "events": [{
                "type": "message",
                "message": {"type": "sticker", "id": "1", "packageId": "446", "stickerId": "1988"},
                "source": {"type": "user", "userId": "U-abc"},
                "replyToken": "tok"
            }]
        }"#;
        // Unknown message fields (packageId/stickerId) must not break parsing.
        let payload: WebhookPayload = serde_json::from_str(json).unwrap();
        assert!(!payload.events[0].is_text_message());
        assert_eq!(payload.events[0].text(), None);
    }

    #[test]
    fn follow_event_has_no_message() {
        let json = r#"{
            "events": [{
                "type": "follow",
                "source": {"type": "user", "userId": "U-abc"},
                "replyToken": "tok"
            }]
        }"#;
        let payload: WebhookPayload = serde_json::from_str(json).unwrap();
        assert!(!payload.events[0].is_text_message());
    }

    #[test]
    fn reply_token_can_be_taken_once() {
        let payload: WebhookPayload = serde_json::from_str(TEXT_EVENT).unwrap();
        let mut event = payload.events.into_iter().next().unwrap();

        let token = event.take_reply_token().expect("token present");
        assert_eq!(token.into_inner(), "38ef843bde154d9b91c21320ffd17a0f");
        assert!(event.take_reply_token().is_none(), "token is single-use");
    }

    #[test]
    fn empty_batch_deserializes() {
        let payload: WebhookPayload = serde_json::from_str(r#"{"events": []}"#).unwrap();
        assert!(payload.events.is_empty());
    }
}
