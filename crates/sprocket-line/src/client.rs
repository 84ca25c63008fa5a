// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the LINE Messaging API.
//!
//! Implements the two outbound operations: `reply` (synchronous, consumes a
//! single-use token) and `push` (asynchronous, addressed by account id,
//! reusable). Authentication is a channel access token bearer header.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::debug;

use sprocket_core::error::SprocketError;
use sprocket_core::traits::ReplySender;
use sprocket_core::types::{OutboundMessage, ReplyToken};

/// Base URL for the LINE Messaging API.
const API_BASE_URL: &str = "https://api.line.me";

/// HTTP client for LINE Messaging API communication.
#[derive(Debug, Clone)]
pub struct LineClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: String,
    messages: &'a [OutboundMessage],
}

#[derive(Debug, Serialize)]
struct PushRequest<'a> {
    to: &'a str,
    messages: &'a [OutboundMessage],
}

impl LineClient {
    /// Creates a client authenticated with the channel access token.
    pub fn new(channel_access_token: &str) -> Result<Self, SprocketError> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {channel_access_token}");
        headers.insert(
            "authorization",
            HeaderValue::from_str(&bearer).map_err(|e| {
                SprocketError::Config(format!("invalid channel access token: {e}"))
            })?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SprocketError::Channel {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    async fn post_json<T: Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<(), SprocketError> {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .map_err(|e| SprocketError::Channel {
                message: format!("LINE API request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SprocketError::channel(format!(
                "LINE API returned {status}: {body}"
            )));
        }

        debug!(path, "LINE API call succeeded");
        Ok(())
    }
}

#[async_trait]
impl ReplySender for LineClient {
    async fn reply(
        &self,
        token: ReplyToken,
        messages: Vec<OutboundMessage>,
    ) -> Result<(), SprocketError> {
        if messages.is_empty() {
            return Err(SprocketError::channel("reply requires at least one message"));
        }
        let request = ReplyRequest {
            reply_token: token.into_inner(),
            messages: &messages,
        };
        self.post_json("/v2/bot/message/reply", &request).await
    }

    async fn push(
        &self,
        account_id: &str,
        messages: Vec<OutboundMessage>,
    ) -> Result<(), SprocketError> {
        if messages.is_empty() {
            return Err(SprocketError::channel("push requires at least one message"));
        }
        let request = PushRequest {
            to: account_id,
            messages: &messages,
        };
        self.post_json("/v2/bot/message/push", &request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> LineClient {
        LineClient::new("test-channel-token")
            .unwrap()
            .with_base_url(base_url.to_string())
    }

    #[tokio::test]
    async fn reply_posts_token_and_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/bot/message/reply"))
            .and(header("authorization", "Bearer test-channel-token"))
            .and(body_partial_json(serde_json::json!({
                "replyToken": "tok-1",
                "messages": [{"type": "text", "text": "您好"}],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        client
            .reply(ReplyToken::new("tok-1"), vec![OutboundMessage::text("您好")])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn push_posts_account_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/bot/message/push"))
            .and(body_partial_json(serde_json::json!({
                "to": "U-abc",
                "messages": [{"type": "text", "text": "訂單已出貨"}],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        client
            .push("U-abc", vec![OutboundMessage::text("訂單已出貨")])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn api_rejection_is_a_channel_error() {
        let server = MockServer::start().await;
        // 400: the account has not friended the bot, token expired, etc.
        Mock::given(method("POST"))
            .and(path("/v2/bot/message/reply"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "message": "Invalid reply token"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .reply(ReplyToken::new("stale"), vec![OutboundMessage::text("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, SprocketError::Channel { .. }), "got: {err}");
        assert!(err.to_string().contains("400"), "got: {err}");
    }

    #[tokio::test]
    async fn empty_message_list_is_rejected_locally() {
        let client = test_client("http://unused");
        let err = client.reply(ReplyToken::new("tok"), vec![]).await.unwrap_err();
        assert!(err.to_string().contains("at least one message"));
    }
}
