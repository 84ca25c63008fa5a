// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock outbound channel recording every reply and push.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use sprocket_core::error::SprocketError;
use sprocket_core::traits::ReplySender;
use sprocket_core::types::{OutboundMessage, ReplyToken};

/// A recorded outbound send.
#[derive(Debug, Clone, PartialEq)]
pub enum SentRecord {
    Reply {
        token: String,
        messages: Vec<OutboundMessage>,
    },
    Push {
        account_id: String,
        messages: Vec<OutboundMessage>,
    },
}

impl SentRecord {
    /// The text of the first message, for terse assertions.
    pub fn first_text(&self) -> Option<&str> {
        let messages = match self {
            SentRecord::Reply { messages, .. } => messages,
            SentRecord::Push { messages, .. } => messages,
        };
        messages.first().and_then(|m| match m {
            OutboundMessage::Text { text } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// A mock channel that records sends and can simulate delivery failure.
#[derive(Default)]
pub struct MockChannel {
    sent: Mutex<Vec<SentRecord>>,
    failing: AtomicBool,
}

impl MockChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent send fail with a channel error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of everything sent so far.
    pub async fn sent(&self) -> Vec<SentRecord> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl ReplySender for MockChannel {
    async fn reply(
        &self,
        token: ReplyToken,
        messages: Vec<OutboundMessage>,
    ) -> Result<(), SprocketError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SprocketError::channel("simulated delivery failure"));
        }
        self.sent.lock().await.push(SentRecord::Reply {
            token: token.into_inner(),
            messages,
        });
        Ok(())
    }

    async fn push(
        &self,
        account_id: &str,
        messages: Vec<OutboundMessage>,
    ) -> Result<(), SprocketError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SprocketError::channel("simulated delivery failure"));
        }
        self.sent.lock().await.push(SentRecord::Push {
            account_id: account_id.to_string(),
            messages,
        });
        Ok(())
    }
}
