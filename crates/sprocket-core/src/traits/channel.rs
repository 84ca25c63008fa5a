// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound messaging channel trait.

use async_trait::async_trait;

use crate::error::SprocketError;
use crate::types::{OutboundMessage, ReplyToken};

/// Sends messages back through the messaging platform.
///
/// `reply` consumes a single-use token and is only valid synchronously
/// within the turn that received it; `push` is the separate, reusable
/// channel addressed by account id and is used outside the webhook flow
/// (order-status notifications).
#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn reply(
        &self,
        token: ReplyToken,
        messages: Vec<OutboundMessage>,
    ) -> Result<(), SprocketError>;

    async fn push(
        &self,
        account_id: &str,
        messages: Vec<OutboundMessage>,
    ) -> Result<(), SprocketError>;
}
