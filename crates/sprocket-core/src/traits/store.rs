// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation store trait for durable per-account dialog state.

use async_trait::async_trait;

use crate::error::SprocketError;
use crate::types::Conversation;

/// Durable storage for conversations, keyed by external account id.
///
/// Writes are single-document and last-write-wins; the dialog engine
/// serializes turns per account so read-modify-write cycles do not race.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Looks up the conversation for an external account, if one exists.
    async fn find(&self, external_account_id: &str)
    -> Result<Option<Conversation>, SprocketError>;

    /// Persists the conversation, creating or replacing it.
    async fn save(&self, conversation: &Conversation) -> Result<(), SprocketError>;
}
