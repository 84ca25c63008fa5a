// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-turn dialog pipeline.
//!
//! One inbound text event runs: resolve conversation -> append -> NLU ->
//! dispatch -> persist -> reply. Turns for the same external account are
//! serialized through a keyed critical section so two near-simultaneous
//! messages cannot interleave the read-modify-write and silently drop a
//! turn; turns for different accounts run concurrently.
//!
//! State commitment is strict, delivery is best-effort: the conversation is
//! persisted before the reply is sent, and a rejected reply never rolls the
//! persisted update back.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use sprocket_core::error::SprocketError;
use sprocket_core::traits::{
    AccountDirectory, ConversationStore, OrderLookup, ProductLookup, ReplySender,
};
use sprocket_core::types::{
    Conversation, MessageRole, OutboundMessage, ReplyToken, TurnContext,
};
use sprocket_nlu::NluRouter;

use crate::dispatch;
use crate::replies;

/// How a turn's conversation was resolved.
enum Resolution {
    Conversation(Conversation),
    /// The platform knows the account but no business user claims it.
    Unregistered,
}

/// The dialog engine: owns the adapters and drives each turn.
pub struct DialogEngine {
    store: Arc<dyn ConversationStore>,
    directory: Arc<dyn AccountDirectory>,
    orders: Arc<dyn OrderLookup>,
    products: Arc<dyn ProductLookup>,
    nlu: Arc<NluRouter>,
    channel: Arc<dyn ReplySender>,
    history_limit: Option<usize>,
    turn_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl DialogEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<dyn ConversationStore>,
        directory: Arc<dyn AccountDirectory>,
        orders: Arc<dyn OrderLookup>,
        products: Arc<dyn ProductLookup>,
        nlu: Arc<NluRouter>,
        channel: Arc<dyn ReplySender>,
        history_limit: Option<usize>,
    ) -> Self {
        Self {
            store,
            directory,
            orders,
            products,
            nlu,
            channel,
            history_limit,
            turn_locks: DashMap::new(),
        }
    }

    /// Handles one inbound text message.
    ///
    /// Returns `Err` only for storage/directory failures; NLU failures
    /// degrade inside the router and delivery failures are swallowed after
    /// the state is committed.
    pub async fn handle_text_turn(
        &self,
        account_id: &str,
        text: &str,
        reply_token: Option<ReplyToken>,
    ) -> Result<(), SprocketError> {
        // Serialize turns per account. The entry guard is dropped before
        // awaiting the lock so other accounts are never blocked.
        let lock = {
            let entry = self
                .turn_locks
                .entry(account_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())));
            entry.clone()
        };
        let _turn = lock.lock().await;

        info!(account_id, text, "inbound message");

        let mut conversation = match self.resolve(account_id).await? {
            Resolution::Conversation(c) => c,
            Resolution::Unregistered => {
                self.send_linking_hint(account_id, reply_token).await;
                return Ok(());
            }
        };

        conversation.append(MessageRole::User, text);
        conversation.note_inbound(text);

        let turn = TurnContext::new(conversation.state);
        let nlu_result = self.nlu.resolve(text, &turn).await;

        let outcome = dispatch::dispatch(
            &nlu_result,
            &conversation,
            self.orders.as_ref(),
            self.products.as_ref(),
        )
        .await;

        if let Some(reply) = outcome.reply.as_deref()
            && !reply.is_empty()
        {
            conversation.append(MessageRole::Assistant, reply);
        }
        conversation.transition(outcome.next_state, outcome.next_context);
        if let Some(limit) = self.history_limit {
            conversation.prune_history(limit);
        }

        // Commit before sending: delivery is best-effort, state is not.
        self.store.save(&conversation).await?;
        debug!(
            account_id,
            state = %conversation.state,
            "conversation persisted"
        );

        if let (Some(token), Some(reply)) = (reply_token, outcome.reply) {
            if reply.is_empty() {
                return Ok(());
            }
            if let Err(e) = self
                .channel
                .reply(token, vec![OutboundMessage::text(reply)])
                .await
            {
                warn!(account_id, error = %e, "reply delivery failed (state already committed)");
            }
        }

        Ok(())
    }

    /// Resolves the conversation for an account, creating a fresh one for
    /// newly-seen linked accounts.
    async fn resolve(&self, account_id: &str) -> Result<Resolution, SprocketError> {
        if let Some(existing) = self.store.find(account_id).await? {
            return Ok(Resolution::Conversation(existing));
        }

        match self.directory.linked_user(account_id).await? {
            Some(user) => {
                info!(account_id, user_id = user.id.as_str(), "starting conversation");
                Ok(Resolution::Conversation(Conversation::new(account_id, user.id)))
            }
            None => Ok(Resolution::Unregistered),
        }
    }

    /// One-time linking hint for unregistered accounts. Nothing is created
    /// or persisted.
    async fn send_linking_hint(&self, account_id: &str, reply_token: Option<ReplyToken>) {
        let Some(token) = reply_token else {
            warn!(account_id, "unregistered account but no reply token available");
            return;
        };

        info!(account_id, "unregistered account, sending linking hint");
        let hint = replies::linking_hint(account_id);
        if let Err(e) = self
            .channel
            .reply(token, vec![OutboundMessage::text(hint)])
            .await
        {
            warn!(account_id, error = %e, "linking hint delivery failed");
        }
    }
}
