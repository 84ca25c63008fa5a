// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent dispatch.
//!
//! Maps an NLU result plus the current dialog state to a reply and the next
//! state/context. Deterministic; the only side effects are read-only catalog
//! lookups. Lookup failures never escape as errors — chat text is the only
//! channel available, so they surface as apology replies.
//!
//! A conversation parked in a `Waiting*` state claims the whole next turn:
//! the raw message text answers the open question regardless of what the
//! NLU classified that turn as.

use tracing::warn;

use sprocket_core::traits::{OrderLookup, ProductLookup};
use sprocket_core::types::{Conversation, DialogContext, DialogState, Intent, NluResult};

use crate::replies;

/// The dispatcher's proposal for one turn.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogOutcome {
    /// Reply text; `None` sends nothing.
    pub reply: Option<String>,
    pub next_state: DialogState,
    pub next_context: DialogContext,
}

impl DialogOutcome {
    fn idle(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            next_state: DialogState::Idle,
            next_context: DialogContext::Empty,
        }
    }
}

/// Handles one classified turn against the current conversation.
pub async fn dispatch(
    nlu: &NluResult,
    conversation: &Conversation,
    orders: &dyn OrderLookup,
    products: &dyn ProductLookup,
) -> DialogOutcome {
    // A waiting state overrides the per-turn classification: the user is
    // answering our question, whatever the NLU made of the answer.
    let intent = match conversation.state {
        DialogState::WaitingOrderNumber => Intent::QueryOrder,
        DialogState::WaitingProductQuery => Intent::QueryProduct,
        DialogState::WaitingStockQuery => Intent::QueryStock,
        DialogState::Idle | DialogState::InConversation => Intent::parse(&nlu.intent),
    };

    match intent {
        Intent::Greeting | Intent::GetHelp => DialogOutcome::idle(nlu.message.clone()),
        Intent::ContactSupport => DialogOutcome::idle(replies::SUPPORT_REPLY),
        Intent::GetLineUserId => DialogOutcome::idle(replies::line_user_id_reply(
            &conversation.external_account_id,
        )),
        Intent::QueryOrder => handle_query_order(nlu, conversation, orders).await,
        Intent::QueryProduct => handle_query_product(nlu, conversation, products).await,
        Intent::QueryStock => handle_query_stock(nlu, conversation, products).await,
        // Unclear keeps the clarification sub-dialog alive: reply verbatim,
        // preserve state and context.
        Intent::Unclear => DialogOutcome {
            reply: Some(nlu.message.clone()),
            next_state: conversation.state,
            next_context: conversation.context.clone(),
        },
    }
}

async fn handle_query_order(
    nlu: &NluResult,
    conversation: &Conversation,
    orders: &dyn OrderLookup,
) -> DialogOutcome {
    let number = if conversation.state == DialogState::WaitingOrderNumber {
        // The entire current message is the order number.
        conversation
            .last_inbound
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    } else {
        nlu.order_number().map(str::to_string)
    };

    let Some(number) = number else {
        return DialogOutcome {
            reply: Some(replies::ASK_ORDER_NUMBER.into()),
            next_state: DialogState::WaitingOrderNumber,
            next_context: DialogContext::OrderNumber {
                hint: nlu.order_number().map(str::to_string),
            },
        };
    };

    match orders.order_by_number(&number).await {
        Ok(Some(order)) => DialogOutcome::idle(replies::order_details(&order)),
        Ok(None) => DialogOutcome::idle(replies::order_not_found(&number)),
        Err(e) => {
            warn!(error = %e, order_number = number.as_str(), "order lookup failed");
            DialogOutcome::idle(replies::ORDER_LOOKUP_FAILED)
        }
    }
}

async fn handle_query_product(
    nlu: &NluResult,
    conversation: &Conversation,
    products: &dyn ProductLookup,
) -> DialogOutcome {
    let mut query = nlu
        .product_name()
        .or_else(|| nlu.category_name())
        .map(str::to_string);

    if query.is_none() && conversation.state == DialogState::WaitingProductQuery {
        query = conversation
            .last_inbound
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
    }

    let Some(query) = query else {
        return DialogOutcome {
            reply: Some(replies::ASK_PRODUCT_QUERY.into()),
            next_state: DialogState::WaitingProductQuery,
            next_context: DialogContext::ProductQuery {
                category: nlu.category_name().map(str::to_string),
            },
        };
    };

    match products.search_products(&query, 5).await {
        Ok(results) if results.is_empty() => DialogOutcome::idle(replies::PRODUCT_NOT_FOUND),
        Ok(results) => DialogOutcome::idle(replies::product_results(&results)),
        Err(e) => {
            warn!(error = %e, query = query.as_str(), "product search failed");
            DialogOutcome::idle(replies::PRODUCT_LOOKUP_FAILED)
        }
    }
}

async fn handle_query_stock(
    nlu: &NluResult,
    conversation: &Conversation,
    products: &dyn ProductLookup,
) -> DialogOutcome {
    let mut query = nlu.product_name().map(str::to_string);

    if query.is_none() && conversation.state == DialogState::WaitingStockQuery {
        query = conversation
            .last_inbound
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
    }

    let Some(query) = query else {
        return DialogOutcome {
            reply: Some(replies::ASK_STOCK_QUERY.into()),
            next_state: DialogState::WaitingStockQuery,
            next_context: DialogContext::StockQuery {
                product: nlu.product_name().map(str::to_string),
            },
        };
    };

    match products.product_by_name(&query).await {
        Ok(Some(product)) => DialogOutcome::idle(replies::stock_status(&product)),
        Ok(None) => DialogOutcome::idle(replies::stock_not_found(&query)),
        Err(e) => {
            warn!(error = %e, query = query.as_str(), "stock lookup failed");
            DialogOutcome::idle(replies::STOCK_LOOKUP_FAILED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use sprocket_core::types::{ENTITY_ORDER_NUMBER, ENTITY_PRODUCT_NAME, MessageRole};
    use sprocket_test_utils::StaticCatalog;

    fn nlu(intent: &str) -> NluResult {
        NluResult {
            intent: intent.into(),
            confidence: 0.8,
            entities: BTreeMap::new(),
            message: format!("nlu message for {intent}"),
        }
    }

    fn nlu_with_entity(intent: &str, key: &str, value: &str) -> NluResult {
        let mut result = nlu(intent);
        result.entities.insert(key.into(), value.into());
        result
    }

    fn idle_conversation() -> Conversation {
        Conversation::new("U4af4980629111111111111111111111", "user-1")
    }

    fn waiting(state: DialogState, context: DialogContext, last: &str) -> Conversation {
        let mut c = idle_conversation();
        c.append(MessageRole::User, last);
        c.note_inbound(last);
        c.transition(state, context);
        c
    }

    #[tokio::test]
    async fn greeting_replies_and_stays_idle() {
        let catalog = StaticCatalog::with_fixtures();
        let outcome = dispatch(&nlu("greeting"), &idle_conversation(), &catalog, &catalog).await;
        assert_eq!(outcome.reply.as_deref(), Some("nlu message for greeting"));
        assert_eq!(outcome.next_state, DialogState::Idle);
    }

    #[tokio::test]
    async fn query_order_without_entity_asks_for_number() {
        let catalog = StaticCatalog::with_fixtures();
        let outcome = dispatch(&nlu("query_order"), &idle_conversation(), &catalog, &catalog).await;
        assert_eq!(outcome.reply.as_deref(), Some(replies::ASK_ORDER_NUMBER));
        assert_eq!(outcome.next_state, DialogState::WaitingOrderNumber);
        assert!(matches!(outcome.next_context, DialogContext::OrderNumber { .. }));
    }

    #[tokio::test]
    async fn query_order_with_entity_formats_details() {
        let catalog = StaticCatalog::with_fixtures();
        let result = nlu_with_entity("query_order", ENTITY_ORDER_NUMBER, "TP2501011234");
        let outcome = dispatch(&result, &idle_conversation(), &catalog, &catalog).await;
        let reply = outcome.reply.unwrap();
        assert!(reply.contains("訂單編號：TP2501011234"));
        assert!(reply.contains("已出貨"));
        assert_eq!(outcome.next_state, DialogState::Idle);
    }

    #[tokio::test]
    async fn unknown_order_number_is_not_found_and_resets() {
        let catalog = StaticCatalog::with_fixtures();
        let result = nlu_with_entity("query_order", ENTITY_ORDER_NUMBER, "TP9999999999");
        let outcome = dispatch(&result, &idle_conversation(), &catalog, &catalog).await;
        assert!(outcome.reply.unwrap().contains("找不到訂單編號為 TP9999999999"));
        assert_eq!(outcome.next_state, DialogState::Idle);
        assert_eq!(outcome.next_context, DialogContext::Empty);
    }

    #[tokio::test]
    async fn waiting_order_number_uses_raw_message_over_nlu() {
        let catalog = StaticCatalog::with_fixtures();
        let conversation = waiting(
            DialogState::WaitingOrderNumber,
            DialogContext::OrderNumber { hint: None },
            "TP2501011234",
        );
        // The per-turn NLU says unclear with no entities; the raw message
        // must still drive the lookup.
        let outcome = dispatch(&nlu("unclear"), &conversation, &catalog, &catalog).await;
        assert!(outcome.reply.unwrap().contains("訂單編號：TP2501011234"));
        assert_eq!(outcome.next_state, DialogState::Idle);
    }

    #[tokio::test]
    async fn order_lookup_is_read_only_and_repeatable() {
        let catalog = StaticCatalog::with_fixtures();
        let result = nlu_with_entity("query_order", ENTITY_ORDER_NUMBER, "TP2501011234");
        let first = dispatch(&result, &idle_conversation(), &catalog, &catalog).await;
        let second = dispatch(&result, &idle_conversation(), &catalog, &catalog).await;
        assert_eq!(first.reply, second.reply, "reads must have no side effects");
    }

    #[tokio::test]
    async fn query_product_without_query_asks_and_waits() {
        let catalog = StaticCatalog::with_fixtures();
        let outcome =
            dispatch(&nlu("query_product"), &idle_conversation(), &catalog, &catalog).await;
        assert_eq!(outcome.reply.as_deref(), Some(replies::ASK_PRODUCT_QUERY));
        assert_eq!(outcome.next_state, DialogState::WaitingProductQuery);
    }

    #[tokio::test]
    async fn waiting_product_query_searches_raw_message_capped_at_five() {
        let catalog = StaticCatalog::with_fixtures();
        let conversation = waiting(
            DialogState::WaitingProductQuery,
            DialogContext::ProductQuery { category: None },
            "牙盤",
        );
        let outcome = dispatch(&nlu("unclear"), &conversation, &catalog, &catalog).await;
        let reply = outcome.reply.unwrap();
        assert!(reply.contains("共找到 5 個產品"));
        assert!(reply.contains("元 (庫存："));
        assert_eq!(outcome.next_state, DialogState::Idle);
    }

    #[tokio::test]
    async fn product_search_with_no_match_apologizes() {
        let catalog = StaticCatalog::with_fixtures();
        let result = nlu_with_entity("query_product", ENTITY_PRODUCT_NAME, "座墊");
        let outcome = dispatch(&result, &idle_conversation(), &catalog, &catalog).await;
        assert_eq!(outcome.reply.as_deref(), Some(replies::PRODUCT_NOT_FOUND));
        assert_eq!(outcome.next_state, DialogState::Idle);
    }

    #[tokio::test]
    async fn query_stock_single_best_match() {
        let catalog = StaticCatalog::with_fixtures();
        let result = nlu_with_entity("query_stock", ENTITY_PRODUCT_NAME, "曲柄");
        let outcome = dispatch(&result, &idle_conversation(), &catalog, &catalog).await;
        let reply = outcome.reply.unwrap();
        assert!(reply.contains("產品：170mm 曲柄"));
        assert!(reply.contains("庫存充足（5 件）"));
    }

    #[tokio::test]
    async fn query_stock_without_product_asks_and_waits() {
        let catalog = StaticCatalog::with_fixtures();
        let outcome = dispatch(&nlu("query_stock"), &idle_conversation(), &catalog, &catalog).await;
        assert_eq!(outcome.reply.as_deref(), Some(replies::ASK_STOCK_QUERY));
        assert_eq!(outcome.next_state, DialogState::WaitingStockQuery);
    }

    #[tokio::test]
    async fn out_of_stock_phrasing() {
        // Fixture index 1 (44T) has zero stock.
        let catalog = StaticCatalog::with_fixtures();
        let result = nlu_with_entity("query_stock", ENTITY_PRODUCT_NAME, "44T");
        let outcome = dispatch(&result, &idle_conversation(), &catalog, &catalog).await;
        assert!(outcome.reply.unwrap().contains("目前缺貨中"));
    }

    #[tokio::test]
    async fn contact_support_is_canned() {
        let catalog = StaticCatalog::with_fixtures();
        let outcome =
            dispatch(&nlu("contact_support"), &idle_conversation(), &catalog, &catalog).await;
        assert_eq!(outcome.reply.as_deref(), Some(replies::SUPPORT_REPLY));
    }

    #[tokio::test]
    async fn get_line_user_id_echoes_normalized_id() {
        let catalog = StaticCatalog::with_fixtures();
        let outcome =
            dispatch(&nlu("get_line_user_id"), &idle_conversation(), &catalog, &catalog).await;
        assert!(
            outcome
                .reply
                .unwrap()
                .contains("U4af4980629111111111111111111111")
        );
        assert_eq!(outcome.next_state, DialogState::Idle);
    }

    #[tokio::test]
    async fn unclear_preserves_state_and_context() {
        let catalog = StaticCatalog::with_fixtures();
        let mut conversation = idle_conversation();
        conversation.transition(DialogState::InConversation, DialogContext::Empty);

        let outcome = dispatch(&nlu("unclear"), &conversation, &catalog, &catalog).await;
        assert_eq!(outcome.reply.as_deref(), Some("nlu message for unclear"));
        assert_eq!(outcome.next_state, DialogState::InConversation);
        assert_eq!(outcome.next_context, DialogContext::Empty);
    }

    #[tokio::test]
    async fn unmapped_intent_behaves_as_unclear() {
        let catalog = StaticCatalog::with_fixtures();
        let outcome = dispatch(&nlu("order_pizza"), &idle_conversation(), &catalog, &catalog).await;
        assert_eq!(outcome.reply.as_deref(), Some("nlu message for order_pizza"));
        assert_eq!(outcome.next_state, DialogState::Idle);
    }
}
