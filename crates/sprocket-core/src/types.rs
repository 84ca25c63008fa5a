// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Sprocket assistant.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Dialog states of a conversation.
///
/// `Idle` is both the initial state and the terminal resting state; the
/// `Waiting*` states keep a follow-up question alive across turns.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize, Default,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DialogState {
    #[default]
    Idle,
    WaitingOrderNumber,
    WaitingProductQuery,
    WaitingStockQuery,
    InConversation,
}

/// Per-state dialog context.
///
/// One variant per `Waiting*` state, each carrying only the fields that
/// state needs. Replaces the untyped key/value blob so that context written
/// by one state cannot leak into another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DialogContext {
    #[default]
    Empty,
    /// Waiting for an order number; `hint` is a candidate token seen in the
    /// turn that asked the follow-up question, if any.
    OrderNumber { hint: Option<String> },
    /// Waiting for a product query; `category` was extracted alongside the
    /// original request, if any.
    ProductQuery { category: Option<String> },
    /// Waiting for a stock query; `product` was extracted alongside the
    /// original request, if any.
    StockQuery { product: Option<String> },
}

impl DialogContext {
    /// Whether this context variant belongs to the given state.
    ///
    /// `Empty` is valid for every state; each payload variant is only valid
    /// for its matching `Waiting*` state.
    pub fn agrees_with(&self, state: DialogState) -> bool {
        match self {
            DialogContext::Empty => true,
            DialogContext::OrderNumber { .. } => state == DialogState::WaitingOrderNumber,
            DialogContext::ProductQuery { .. } => state == DialogState::WaitingProductQuery,
            DialogContext::StockQuery { .. } => state == DialogState::WaitingStockQuery,
        }
    }
}

/// Who authored a history entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One turn in a conversation's message history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Persistent per-account dialog state plus history.
///
/// At most one Conversation exists per `external_account_id`; it is created
/// only once the account has been linked to a business user and is never
/// deleted by this subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique key from the messaging platform (LINE user id).
    pub external_account_id: String,
    /// The linked business user this account belongs to.
    pub linked_user_id: String,
    pub state: DialogState,
    pub context: DialogContext,
    /// Most recent raw inbound text.
    pub last_inbound: Option<String>,
    /// Ordered, append-only message history.
    pub history: Vec<HistoryEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Creates a fresh idle conversation with empty history and context.
    pub fn new(external_account_id: impl Into<String>, linked_user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            external_account_id: external_account_id.into(),
            linked_user_id: linked_user_id.into(),
            state: DialogState::Idle,
            context: DialogContext::Empty,
            last_inbound: None,
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a turn to the message history in place.
    ///
    /// The caller is responsible for persisting the conversation afterwards.
    pub fn append(&mut self, role: MessageRole, content: impl Into<String>) {
        self.history.push(HistoryEntry {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        });
        self.updated_at = Utc::now();
    }

    /// Records the most recent raw inbound text.
    pub fn note_inbound(&mut self, text: impl Into<String>) {
        self.last_inbound = Some(text.into());
    }

    /// Replaces state and context together within the in-memory object.
    ///
    /// Persistence is a separate explicit save.
    pub fn transition(&mut self, state: DialogState, context: DialogContext) {
        debug_assert!(
            context.agrees_with(state),
            "dialog context {context:?} does not belong to state {state}"
        );
        self.state = state;
        self.context = context;
        self.updated_at = Utc::now();
    }

    /// Drops the oldest history entries so at most `limit` remain.
    pub fn prune_history(&mut self, limit: usize) {
        if self.history.len() > limit {
            let excess = self.history.len() - limit;
            self.history.drain(..excess);
        }
    }
}

/// Per-turn context handed to NLU providers alongside the raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnContext {
    pub state: DialogState,
}

impl TurnContext {
    pub fn new(state: DialogState) -> Self {
        Self { state }
    }
}

/// Well-known entity keys produced by NLU providers.
pub const ENTITY_ORDER_NUMBER: &str = "order_number";
pub const ENTITY_PRODUCT_NAME: &str = "product_name";
pub const ENTITY_CATEGORY_NAME: &str = "category_name";

/// The result of classifying one user message.
///
/// Always fully populated before reaching the dispatcher: providers return a
/// loose payload and the NLU layer defaults any missing field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NluResult {
    /// Classified intent name; unmapped names dispatch as `unclear`.
    pub intent: String,
    /// Classification confidence in `[0, 1]`.
    pub confidence: f32,
    /// Named values extracted from the text supporting the intent.
    pub entities: BTreeMap<String, String>,
    /// Provider-suggested reply text for intents answered verbatim.
    pub message: String,
}

impl NluResult {
    pub fn order_number(&self) -> Option<&str> {
        self.entities.get(ENTITY_ORDER_NUMBER).map(String::as_str)
    }

    pub fn product_name(&self) -> Option<&str> {
        self.entities.get(ENTITY_PRODUCT_NAME).map(String::as_str)
    }

    pub fn category_name(&self) -> Option<&str> {
        self.entities.get(ENTITY_CATEGORY_NAME).map(String::as_str)
    }
}

/// Intents the dispatcher understands.
///
/// NLU providers emit intent names as strings; parsing happens at dispatch
/// time and anything unrecognized behaves as [`Intent::Unclear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Intent {
    QueryOrder,
    QueryProduct,
    QueryStock,
    Greeting,
    GetHelp,
    ContactSupport,
    GetLineUserId,
    Unclear,
}

impl Intent {
    /// Parses an intent name, mapping anything unrecognized to `Unclear`.
    pub fn parse(name: &str) -> Self {
        name.parse().unwrap_or(Intent::Unclear)
    }
}

/// Order lifecycle states.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Completed,
    Paid,
    Cancelled,
}

impl OrderStatus {
    /// Human-readable status label shown in chat replies.
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "待處理",
            OrderStatus::Processing => "處理中",
            OrderStatus::Shipped => "已出貨",
            OrderStatus::Completed => "已完成",
            OrderStatus::Paid => "已付款",
            OrderStatus::Cancelled => "已取消",
        }
    }
}

/// One line item on an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    /// Unit noun for display; defaults to 件 when absent.
    pub unit: Option<String>,
    pub price: i64,
}

/// Dealer contact data resolved alongside an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dealer {
    pub company_name: String,
    pub contact_name: String,
    pub email: String,
}

/// A read-only view of an order, resolved with dealer and line-item data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_number: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
    pub total_amount: i64,
    pub dealer: Dealer,
}

/// A read-only view of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub sku: String,
    pub price: i64,
    pub stock_quantity: u32,
    pub category_name: Option<String>,
}

/// A business user found by external account id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedUser {
    pub id: String,
    pub name: String,
}

/// A single-use, synchronous handle for answering one inbound event.
///
/// Not `Clone` on purpose: the token is consumed by value when the reply is
/// sent, so it cannot be stored and reused after the turn that received it.
#[derive(Debug, PartialEq, Eq)]
pub struct ReplyToken(String);

impl ReplyToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Consumes the token, yielding the raw value for the wire call.
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// An outbound message item in the messaging platform's wire shape.
///
/// `Text` is all the core logic produces; the richer variants are carried
/// for notification templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    Text {
        text: String,
    },
    Image {
        #[serde(rename = "originalContentUrl")]
        original_content_url: String,
        #[serde(rename = "previewImageUrl")]
        preview_image_url: String,
    },
    Flex {
        #[serde(rename = "altText")]
        alt_text: String,
        contents: serde_json::Value,
    },
    Template {
        #[serde(rename = "altText")]
        alt_text: String,
        template: serde_json::Value,
    },
}

impl OutboundMessage {
    /// Builds a plain text message item.
    pub fn text(text: impl Into<String>) -> Self {
        OutboundMessage::Text { text: text.into() }
    }
}
