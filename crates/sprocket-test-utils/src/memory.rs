// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory store, directory, and catalog fixtures.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::Mutex;

use sprocket_core::error::SprocketError;
use sprocket_core::traits::{AccountDirectory, ConversationStore, OrderLookup, ProductLookup};
use sprocket_core::types::{Conversation, Dealer, LinkedUser, Order, OrderItem, OrderStatus, Product};

/// In-memory conversation store keyed by external account id.
#[derive(Default)]
pub struct MemoryConversationStore {
    conversations: Mutex<HashMap<String, Conversation>>,
}

impl MemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn find(
        &self,
        external_account_id: &str,
    ) -> Result<Option<Conversation>, SprocketError> {
        Ok(self
            .conversations
            .lock()
            .await
            .get(external_account_id)
            .cloned())
    }

    async fn save(&self, conversation: &Conversation) -> Result<(), SprocketError> {
        self.conversations
            .lock()
            .await
            .insert(conversation.external_account_id.clone(), conversation.clone());
        Ok(())
    }
}

/// Static account-linking directory.
#[derive(Default)]
pub struct StaticDirectory {
    links: HashMap<String, LinkedUser>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Links an external account to a business user.
    pub fn link(mut self, external_account_id: &str, user_id: &str, name: &str) -> Self {
        self.links.insert(
            external_account_id.to_string(),
            LinkedUser {
                id: user_id.to_string(),
                name: name.to_string(),
            },
        );
        self
    }
}

#[async_trait]
impl AccountDirectory for StaticDirectory {
    async fn linked_user(
        &self,
        external_account_id: &str,
    ) -> Result<Option<LinkedUser>, SprocketError> {
        Ok(self.links.get(external_account_id).cloned())
    }
}

/// Static read-only catalog with fixture orders and products.
#[derive(Default)]
pub struct StaticCatalog {
    orders: Vec<Order>,
    products: Vec<Product>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog pre-loaded with the standard fixtures.
    pub fn with_fixtures() -> Self {
        Self {
            orders: vec![sample_order()],
            products: chainring_products(),
        }
    }

    pub fn push_order(mut self, order: Order) -> Self {
        self.orders.push(order);
        self
    }

    pub fn push_product(mut self, product: Product) -> Self {
        self.products.push(product);
        self
    }
}

#[async_trait]
impl OrderLookup for StaticCatalog {
    async fn order_by_number(
        &self,
        order_number: &str,
    ) -> Result<Option<Order>, SprocketError> {
        Ok(self
            .orders
            .iter()
            .find(|o| o.order_number == order_number)
            .cloned())
    }
}

#[async_trait]
impl ProductLookup for StaticCatalog {
    async fn search_products(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Product>, SprocketError> {
        let needle = query.to_lowercase();
        let mut matches: Vec<Product> = self
            .products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        matches.truncate(limit);
        Ok(matches)
    }

    async fn product_by_name(&self, query: &str) -> Result<Option<Product>, SprocketError> {
        Ok(self.search_products(query, 1).await?.into_iter().next())
    }
}

/// The standard fixture order: shipped, two line items, resolved dealer.
pub fn sample_order() -> Order {
    Order {
        order_number: "TP2501011234".into(),
        status: OrderStatus::Shipped,
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 10, 30, 0).unwrap(),
        items: vec![
            OrderItem {
                name: "42T 牙盤".into(),
                quantity: 2,
                unit: Some("件".into()),
                price: 1200,
            },
            OrderItem {
                name: "170mm 曲柄".into(),
                quantity: 1,
                unit: None,
                price: 1200,
            },
        ],
        total_amount: 3600,
        dealer: Dealer {
            company_name: "大明車業".into(),
            contact_name: "王小明".into(),
            email: "dealer@example.com".into(),
        },
    }
}

/// Six chainrings (one more than the search cap) plus a crank arm.
pub fn chainring_products() -> Vec<Product> {
    let mut products: Vec<Product> = (0..6u32)
        .map(|i| Product {
            name: format!("{}T 牙盤", 42 + i * 2),
            sku: format!("CR-{:02}", i + 1),
            price: 1200 + i64::from(i) * 100,
            stock_quantity: if i == 1 { 0 } else { 3 + i },
            category_name: Some("傳動系統".into()),
        })
        .collect();
    products.push(Product {
        name: "170mm 曲柄".into(),
        sku: "CK-01".into(),
        price: 2200,
        stock_quantity: 5,
        category_name: Some("傳動系統".into()),
    });
    products
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_round_trips() {
        let store = MemoryConversationStore::new();
        let c = Conversation::new("U-1", "user-1");
        store.save(&c).await.unwrap();
        assert_eq!(store.find("U-1").await.unwrap().unwrap(), c);
        assert!(store.find("U-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn catalog_search_caps_results() {
        let catalog = StaticCatalog::with_fixtures();
        let results = catalog.search_products("牙盤", 5).await.unwrap();
        assert_eq!(results.len(), 5);
        assert!(catalog.search_products("座墊", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn directory_links_resolve() {
        let directory = StaticDirectory::new().link("U-linked", "user-1", "王小明");
        assert!(directory.linked_user("U-linked").await.unwrap().is_some());
        assert!(directory.linked_user("U-other").await.unwrap().is_none());
    }
}
