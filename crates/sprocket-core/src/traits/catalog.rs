// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only lookups against the business catalog.
//!
//! These are the only data collaborators the dispatcher consults; it never
//! writes through them.

use async_trait::async_trait;

use crate::error::SprocketError;
use crate::types::{Order, Product};

/// Exact-match order lookup by order number, resolved with dealer and
/// line-item data.
#[async_trait]
pub trait OrderLookup: Send + Sync {
    async fn order_by_number(&self, order_number: &str)
    -> Result<Option<Order>, SprocketError>;
}

/// Product search by name.
#[async_trait]
pub trait ProductLookup: Send + Sync {
    /// Case-insensitive substring match on product name, capped at `limit`.
    async fn search_products(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Product>, SprocketError>;

    /// Single best match for a stock query.
    async fn product_by_name(&self, query: &str) -> Result<Option<Product>, SprocketError>;
}
