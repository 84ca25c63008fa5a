// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only catalog queries: orders, products, and account linking.
//!
//! The dispatcher only ever reads through these; all writes happen in the
//! record-CRUD collaborators outside this subsystem.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::params;

use sprocket_core::error::SprocketError;
use sprocket_core::traits::{AccountDirectory, OrderLookup, ProductLookup};
use sprocket_core::types::{Dealer, LinkedUser, Order, OrderItem, OrderStatus, Product};

use crate::database::{Database, map_tr_err};

/// Catalog reader backed by the shared SQLite database.
#[derive(Clone)]
pub struct SqliteCatalog {
    db: Database,
}

impl SqliteCatalog {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn corrupt(detail: impl std::fmt::Display) -> SprocketError {
    SprocketError::Storage {
        source: format!("corrupt catalog row: {detail}").into(),
    }
}

fn map_product(row: &rusqlite::Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        sku: row.get(0)?,
        name: row.get(1)?,
        price: row.get(2)?,
        stock_quantity: row.get(3)?,
        category_name: row.get(4)?,
    })
}

#[async_trait]
impl OrderLookup for SqliteCatalog {
    async fn order_by_number(
        &self,
        order_number: &str,
    ) -> Result<Option<Order>, SprocketError> {
        let number = order_number.to_string();
        let row = self
            .db
            .connection()
            .call(move |conn| {
                let header = {
                    let mut stmt = conn.prepare(
                        "SELECT o.order_number, o.status, o.created_at, o.total_amount,
                                u.company_name, u.contact_name, u.email
                         FROM orders o
                         JOIN users u ON u.id = o.dealer_id
                         WHERE o.order_number = ?1",
                    )?;
                    let result = stmt.query_row(params![number], |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, i64>(3)?,
                            row.get::<_, Option<String>>(4)?,
                            row.get::<_, Option<String>>(5)?,
                            row.get::<_, Option<String>>(6)?,
                        ))
                    });
                    match result {
                        Ok(header) => header,
                        Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                        Err(e) => return Err(e.into()),
                    }
                };

                let mut stmt = conn.prepare(
                    "SELECT name, quantity, unit, price
                     FROM order_items WHERE order_number = ?1 ORDER BY rowid",
                )?;
                let rows = stmt.query_map(params![header.0], |row| {
                    Ok(OrderItem {
                        name: row.get(0)?,
                        quantity: row.get(1)?,
                        unit: row.get(2)?,
                        price: row.get(3)?,
                    })
                })?;
                let mut items = Vec::new();
                for row in rows {
                    items.push(row?);
                }

                Ok(Some((header, items)))
            })
            .await
            .map_err(map_tr_err)?;

        let Some(((number, status, created_at, total, company, contact, email), items)) = row
        else {
            return Ok(None);
        };

        Ok(Some(Order {
            order_number: number,
            status: OrderStatus::from_str(&status).map_err(|_| corrupt(&status))?,
            created_at: DateTime::parse_from_rfc3339(&created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| corrupt(e))?,
            items,
            total_amount: total,
            dealer: Dealer {
                company_name: company.unwrap_or_default(),
                contact_name: contact.unwrap_or_default(),
                email: email.unwrap_or_default(),
            },
        }))
    }
}

#[async_trait]
impl ProductLookup for SqliteCatalog {
    async fn search_products(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Product>, SprocketError> {
        let query = query.to_string();
        self.db
            .connection()
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT sku, name, price, stock_quantity, category_name
                     FROM products
                     WHERE name LIKE '%' || ?1 || '%'
                     ORDER BY name
                     LIMIT ?2",
                )?;
                let rows = stmt.query_map(params![query, limit as i64], map_product)?;
                let mut products = Vec::new();
                for row in rows {
                    products.push(row?);
                }
                Ok(products)
            })
            .await
            .map_err(map_tr_err)
    }

    async fn product_by_name(&self, query: &str) -> Result<Option<Product>, SprocketError> {
        let query = query.to_string();
        self.db
            .connection()
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT sku, name, price, stock_quantity, category_name
                     FROM products
                     WHERE name LIKE '%' || ?1 || '%'
                     ORDER BY name
                     LIMIT 1",
                )?;
                let result = stmt.query_row(params![query], map_product);
                match result {
                    Ok(product) => Ok(Some(product)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(map_tr_err)
    }
}

#[async_trait]
impl AccountDirectory for SqliteCatalog {
    async fn linked_user(
        &self,
        external_account_id: &str,
    ) -> Result<Option<LinkedUser>, SprocketError> {
        let id = external_account_id.to_string();
        self.db
            .connection()
            .call(move |conn| {
                let mut stmt =
                    conn.prepare("SELECT id, name FROM users WHERE line_account_id = ?1")?;
                let result = stmt.query_row(params![id], |row| {
                    Ok(LinkedUser {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                });
                match result {
                    Ok(user) => Ok(Some(user)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(map_tr_err)
    }
}
