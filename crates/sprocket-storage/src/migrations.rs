// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations, versioned via the `user_version` pragma.

use tokio_rusqlite::Connection;
use tracing::info;

use sprocket_core::error::SprocketError;

use crate::database::map_tr_err;

/// Ordered migration steps; index + 1 is the resulting `user_version`.
const MIGRATIONS: &[&str] = &[
    // v1: conversations + catalog tables
    "CREATE TABLE IF NOT EXISTS conversations (
         external_account_id TEXT PRIMARY KEY,
         linked_user_id      TEXT NOT NULL,
         state               TEXT NOT NULL,
         context             TEXT NOT NULL,
         last_inbound        TEXT,
         history             TEXT NOT NULL,
         created_at          TEXT NOT NULL,
         updated_at          TEXT NOT NULL
     );

     CREATE TABLE IF NOT EXISTS users (
         id              TEXT PRIMARY KEY,
         name            TEXT NOT NULL,
         email           TEXT,
         company_name    TEXT,
         contact_name    TEXT,
         role            TEXT NOT NULL DEFAULT 'dealer',
         line_account_id TEXT UNIQUE
     );

     CREATE TABLE IF NOT EXISTS products (
         sku            TEXT PRIMARY KEY,
         name           TEXT NOT NULL,
         price          INTEGER NOT NULL,
         stock_quantity INTEGER NOT NULL DEFAULT 0,
         category_name  TEXT
     );

     CREATE TABLE IF NOT EXISTS orders (
         order_number TEXT PRIMARY KEY,
         dealer_id    TEXT NOT NULL REFERENCES users(id),
         status       TEXT NOT NULL,
         total_amount INTEGER NOT NULL,
         created_at   TEXT NOT NULL
     );

     CREATE TABLE IF NOT EXISTS order_items (
         order_number TEXT NOT NULL REFERENCES orders(order_number),
         name         TEXT NOT NULL,
         quantity     INTEGER NOT NULL,
         unit         TEXT,
         price        INTEGER NOT NULL
     );
     CREATE INDEX IF NOT EXISTS idx_order_items_order ON order_items(order_number);",
];

/// Applies any migrations newer than the database's `user_version`.
pub async fn apply(conn: &Connection) -> Result<(), SprocketError> {
    conn.call(|conn| {
        let current: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

        for (i, sql) in MIGRATIONS.iter().enumerate() {
            let version = (i + 1) as i64;
            if version > current {
                let tx = conn.transaction()?;
                tx.execute_batch(sql)?;
                tx.pragma_update(None, "user_version", version)?;
                tx.commit()?;
                info!(version, "applied schema migration");
            }
        }
        Ok(())
    })
    .await
    .map_err(map_tr_err)
}
