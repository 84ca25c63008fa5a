// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite storage backend for the Sprocket assistant.
//!
//! Provides the durable conversation store plus the read-only catalog
//! queries (orders, products, account linking) the dispatcher consults.
//! All access goes through a single tokio-rusqlite connection whose
//! background thread serializes writes.

pub mod catalog;
pub mod conversations;
pub mod database;
pub mod migrations;

pub use catalog::SqliteCatalog;
pub use conversations::SqliteConversationStore;
pub use database::Database;
