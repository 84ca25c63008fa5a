// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed conversation store.
//!
//! One row per external account; `context` and `history` are stored as JSON
//! columns, timestamps as RFC 3339 text.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::params;

use sprocket_core::error::SprocketError;
use sprocket_core::traits::ConversationStore;
use sprocket_core::types::{Conversation, DialogContext, DialogState, HistoryEntry};

use crate::database::{Database, map_tr_err};

/// Conversation store backed by the shared SQLite database.
#[derive(Clone)]
pub struct SqliteConversationStore {
    db: Database,
}

impl SqliteConversationStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn corrupt(detail: impl std::fmt::Display) -> SprocketError {
    SprocketError::Storage {
        source: format!("corrupt conversation row: {detail}").into(),
    }
}

/// Raw row shape before JSON/enum decoding.
struct ConversationRow {
    external_account_id: String,
    linked_user_id: String,
    state: String,
    context: String,
    last_inbound: Option<String>,
    history: String,
    created_at: String,
    updated_at: String,
}

fn decode_row(row: ConversationRow) -> Result<Conversation, SprocketError> {
    let state = DialogState::from_str(&row.state).map_err(|_| corrupt(&row.state))?;
    let context: DialogContext =
        serde_json::from_str(&row.context).map_err(|e| corrupt(e))?;
    let history: Vec<HistoryEntry> =
        serde_json::from_str(&row.history).map_err(|e| corrupt(e))?;
    let created_at = parse_timestamp(&row.created_at)?;
    let updated_at = parse_timestamp(&row.updated_at)?;

    Ok(Conversation {
        external_account_id: row.external_account_id,
        linked_user_id: row.linked_user_id,
        state,
        context,
        last_inbound: row.last_inbound,
        history,
        created_at,
        updated_at,
    })
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, SprocketError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| corrupt(e))
}

#[async_trait]
impl ConversationStore for SqliteConversationStore {
    async fn find(
        &self,
        external_account_id: &str,
    ) -> Result<Option<Conversation>, SprocketError> {
        let id = external_account_id.to_string();
        let row = self
            .db
            .connection()
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT external_account_id, linked_user_id, state, context,
                            last_inbound, history, created_at, updated_at
                     FROM conversations WHERE external_account_id = ?1",
                )?;
                let result = stmt.query_row(params![id], |row| {
                    Ok(ConversationRow {
                        external_account_id: row.get(0)?,
                        linked_user_id: row.get(1)?,
                        state: row.get(2)?,
                        context: row.get(3)?,
                        last_inbound: row.get(4)?,
                        history: row.get(5)?,
                        created_at: row.get(6)?,
                        updated_at: row.get(7)?,
                    })
                });
                match result {
                    Ok(row) => Ok(Some(row)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(map_tr_err)?;

        row.map(decode_row).transpose()
    }

    async fn save(&self, conversation: &Conversation) -> Result<(), SprocketError> {
        let external_account_id = conversation.external_account_id.clone();
        let linked_user_id = conversation.linked_user_id.clone();
        let state = conversation.state.to_string();
        let context = serde_json::to_string(&conversation.context).map_err(|e| {
            SprocketError::Storage {
                source: Box::new(e),
            }
        })?;
        let last_inbound = conversation.last_inbound.clone();
        let history = serde_json::to_string(&conversation.history).map_err(|e| {
            SprocketError::Storage {
                source: Box::new(e),
            }
        })?;
        let created_at = conversation.created_at.to_rfc3339();
        let updated_at = conversation.updated_at.to_rfc3339();

        self.db
            .connection()
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO conversations
                         (external_account_id, linked_user_id, state, context,
                          last_inbound, history, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                     ON CONFLICT(external_account_id) DO UPDATE SET
                         linked_user_id = excluded.linked_user_id,
                         state = excluded.state,
                         context = excluded.context,
                         last_inbound = excluded.last_inbound,
                         history = excluded.history,
                         updated_at = excluded.updated_at",
                    params![
                        external_account_id,
                        linked_user_id,
                        state,
                        context,
                        last_inbound,
                        history,
                        created_at,
                        updated_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprocket_core::types::MessageRole;

    async fn setup() -> SqliteConversationStore {
        let db = Database::open_in_memory().await.unwrap();
        SqliteConversationStore::new(db)
    }

    #[tokio::test]
    async fn find_missing_returns_none() {
        let store = setup().await;
        assert!(store.find("U-none").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_and_find_round_trips() {
        let store = setup().await;

        let mut c = Conversation::new("U-1", "user-1");
        c.append(MessageRole::User, "查詢訂單");
        c.append(MessageRole::Assistant, "請提供您的訂單編號");
        c.note_inbound("查詢訂單");
        c.transition(
            DialogState::WaitingOrderNumber,
            DialogContext::OrderNumber { hint: None },
        );

        store.save(&c).await.unwrap();
        let loaded = store.find("U-1").await.unwrap().unwrap();

        assert_eq!(loaded.external_account_id, "U-1");
        assert_eq!(loaded.linked_user_id, "user-1");
        assert_eq!(loaded.state, DialogState::WaitingOrderNumber);
        assert_eq!(loaded.context, DialogContext::OrderNumber { hint: None });
        assert_eq!(loaded.last_inbound.as_deref(), Some("查詢訂單"));
        assert_eq!(loaded.history.len(), 2);
        assert_eq!(loaded.history[0].content, "查詢訂單");
    }

    #[tokio::test]
    async fn save_is_an_upsert() {
        let store = setup().await;

        let mut c = Conversation::new("U-2", "user-2");
        store.save(&c).await.unwrap();

        c.append(MessageRole::User, "你好");
        c.transition(DialogState::Idle, DialogContext::Empty);
        store.save(&c).await.unwrap();

        let loaded = store.find("U-2").await.unwrap().unwrap();
        assert_eq!(loaded.history.len(), 1);
        assert_eq!(loaded.state, DialogState::Idle);
    }

    #[tokio::test]
    async fn one_row_per_account() {
        let store = setup().await;
        let c = Conversation::new("U-3", "user-3");
        store.save(&c).await.unwrap();
        store.save(&c).await.unwrap();

        let count: i64 = store
            .db
            .connection()
            .call(|conn| {
                Ok::<i64, rusqlite::Error>(conn.query_row(
                    "SELECT COUNT(*) FROM conversations WHERE external_account_id = 'U-3'",
                    [],
                    |row| row.get(0),
                )?)
            })
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
