// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use tokio_rusqlite::Connection;
use tracing::debug;

use sprocket_core::error::SprocketError;

use crate::migrations;

/// Maps a tokio-rusqlite error into the storage error variant.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error) -> SprocketError {
    SprocketError::Storage {
        source: Box::new(e),
    }
}

/// Maps a rusqlite error into the storage error variant.
///
/// `Connection::open`/`open_in_memory` surface `rusqlite::Error` directly
/// (not wrapped in `tokio_rusqlite::Error`), so they need their own mapper.
pub(crate) fn map_rs_err(e: rusqlite::Error) -> SprocketError {
    SprocketError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the SQLite database.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (creating if necessary) the database at `path`, applies
    /// PRAGMAs, and runs pending migrations.
    pub async fn open(path: &str) -> Result<Self, SprocketError> {
        let conn = Connection::open(path).await.map_err(map_rs_err)?;

        conn.call(|conn| {
            // journal_mode reports the resulting mode as a row; read it so
            // the statement is not treated as a failed update.
            let _mode: String =
                conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        migrations::apply(&conn).await?;
        debug!(path, "database opened");

        Ok(Self { conn })
    }

    /// Opens an in-memory database (tests and ephemeral runs).
    pub async fn open_in_memory() -> Result<Self, SprocketError> {
        let conn = Connection::open_in_memory().await.map_err(map_rs_err)?;
        conn.call(|conn| {
            conn.pragma_update(None, "foreign_keys", "ON")?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
        migrations::apply(&conn).await?;
        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Closes the background connection thread.
    pub async fn close(self) -> Result<(), SprocketError> {
        self.conn.close().await.map_err(map_tr_err)
    }
}
