// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use hangar_core::HangarError;
use tracing::debug;

use crate::schema::apply_schema;

/// Convert a tokio-rusqlite error into HangarError::Storage.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> HangarError {
    HangarError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the catalog database.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database file at `path` and apply the schema.
    pub async fn open(path: &str) -> Result<Self, HangarError> {
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| HangarError::Storage {
                source: Box::new(e),
            })?;
        let db = Self::prepare(conn, true).await?;
        debug!(path = %path, "catalog database opened");
        Ok(db)
    }

    /// Private in-memory database, mostly for tests and `--memory` style runs.
    pub async fn open_in_memory() -> Result<Self, HangarError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| HangarError::Storage {
                source: Box::new(e),
            })?;
        Self::prepare(conn, false).await
    }

    async fn prepare(conn: tokio_rusqlite::Connection, wal: bool) -> Result<Self, HangarError> {
        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            if wal {
                conn.execute_batch("PRAGMA journal_mode = WAL;")?;
            }
            conn.execute_batch(
                "PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;",
            )?;
            apply_schema(conn)
        })
        .await
        .map_err(map_tr_err)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL and close the connection.
    pub async fn close(self) -> Result<(), HangarError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        self.conn.close().await.map_err(map_tr_err)?;
        debug!("catalog database closed");
        Ok(())
    }
}
