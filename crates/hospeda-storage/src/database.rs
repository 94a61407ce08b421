// SPDX-FileCopyrightText: 2026 Hospeda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All access goes through tokio-rusqlite's single background thread, which
//! serializes writes. Do NOT create additional Connection instances for
//! writes: the `Database` struct IS the single writer, and query modules
//! accept `&Database` and call through `connection().call()`.

use hospeda_core::HospedaError;
use tracing::debug;

use crate::migrations;

/// Handle to the SQLite database, wrapping one `tokio_rusqlite::Connection`.
///
/// Opening runs PRAGMA setup and all pending migrations.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

/// Convert a tokio-rusqlite error into `HospedaError::Storage`.
pub(crate) fn map_tr_err<E>(e: tokio_rusqlite::Error<E>) -> HospedaError
where
    E: std::error::Error + Send + Sync + 'static,
{
    HospedaError::Storage { source: Box::new(e) }
}

impl Database {
    /// Open (or create) the database at `path` with WAL mode enabled.
    pub async fn open(path: &str) -> Result<Self, HospedaError> {
        Self::open_with_options(path, true).await
    }

    /// Open (or create) the database at `path`, optionally enabling WAL mode.
    pub async fn open_with_options(path: &str, wal_mode: bool) -> Result<Self, HospedaError> {
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(HospedaError::storage)?;

        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")?;
            }
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(|conn| migrations::run_migrations(conn))
            .await
            .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened and migrated");
        Ok(Self { conn })
    }

    /// Access the underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL and release the connection.
    pub async fn close(&self) -> Result<(), HospedaError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}
