//! SQLite database connection management for the pinboard.
//!
//! Provides the [`Database`] struct that wraps a `rusqlite::Connection`,
//! runs schema migrations on open and exposes the key-value document store
//! the board and its settings are persisted in.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use super::migrations;
use crate::types::errors::StorageError;

/// A persisted document row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub body: String,
    pub schema_version: u32,
    pub updated_at: i64,
}

/// Core database wrapper providing SQLite connection management.
///
/// The connection sits behind a `Mutex` so the database can be shared through
/// an `Arc` between the board manager and the settings engine.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Opens (or creates) a SQLite database at the given file path and runs migrations.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` if the connection cannot be established or migrations fail.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        Self::with_connection(conn)
    }

    /// Opens an in-memory SQLite database and runs migrations.
    ///
    /// Useful for testing; the database is discarded when the `Database` is dropped.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, rusqlite::Error> {
        migrations::run_all(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Runs `f` with exclusive access to the underlying connection.
    pub fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, rusqlite::Error>,
    ) -> Result<T, StorageError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StorageError::Database(format!("connection lock poisoned: {}", e)))?;
        f(&conn).map_err(StorageError::from)
    }

    /// Reads the document stored under `key`, if any.
    pub fn get_document(&self, key: &str) -> Result<Option<StoredDocument>, StorageError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT body, schema_version, updated_at FROM documents WHERE key = ?1",
                params![key],
                |row| {
                    Ok(StoredDocument {
                        body: row.get(0)?,
                        schema_version: row.get(1)?,
                        updated_at: row.get(2)?,
                    })
                },
            )
            .optional()
        })
    }

    /// Replaces the document stored under `key` in a single statement.
    pub fn put_document(&self, key: &str, body: &str, schema_version: u32) -> Result<(), StorageError> {
        let now = chrono::Utc::now().timestamp();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO documents (key, body, schema_version, updated_at) VALUES (?1, ?2, ?3, ?4)",
                params![key, body, schema_version, now],
            )
            .map(|_| ())
        })
    }

    /// Removes the document stored under `key`. Missing keys are not an error.
    pub fn delete_document(&self, key: &str) -> Result<(), StorageError> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM documents WHERE key = ?1", params![key])
                .map(|_| ())
        })
    }
}
