//! SQLite-backed key-value store.

use std::{path::Path, time::Duration};

use jiff::Timestamp;
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};

use super::{KeyValueStore, StoreValue};
use crate::error::{ChimeError, DatabaseResultExt, Result};

const SELECT_VALUE_SQL: &str = "SELECT value FROM kv WHERE key = ?1";
const UPSERT_VALUE_SQL: &str = "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3) \
     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";
const DELETE_VALUE_SQL: &str = "DELETE FROM kv WHERE key = ?1";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Key-value store persisted in a single SQLite table.
pub struct SqliteStore {
    connection: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database file and initializes the schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .db_context("Failed to set busy timeout")?;
        let store = Self { connection };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Creates a private in-memory database.
    pub fn in_memory() -> Result<Self> {
        let connection =
            Connection::open_in_memory().db_context("Failed to open in-memory database")?;
        let store = Self { connection };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<()> {
        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")
    }
}

impl KeyValueStore for SqliteStore {
    fn get_value(&self, key: &str) -> Result<Option<StoreValue>> {
        let raw: Option<String> = self
            .connection
            .query_row(SELECT_VALUE_SQL, params![key], |row| row.get(0))
            .optional()
            .db_context("Failed to read value")?;

        let Some(json) = raw else {
            return Ok(None);
        };
        match serde_json::from_str(&json) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Ignoring undecodable value under '{key}': {e}");
                Ok(None)
            }
        }
    }

    fn set_value(&mut self, key: &str, value: StoreValue) -> Result<()> {
        value.check_storable(key)?;
        let json = serde_json::to_string(&value)?;
        self.connection
            .execute(
                UPSERT_VALUE_SQL,
                params![key, json, Timestamp::now().to_string()],
            )
            .db_context("Failed to write value")?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.connection
            .execute(DELETE_VALUE_SQL, params![key])
            .db_context("Failed to remove value")?;
        Ok(())
    }

    fn begin_batch(&mut self) -> Result<()> {
        if !self.connection.is_autocommit() {
            return Err(ChimeError::Configuration {
                message: "A write batch is already open".to_string(),
            });
        }
        self.connection
            .execute_batch("BEGIN IMMEDIATE")
            .db_context("Failed to begin transaction")
    }

    fn commit_batch(&mut self) -> Result<()> {
        self.connection
            .execute_batch("COMMIT")
            .db_context("Failed to commit transaction")
    }

    fn rollback_batch(&mut self) -> Result<()> {
        self.connection
            .execute_batch("ROLLBACK")
            .db_context("Failed to roll back transaction")
    }
}
