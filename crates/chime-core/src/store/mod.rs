//! Typed key-value store abstraction.
//!
//! The store owns no interpretation of keys; see [`crate::keys`] for the
//! namespace. Backends only implement the three untyped primitives and get
//! the typed accessors for free. A typed read of a key holding a value of a
//! different type yields `None`, never an error.

use serde::{Deserialize, Serialize};

use crate::error::{ChimeError, Result};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A single stored value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    StringArray(Vec<String>),
}

impl StoreValue {
    /// Rejects values no backend can store and read back unchanged.
    pub fn check_storable(&self, key: &str) -> Result<()> {
        match self {
            StoreValue::Double(value) if !value.is_finite() => Err(ChimeError::invalid_input(key)
                .with_reason(format!("Non-finite double {value} cannot be stored"))),
            _ => Ok(()),
        }
    }
}

/// Flat key-value persistence consumed by the chain repository.
pub trait KeyValueStore {
    /// Reads the raw value stored under `key`.
    fn get_value(&self, key: &str) -> Result<Option<StoreValue>>;

    /// Unconditionally overwrites `key`.
    fn set_value(&mut self, key: &str, value: StoreValue) -> Result<()>;

    /// Removes `key`. Removing an absent key is a no-op.
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Starts a group of writes that should land together. Backends without
    /// transactions ignore it.
    fn begin_batch(&mut self) -> Result<()> {
        Ok(())
    }

    /// Commits the writes started with [`KeyValueStore::begin_batch`].
    fn commit_batch(&mut self) -> Result<()> {
        Ok(())
    }

    /// Discards the writes started with [`KeyValueStore::begin_batch`].
    fn rollback_batch(&mut self) -> Result<()> {
        Ok(())
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        Ok(match self.get_value(key)? {
            Some(StoreValue::Bool(value)) => Some(value),
            _ => None,
        })
    }

    fn get_int(&self, key: &str) -> Result<Option<i64>> {
        Ok(match self.get_value(key)? {
            Some(StoreValue::Int(value)) => Some(value),
            _ => None,
        })
    }

    fn get_double(&self, key: &str) -> Result<Option<f64>> {
        Ok(match self.get_value(key)? {
            Some(StoreValue::Double(value)) => Some(value),
            _ => None,
        })
    }

    fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(match self.get_value(key)? {
            Some(StoreValue::String(value)) => Some(value),
            _ => None,
        })
    }

    fn get_string_array(&self, key: &str) -> Result<Option<Vec<String>>> {
        Ok(match self.get_value(key)? {
            Some(StoreValue::StringArray(value)) => Some(value),
            _ => None,
        })
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<()> {
        self.set_value(key, StoreValue::Bool(value))
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<()> {
        self.set_value(key, StoreValue::Int(value))
    }

    fn set_double(&mut self, key: &str, value: f64) -> Result<()> {
        self.set_value(key, StoreValue::Double(value))
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_value(key, StoreValue::String(value.to_string()))
    }

    fn set_string_array(&mut self, key: &str, value: &[String]) -> Result<()> {
        self.set_value(key, StoreValue::StringArray(value.to_vec()))
    }
}
