//! In-memory store used by tests and embedders that persist elsewhere.

use std::collections::HashMap;

use super::{KeyValueStore, StoreValue};
use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, StoreValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns every stored key, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl KeyValueStore for MemoryStore {
    fn get_value(&self, key: &str) -> Result<Option<StoreValue>> {
        Ok(self.values.get(key).cloned())
    }

    fn set_value(&mut self, key: &str, value: StoreValue) -> Result<()> {
        value.check_storable(key)?;
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}
