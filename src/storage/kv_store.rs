//! Asynchronous key-value store boundary.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::types::errors::StoreError;

/// Trait defining the asynchronous key-value backend the rule store writes
/// through.
///
/// Every operation is best-effort and independent; there are no transactions
/// across keys, and concurrent read-modify-write sequences against the same
/// key resolve as last-write-wins.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads a key; `Ok(None)` when unset.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    /// Writes a key, replacing any previous value.
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
    /// Removes a key; removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
    /// Removes every key.
    async fn clear(&self) -> Result<(), StoreError>;
    /// All present keys, in no particular order.
    async fn keys(&self) -> Result<Vec<String>, StoreError>;

    /// Removes several keys; each removal is independent and best-effort.
    async fn remove_many(&self, keys: &[String]) -> Result<(), StoreError> {
        for key in keys {
            self.remove(key).await?;
        }
        Ok(())
    }
}

/// In-memory store: a `HashMap` behind a mutex.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned() -> StoreError {
    StoreError::Backend("store mutex poisoned".to_string())
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let entries = self.entries.lock().map_err(|_| lock_poisoned())?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| lock_poisoned())?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| lock_poisoned())?;
        entries.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| lock_poisoned())?;
        entries.clear();
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| lock_poisoned())?;
        Ok(entries.keys().cloned().collect())
    }
}
