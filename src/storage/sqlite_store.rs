//! SQLite-backed key-value store.
//!
//! One `kv_entries` table maps keys to JSON text. The schema is created on
//! open with `CREATE TABLE IF NOT EXISTS`, so opening is idempotent.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::Value;

use super::kv_store::KeyValueStore;
use crate::platform;
use crate::types::errors::StoreError;

/// Durable key-value store on top of a single SQLite table.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the store at the given file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)
            .map_err(|e| StoreError::Backend(format!("Failed to open store: {}", e)))?;
        Self::from_connection(conn)
    }

    /// Opens an in-memory store, discarded on drop. Useful for testing.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Backend(format!("Failed to open store: {}", e)))?;
        Self::from_connection(conn)
    }

    /// Opens the store at the default location: `$PAGETRIM_DATA_DIR` when
    /// set, otherwise the platform data directory.
    pub fn open_default() -> Result<Self, StoreError> {
        let dir = match std::env::var("PAGETRIM_DATA_DIR") {
            Ok(dir) => std::path::PathBuf::from(dir),
            Err(_) => platform::get_data_dir(),
        };
        std::fs::create_dir_all(&dir)
            .map_err(|e| StoreError::Backend(format!("Failed to create data directory: {}", e)))?;
        Self::open(dir.join("pagetrim.db"))
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv_entries (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )
        .map_err(|e| StoreError::Backend(format!("Failed to run migrations: {}", e)))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Backend("store mutex poisoned".to_string()))
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let conn = self.lock()?;
        let result = conn.query_row(
            "SELECT value FROM kv_entries WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );
        match result {
            Ok(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| StoreError::Serialization(format!("Corrupt value for {}: {}", key, e))),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Backend(e.to_string())),
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let text = serde_json::to_string(&value)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO kv_entries (key, value) VALUES (?1, ?2)",
            params![key, text],
        )
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM kv_entries WHERE key = ?1", params![key])
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM kv_entries", [])
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT key FROM kv_entries")
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        rows.collect::<Result<Vec<String>, _>>()
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}
