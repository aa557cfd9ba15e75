//! PageTrim storage layer.
//!
//! Rules persist through a simple per-key asynchronous store: JSON values
//! under flat string keys. [`MemoryStore`] backs tests and throwaway
//! sessions; [`SqliteStore`] is the durable backend.

pub mod kv_store;
pub mod sqlite_store;

pub use kv_store::{KeyValueStore, MemoryStore};
pub use sqlite_store::SqliteStore;
