//! Key-value persistence split across logical submodules.
//!
//! The library only ever needs two calls from its storage: read the blob
//! under a key and replace it. Both implementations treat each call as atomic.

mod connection;
mod memory;
mod sqlite;

use thiserror::Error;

pub(crate) use connection::data_dir;
pub use connection::{default_db_path, ensure_schema};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Failures surfaced by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Flat string-to-string storage that outlives the process.
pub trait KeyValueStore {
    /// Return the value stored under `key`, or `None` when nothing was ever
    /// written there.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}
