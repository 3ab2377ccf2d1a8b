//! Key-value storage: the trait the core persists through, plus backends.
//!
//! The contract mirrors browser local storage: string keys, string values,
//! synchronous access. Backends report failures as errors; the scheduler
//! and the search engine decide how to degrade.

mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::rc::Rc;
use std::sync::Arc;

use tracing::info;

use crate::config::PersistenceConfig;
use crate::error::{Result, WordwiseError};

/// Synchronous string key-value store.
pub trait KeyValueStore {
    /// Read a value. `Ok(None)` if the key is absent.
    ///
    /// # Errors
    /// Backend-specific read failures.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write (insert or replace) a value.
    ///
    /// # Errors
    /// Backend-specific write failures, including quota exhaustion.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key. Deleting an absent key is not an error.
    ///
    /// # Errors
    /// Backend-specific write failures.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }
    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }
    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }
    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }
    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Open the backend named by `config.backend`.
///
/// # Errors
/// Returns [`WordwiseError::Config`] for an unknown backend, or the
/// backend's own error if it fails to open.
pub fn open_store(config: &PersistenceConfig) -> Result<Box<dyn KeyValueStore>> {
    match config.backend.as_str() {
        "memory" => {
            let store = match config.quota_bytes {
                Some(quota) => MemoryStore::with_quota(quota),
                None => MemoryStore::new(),
            };
            info!(quota = ?config.quota_bytes, "Using in-memory store");
            Ok(Box::new(store))
        }
        "sqlite" => Ok(Box::new(SqliteStore::open(&config.path, config)?)),
        other => Err(WordwiseError::Config(format!(
            "unknown persistence backend {other:?} (expected \"memory\" or \"sqlite\")"
        ))),
    }
}
