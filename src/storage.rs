//! Key-value persistence used by the cart.
//!
//! `KeyValueStore` mirrors the small surface the storefront needs
//! (get/set/remove a string under a key). `FileStore` keeps one JSON file per
//! key inside the data directory; `MemoryStore` backs tests.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
    #[error("storage i/o failed for {key:?}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// String key-value persistence.
pub trait KeyValueStore {
    /// Read the value stored under `key`. Absence is `Ok(None)`.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Replace the value stored under `key`.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Delete `key`. Deleting a missing key succeeds.
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Keys end up as file names, so only a conservative alphabet is accepted.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let ok = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests;
