use serde::{de::DeserializeOwned, Serialize};

use crate::error::KVError;

/// KVStore provides a small persisted key-value interface.
///
/// Keys follow a namespaced convention: `session:current`, `prefs:theme`, etc.
pub trait KVStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Set a key-value pair, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError>;

    /// Delete a key. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), KVError>;

    /// Scan all keys matching a prefix. Returns sorted (key, value) pairs.
    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError>;
}

/// JSON helpers on top of any `KVStore`.
pub trait KVStoreExt: KVStore {
    /// Read and decode a JSON value.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, KVError> {
        match self.get(key)? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| KVError::Serialization(format!("{key}: {e}"))),
            None => Ok(None),
        }
    }

    /// Encode a value as JSON and store it.
    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), KVError> {
        let bytes = serde_json::to_vec(value)
            .map_err(|e| KVError::Serialization(format!("{key}: {e}")))?;
        self.set(key, &bytes)
    }
}

impl<S: KVStore + ?Sized> KVStoreExt for S {}
