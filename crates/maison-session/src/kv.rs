//! In-memory key-value store with automatic serialization.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{de::DeserializeOwned, Serialize};

use crate::SessionError;

/// Thread-safe key-value store holding JSON-encoded values.
///
/// Values live only as long as the store itself, which matches the lifetime of
/// a browsing session: nothing is written to disk or sent to a server.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value from the store.
    ///
    /// Returns `None` if the key doesn't exist.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SessionError> {
        let entries = self.read()?;
        match entries.get(key) {
            Some(bytes) => Ok(Some(serde_json::from_slice(bytes)?)),
            None => Ok(None),
        }
    }

    /// Set a value in the store, replacing any previous value.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), SessionError> {
        let bytes = serde_json::to_vec(value)?;
        self.write()?.insert(key.to_string(), bytes);
        Ok(())
    }

    /// Delete a value. Deleting a missing key is not an error.
    pub fn delete(&self, key: &str) -> Result<(), SessionError> {
        self.write()?.remove(key);
        Ok(())
    }

    /// Check if a key exists in the store.
    pub fn exists(&self, key: &str) -> Result<bool, SessionError> {
        Ok(self.read()?.contains_key(key))
    }

    /// Get all keys in the store.
    pub fn keys(&self) -> Result<Vec<String>, SessionError> {
        Ok(self.read()?.keys().cloned().collect())
    }

    /// Read, transform and write back one value while holding the write lock.
    ///
    /// `f` receives the current value (if any) and returns the value to store.
    /// No other writer can interleave between the read and the write.
    pub fn modify<T, F>(&self, key: &str, f: F) -> Result<T, SessionError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(Option<T>) -> T,
    {
        let mut entries = self.write()?;
        let current = match entries.get(key) {
            Some(bytes) => Some(serde_json::from_slice(bytes)?),
            None => None,
        };
        let next = f(current);
        entries.insert(key.to_string(), serde_json::to_vec(&next)?);
        Ok(next)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Vec<u8>>>, SessionError> {
        self.entries
            .read()
            .map_err(|_| SessionError::StoreError("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Vec<u8>>>, SessionError> {
        self.entries
            .write()
            .map_err(|_| SessionError::StoreError("store lock poisoned".to_string()))
    }
}
