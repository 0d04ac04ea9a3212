//! Key-value persistence
//!
//! The games only ever store small JSON documents under fixed keys. On the
//! web that is `window.localStorage`; natively and in tests it is an
//! in-memory map.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,
    #[error("storage access failed: {0}")]
    Access(String),
    #[error("stored data is malformed: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// String store keyed by name
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Read and decode a JSON document. A missing key is `Ok(None)`.
    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>
    where
        Self: Sized,
    {
        match self.get(key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn save_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()>
    where
        Self: Sized,
    {
        let json = serde_json::to_string(value)?;
        self.set(key, &json)
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStore;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{KeyValueStore, Result, StorageError};

    /// `window.localStorage`
    pub struct LocalStore {
        storage: web_sys::Storage,
    }

    impl LocalStore {
        /// Fails in private modes and sandboxed frames that deny storage
        pub fn open() -> Result<Self> {
            let storage = web_sys::window()
                .ok_or(StorageError::Unavailable)?
                .local_storage()
                .map_err(|e| StorageError::Access(format!("{:?}", e)))?
                .ok_or(StorageError::Unavailable)?;
            Ok(Self { storage })
        }
    }

    impl KeyValueStore for LocalStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.storage
                .get_item(key)
                .map_err(|e| StorageError::Access(format!("{:?}", e)))
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            self.storage
                .set_item(key, value)
                .map_err(|e| StorageError::Access(format!("{:?}", e)))
        }

        fn remove(&mut self, key: &str) -> Result<()> {
            self.storage
                .remove_item(key)
                .map_err(|e| StorageError::Access(format!("{:?}", e)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_json_helpers() {
        let mut store = MemoryStore::new();
        store.save_json("list", &vec![1u32, 2, 3]).unwrap();
        let list: Option<Vec<u32>> = store.load_json("list").unwrap();
        assert_eq!(list, Some(vec![1, 2, 3]));

        let missing: Option<Vec<u32>> = store.load_json("nope").unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn test_malformed_json_is_serde_error() {
        let mut store = MemoryStore::new();
        store.set("list", "{not json").unwrap();
        let result: Result<Option<Vec<u32>>> = store.load_json("list");
        assert!(matches!(result, Err(StorageError::Serde(_))));
    }
}
