//! `window.localStorage` backend.
//!
//! Values are stored as UTF-8 strings, so only text payloads (the JSON chat
//! history and config) can be written. Quota errors surface from `set`.

use async_trait::async_trait;
use web_sys::Storage;

use lens_core::ports::StoragePort;
use lens_types::{LensError, Result};

pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    /// Grab the window's local storage; fails in private modes that block it.
    pub fn open() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| LensError::Storage("No window object".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| LensError::Storage(format!("{:?}", e)))?
            .ok_or_else(|| LensError::Storage("localStorage not available".to_string()))?;
        Ok(Self { storage })
    }
}

#[async_trait(?Send)]
impl StoragePort for LocalStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self
            .storage
            .get_item(key)
            .map_err(|e| LensError::Storage(format!("{:?}", e)))?;
        Ok(value.map(String::into_bytes))
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let text = std::str::from_utf8(value)
            .map_err(|e| LensError::Storage(format!("value for {} is not UTF-8: {}", key, e)))?;
        self.storage
            .set_item(key, text)
            .map_err(|e| LensError::Storage(format!("{:?}", e)))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| LensError::Storage(format!("{:?}", e)))
    }

    fn backend_name(&self) -> &str {
        "localstorage"
    }
}
