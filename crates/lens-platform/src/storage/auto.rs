//! Pick the storage backend named in config.
//!
//! Priority for `Auto`: localStorage → Memory (fallback)

use std::rc::Rc;
use lens_core::ports::StoragePort;
use lens_types::config::StorageBackendType;
use super::{LocalStorage, MemoryStorage};

/// Open the requested backend. A requested but unavailable localStorage
/// degrades to memory with a warning rather than failing startup.
pub fn open_storage(backend: StorageBackendType) -> Rc<dyn StoragePort> {
    match backend {
        StorageBackendType::Memory => {
            log::info!("Storage backend: memory");
            Rc::new(MemoryStorage::new())
        }
        StorageBackendType::Auto | StorageBackendType::LocalStorage => match LocalStorage::open() {
            Ok(local) => {
                log::info!("Storage backend: localStorage");
                Rc::new(local)
            }
            Err(e) => {
                log::warn!("localStorage unavailable ({}), falling back to memory", e);
                Rc::new(MemoryStorage::new())
            }
        },
    }
}
