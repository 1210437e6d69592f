use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::StorageError;

/// A string key-value slot store, shaped after `window.localStorage`.
pub trait StorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Browser local storage.
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    pub fn open() -> Result<Self, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        match window.local_storage() {
            Ok(Some(storage)) => Ok(Self { storage }),
            Ok(None) => Err(StorageError::Unavailable("localStorage is disabled".to_string())),
            Err(e) => Err(StorageError::Unavailable(format!("{:?}", e))),
        }
    }
}

impl StorageBackend for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key).map_err(|e| StorageError::Read {
            key: key.to_string(),
            reason: format!("{:?}", e),
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // Quota errors surface here.
        self.storage.set_item(key, value).map_err(|e| StorageError::Write {
            key: key.to_string(),
            reason: format!("{:?}", e),
        })
    }
}

/// In-memory slots. Clones share the same map, so a test can keep a handle
/// while the store owns another, and a "fresh page" can reopen the same data.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    slots: Rc<RefCell<HashMap<String, String>>>,
    fail_writes: Rc<Cell<bool>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }

    pub fn put_raw(&self, key: &str, value: &str) {
        self.slots.borrow_mut().insert(key.to_string(), value.to_string());
    }

    /// Makes every following write fail, like a full quota.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::Write {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            });
        }
        self.put_raw(key, value);
        Ok(())
    }
}

/// Local storage when the browser offers it, otherwise a session-only map.
pub fn open_browser_storage() -> Box<dyn StorageBackend> {
    match LocalStorage::open() {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            log::error!("{}; tasks will not survive a reload", e);
            Box::new(MemoryStorage::new())
        }
    }
}
