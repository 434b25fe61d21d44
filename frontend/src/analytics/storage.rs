use std::cell::RefCell;
use std::collections::HashMap;

use thiserror::Error;

pub const USER_ID_KEY: &str = "clinic_user_id";
pub const JOURNEY_KEY: &str = "clinic_user_journey";
pub const DEBUG_EVENTS_KEY: &str = "clinic_debug_events";
const EXPERIMENT_KEY_PREFIX: &str = "clinic_experiment_";

pub fn experiment_key(experiment_id: &str) -> String {
    format!("{}{}", EXPERIMENT_KEY_PREFIX, experiment_id)
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,
    #[error("storage rejected write for {key}: {reason}")]
    Write { key: String, reason: String },
}

/// String key-value storage. Durable and session scopes are two instances.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// `localStorage` / `sessionStorage` backed store.
pub struct WebStorage {
    storage: web_sys::Storage,
}

impl WebStorage {
    pub fn local() -> Option<Self> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .map(|storage| Self { storage })
    }

    pub fn session() -> Option<Self> {
        web_sys::window()
            .and_then(|w| w.session_storage().ok())
            .flatten()
            .map(|storage| Self { storage })
    }
}

impl KeyValueStore for WebStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|_| StorageError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_and_removes() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k"), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn experiment_keys_are_namespaced() {
        assert_eq!(experiment_key("hero"), "clinic_experiment_hero");
    }
}
