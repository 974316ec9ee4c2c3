use crate::domain::stores::key_value::KeyValueStore;
use anyhow::{Error, anyhow};
use std::collections::HashMap;
use std::sync::Mutex;

/// Non-durable store, used for ephemeral runs and tests.
#[derive(Default)]
pub struct InMemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(key: &str, value: &str) -> Self {
        let store = Self::default();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        store
    }
}

impl KeyValueStore for InMemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, Error> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), Error> {
        self.entries
            .lock()
            .map_err(|_| anyhow!("store lock poisoned"))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
