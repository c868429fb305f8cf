use std::collections::HashMap;
use std::sync::RwLock;

use pulse_application::KeyValueStore;
use pulse_core::{AppError, AppResult};

/// In-memory string key-value store standing in for browser local storage.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|_| AppError::Internal("key-value store lock poisoned".to_owned()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| AppError::Internal("key-value store lock poisoned".to_owned()))?;
        values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pulse_application::KeyValueStore;

    use super::InMemoryKeyValueStore;

    #[test]
    fn set_overwrites_previous_value() {
        let store = InMemoryKeyValueStore::new();

        assert_eq!(store.get("pulse-theme").ok().flatten(), None);
        assert!(store.set("pulse-theme", "navy").is_ok());
        assert!(store.set("pulse-theme", "pink").is_ok());
        assert_eq!(store.get("pulse-theme").ok().flatten(), Some("pink".to_owned()));
    }
}
