//! In-memory settings store for tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::SettingsResult;
use crate::settings::SettingsStore;

/// In-memory key-value settings. Data is lost when the process exits.
pub struct MemorySettings {
    values: RwLock<HashMap<String, String>>,
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySettings {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
        }
    }

    /// Copy of everything currently stored.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.values.read().unwrap().clone()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SettingsStore for MemorySettings {
    async fn get(&self, keys: &[&str]) -> SettingsResult<HashMap<String, String>> {
        let values = self.values.read().unwrap();
        Ok(keys
            .iter()
            .filter_map(|key| values.get(*key).map(|value| ((*key).to_string(), value.clone())))
            .collect())
    }

    async fn set(&self, values: HashMap<String, String>) -> SettingsResult<()> {
        self.values.write().unwrap().extend(values);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn absent_keys_are_missing_from_the_result() {
        let store = MemorySettings::new();
        store
            .set(HashMap::from([("a".to_string(), "1".to_string())]))
            .await
            .unwrap();

        let values = store.get(&["a", "b"]).await.unwrap();
        assert_eq!(values.get("a").map(String::as_str), Some("1"));
        assert!(!values.contains_key("b"));
    }

    #[tokio::test]
    async fn set_overwrites_and_extends() {
        let store = MemorySettings::new();
        store
            .set(HashMap::from([("a".to_string(), "1".to_string())]))
            .await
            .unwrap();
        store
            .set(HashMap::from([
                ("a".to_string(), "2".to_string()),
                ("b".to_string(), "3".to_string()),
            ]))
            .await
            .unwrap();

        let values = store.get(&["a", "b"]).await.unwrap();
        assert_eq!(values["a"], "2");
        assert_eq!(values["b"], "3");
    }
}
