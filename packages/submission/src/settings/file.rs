//! JSON-file-backed settings store for CLI hosts.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{SettingsError, SettingsResult};
use crate::settings::SettingsStore;

/// Settings persisted as a flat JSON object on disk.
///
/// The file is read once on open and rewritten on every `set`; reads
/// are served from memory, which gives read-your-writes within a
/// session.
pub struct FileSettings {
    path: PathBuf,
    values: RwLock<HashMap<String, String>>,
}

impl FileSettings {
    /// Open a settings file, creating an empty store when the file
    /// does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> SettingsResult<Self> {
        let path = path.into();
        let values = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(storage_error)?,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(error) => return Err(storage_error(error)),
        };
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn storage_error(error: impl std::error::Error + Send + Sync + 'static) -> SettingsError {
    SettingsError::Storage(Box::new(error))
}

#[async_trait]
impl SettingsStore for FileSettings {
    async fn get(&self, keys: &[&str]) -> SettingsResult<HashMap<String, String>> {
        let values = self.values.read().unwrap();
        Ok(keys
            .iter()
            .filter_map(|key| values.get(*key).map(|value| ((*key).to_string(), value.clone())))
            .collect())
    }

    async fn set(&self, values: HashMap<String, String>) -> SettingsResult<()> {
        let snapshot = {
            let mut guard = self.values.write().unwrap();
            guard.extend(values);
            guard.clone()
        };
        let bytes = serde_json::to_vec_pretty(&snapshot).map_err(storage_error)?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(storage_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        {
            let store = FileSettings::open(&path).await.unwrap();
            store
                .set(HashMap::from([("pub_id".to_string(), "42".to_string())]))
                .await
                .unwrap();
        }

        let reopened = FileSettings::open(&path).await.unwrap();
        let values = reopened.get(&["pub_id"]).await.unwrap();
        assert_eq!(values["pub_id"], "42");
    }

    #[tokio::test]
    async fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettings::open(dir.path().join("absent.json"))
            .await
            .unwrap();
        assert!(store.get(&["pub_id"]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        tokio::fs::write(&path, b"not json").await.unwrap();

        assert!(matches!(
            FileSettings::open(&path).await,
            Err(SettingsError::Storage(_))
        ));
    }
}
