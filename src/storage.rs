use crate::errors::AppError;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs;
use tracing::{error, warn};

pub const REMINDERS_KEY: &str = "reminders";
pub const THEME_KEY: &str = "theme";

/// String-keyed, string-valued store persisted as one JSON object file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalStorage {
    items: BTreeMap<String, String>,
}

impl LocalStorage {
    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    pub fn set_item(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.items.insert(key.into(), value.into());
    }

    pub fn remove_item(&mut self, key: &str) -> Option<String> {
        self.items.remove(key)
    }
}

/// Reads the store from disk. A missing or malformed file yields an empty
/// store; storage problems never stop startup.
pub async fn load_storage(path: &Path) -> LocalStorage {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(items) => LocalStorage { items },
            Err(err) => {
                warn!("failed to parse storage file {}: {err}", path.display());
                LocalStorage::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => LocalStorage::default(),
        Err(err) => {
            error!("failed to read storage file {}: {err}", path.display());
            LocalStorage::default()
        }
    }
}

pub async fn persist_storage(path: &Path, storage: &LocalStorage) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(&storage.items).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(|err| {
        error!("failed to write storage file {}: {err}", path.display());
        AppError::internal(err)
    })?;
    Ok(())
}

pub async fn ensure_parent_dir(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    Ok(())
}
