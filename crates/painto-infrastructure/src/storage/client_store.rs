//! File-backed client-local storage.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use painto_core::error::{PaintoError, Result};
use painto_core::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::atomic_toml::AtomicTomlFile;
use crate::paths::PaintoPaths;

/// On-disk document: a flat string map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ClientState {
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// [`KeyValueStore`] persisted to `client_state.toml`.
///
/// The document is read once on construction and cached; every write goes
/// through a locked read-modify-write on a blocking thread, then refreshes
/// the cache from what was written.
#[derive(Clone)]
pub struct TomlClientStore {
    cache: Arc<Mutex<BTreeMap<String, String>>>,
    file: Arc<AtomicTomlFile<ClientState>>,
}

impl TomlClientStore {
    /// Opens the store at the default platform location.
    pub async fn new() -> Result<Self> {
        Self::with_path(PaintoPaths::default().client_state_file()?).await
    }

    /// Opens the store at `path`. A missing file starts empty; a corrupt one
    /// is reported.
    pub async fn with_path(path: PathBuf) -> Result<Self> {
        let file = Arc::new(AtomicTomlFile::<ClientState>::new(path));
        let loader = file.clone();
        let initial = tokio::task::spawn_blocking(move || loader.load())
            .await
            .map_err(|e| PaintoError::internal(format!("Failed to join task: {}", e)))??
            .unwrap_or_default();

        tracing::debug!(
            path = %file.path().display(),
            entries = initial.entries.len(),
            "Client state loaded"
        );
        Ok(Self {
            cache: Arc::new(Mutex::new(initial.entries)),
            file,
        })
    }

    async fn write<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>) + Send + 'static,
    {
        // Holding the cache lock across the write keeps cache and file in
        // the same order as callers.
        let mut cache = self.cache.lock().await;
        let file = self.file.clone();
        let saved = tokio::task::spawn_blocking(move || {
            file.update(ClientState::default(), |state| f(&mut state.entries))
        })
        .await
        .map_err(|e| PaintoError::internal(format!("Failed to join task: {}", e)))??;
        *cache = saved.entries;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for TomlClientStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.cache.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let (key, value) = (key.to_string(), value.to_string());
        self.write(move |entries| {
            entries.insert(key, value);
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.write(move |entries| {
            entries.remove(&key);
        })
        .await
    }
}
