use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

pub type Entries = BTreeMap<String, Value>;

pub mod keys {
    pub const PROFILE: &str = "instagram_profile";
    pub const CALENDAR_EVENTS: &str = "calendar_events";
    pub const CHAT_MESSAGES: &str = "chat_messages";
    pub const THEME: &str = "theme";
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read store {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write store {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse store: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("failed to encode store: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to serialize value for {key}: {source}")]
    Serialize {
        key: String,
        source: serde_json::Error,
    },
}

pub trait StorageBackend: Send + Sync {
    fn load(&self) -> impl Future<Output = Result<Entries, StoreError>> + Send;
    fn persist(&self, entries: &Entries) -> impl Future<Output = Result<(), StoreError>> + Send;
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<Entries>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Entries) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }

    pub async fn snapshot(&self) -> Entries {
        self.entries.lock().await.clone()
    }
}

impl StorageBackend for MemoryBackend {
    async fn load(&self) -> Result<Entries, StoreError> {
        Ok(self.entries.lock().await.clone())
    }

    async fn persist(&self, entries: &Entries) -> Result<(), StoreError> {
        *self.entries.lock().await = entries.clone();
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for FileBackend {
    async fn load(&self) -> Result<Entries, StoreError> {
        if !self.path.exists() {
            return Ok(Entries::new());
        }
        let data = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| StoreError::Read {
                path: self.path.clone(),
                source,
            })?;
        if data.trim().is_empty() {
            return Ok(Entries::new());
        }
        serde_json::from_str(&data).map_err(StoreError::Parse)
    }

    async fn persist(&self, entries: &Entries) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
            }
        }
        let payload = serde_json::to_string_pretty(entries).map_err(StoreError::Encode)?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, payload)
            .await
            .map_err(write_err)?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(write_err)?;
        Ok(())
    }
}

pub struct KvStore<B> {
    backend: B,
    entries: RwLock<Entries>,
}

impl<B: StorageBackend> KvStore<B> {
    pub async fn open(backend: B) -> Result<Self, StoreError> {
        let entries = backend.load().await?;
        debug!(keys = entries.len(), "opened store");
        Ok(Self {
            backend,
            entries: RwLock::new(entries),
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let guard = self.entries.read().await;
        let Some(value) = guard.get(key) else {
            return default;
        };
        match <T as Deserialize>::deserialize(value) {
            Ok(decoded) => decoded,
            Err(err) => {
                warn!(key, error = %err, "stored value does not decode, using default");
                default
            }
        }
    }

    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let encoded = serde_json::to_value(value).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;
        let mut guard = self.entries.write().await;
        let mut next = guard.clone();
        next.insert(key.to_string(), encoded);
        self.backend.persist(&next).await?;
        *guard = next;
        debug!(key, "persisted store entry");
        Ok(())
    }

    pub async fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let mut guard = self.entries.write().await;
        if !guard.contains_key(key) {
            return Ok(false);
        }
        let mut next = guard.clone();
        next.remove(key);
        self.backend.persist(&next).await?;
        *guard = next;
        Ok(true)
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

pub async fn toggle_dark_mode<B: StorageBackend>(store: &KvStore<B>) -> Result<bool, StoreError> {
    let dark = !store.get(keys::THEME, true).await;
    store.set(keys::THEME, &dark).await?;
    Ok(dark)
}
