//! Local site-selection store
//!
//! A tiny persistent string map. The kiosk keeps two keys in it: the
//! selected site id and the fullscreen preference.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const SITE_KEY: &str = "parche_codigo_pv";
pub const FULLSCREEN_KEY: &str = "parche_fullscreen";

/// Name of the store file inside the data directory
pub const STORE_FILE: &str = "kiosk-store.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt store file {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub trait KeyValueStore: Send + std::fmt::Debug {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

// ========== File ==========

/// JSON file backed store, written through on every mutation
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// 从文件加载; a missing file is an empty store
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?
        } else {
            BTreeMap::new()
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "Store opened");
        Ok(Self { path, entries })
    }

    /// Open `<data_dir>/kiosk-store.json`
    pub fn in_dir(data_dir: &Path) -> Result<Self, StoreError> {
        Self::open(data_dir.join(STORE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }
}

// ========== Memory ==========

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

// ========== Site store ==========

/// Typed view over the two kiosk keys
#[derive(Debug)]
pub struct SiteStore {
    inner: Box<dyn KeyValueStore>,
}

impl SiteStore {
    pub fn new(inner: impl KeyValueStore + 'static) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Saved site id; an empty value counts as unconfigured
    pub fn get(&self) -> Option<String> {
        self.inner.get(SITE_KEY).filter(|id| !id.is_empty())
    }

    pub fn set(&mut self, site_id: &str) -> Result<(), StoreError> {
        tracing::info!(site_id, "Site saved");
        self.inner.set(SITE_KEY, site_id)
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        tracing::info!("Saved site cleared");
        self.inner.remove(SITE_KEY)
    }

    /// Only the literal `"true"` enables fullscreen
    pub fn fullscreen_preference(&self) -> bool {
        self.inner.get(FULLSCREEN_KEY).as_deref() == Some("true")
    }

    pub fn set_fullscreen_preference(&mut self, enabled: bool) -> Result<(), StoreError> {
        self.inner
            .set(FULLSCREEN_KEY, if enabled { "true" } else { "false" })
    }
}
