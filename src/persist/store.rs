use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Opaque durable string key/value store. Writes are synchronous and
/// failures are swallowed by the backend (logged, never propagated), so
/// callers can persist from shutdown paths without error plumbing.
pub trait StateStore {
    fn load(&self, key: &str) -> Option<String>;
    fn store(&mut self, key: &str, value: &str);
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn store(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// File-backed store: one JSON object of string → string, flushed on every
/// write. A missing or unreadable file simply starts empty.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = Self::read_existing(&path).unwrap_or_default();
        Self { path, values }
    }

    /// `<data dir>/mallet/state.json`, when the platform reports a data
    /// directory at all.
    pub fn default_location() -> Option<PathBuf> {
        Some(dirs::data_dir()?.join("mallet").join("state.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_existing(path: &Path) -> Option<HashMap<String, String>> {
        let text = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str(&text) {
            Ok(values) => Some(values),
            Err(error) => {
                log::warn!("store: ignoring malformed {}: {error}", path.display());
                None
            }
        }
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let text = serde_json::to_string(&self.values).context("encoding state")?;
        std::fs::write(&self.path, text)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

impl StateStore for FileStore {
    fn load(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn store(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        if let Err(error) = self.flush() {
            log::debug!("store: write failed: {error:#}");
        }
    }
}
