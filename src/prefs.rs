//! Display preference storage.
//!
//! DESIGN
//! ======
//! The dark-mode flag lives in a small key/value store injected by the
//! caller. `FilePreferenceStore` keeps a flat JSON object on disk;
//! `MemoryPreferenceStore` backs tests. The task cache never reads it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::error::PrefsError;

pub const DARK_MODE_KEY: &str = "tasklist_dark";

/// String key/value capability the display preference is persisted through.
pub trait PreferenceStore {
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError>;

    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError>;
}

// =============================================================================
// MEMORY STORE
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryPreferenceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
        let values = self.values.lock().map_err(|_| PrefsError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        let mut values = self.values.lock().map_err(|_| PrefsError::Poisoned)?;
        values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

// =============================================================================
// FILE STORE
// =============================================================================

/// JSON-object file store. A missing file reads as empty; the file and its
/// parent directories are created on first write.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, PrefsError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        let mut values = self.load()?;
        values.insert(key.to_owned(), value.to_owned());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&values)?)?;
        debug!(path = %self.path.display(), key, "preference written");
        Ok(())
    }
}

// =============================================================================
// DARK MODE
// =============================================================================

/// Dark-mode flag over an injected [`PreferenceStore`].
pub struct DarkMode<S> {
    store: S,
}

impl<S: PreferenceStore> DarkMode<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stored preference; `"true"` enables, anything else (or nothing) disables.
    ///
    /// Read failures are logged and treated as disabled.
    pub fn read(&self) -> bool {
        match self.store.get(DARK_MODE_KEY) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                warn!(error = %e, "dark mode preference unreadable; using light mode");
                false
            }
        }
    }

    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    pub fn set(&self, enabled: bool) -> Result<(), PrefsError> {
        self.store.set(DARK_MODE_KEY, if enabled { "true" } else { "false" })
    }

    /// Flip the stored preference and return the new value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    pub fn toggle(&self) -> Result<bool, PrefsError> {
        let next = !self.read();
        self.set(next)?;
        Ok(next)
    }
}

#[cfg(test)]
#[path = "prefs_test.rs"]
mod tests;
