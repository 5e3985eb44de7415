//! Preference storage backends
//!
//! A tiny key-value interface over whatever persistence the host offers.

use rustc_hash::FxHashMap;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;

/// Storage-related errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// Storage is disabled or cannot be reached
    #[error("storage unavailable")]
    Unavailable,

    /// Write rejected for lack of space
    #[error("storage quota exceeded")]
    QuotaExceeded,

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("failed to decode storage file: {0}")]
    Decode(#[from] toml::de::Error),

    #[error("failed to encode storage file: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Key-value persistence for small string payloads
pub trait PreferenceStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: PreferenceStorage + ?Sized> PreferenceStorage for Rc<T> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}

impl<T: PreferenceStorage + ?Sized> PreferenceStorage for Box<T> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Availability {
    Available,
    /// Reads and writes both fail
    Disabled,
    /// Reads work, writes fail
    Full,
}

/// In-process storage; can simulate a disabled or full backend
#[derive(Debug)]
pub struct MemoryStorage {
    entries: RefCell<FxHashMap<String, String>>,
    availability: Cell<Availability>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(FxHashMap::default()),
            availability: Cell::new(Availability::Available),
        }
    }

    /// Storage that fails every read and write
    pub fn disabled() -> Self {
        let storage = Self::new();
        storage.availability.set(Availability::Disabled);
        storage
    }

    /// Storage that can be read but rejects writes
    pub fn full() -> Self {
        let storage = Self::new();
        storage.availability.set(Availability::Full);
        storage
    }

    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Inspect a stored value directly, bypassing availability
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    /// Start rejecting writes from now on
    pub fn fill(&self) {
        self.availability.set(Availability::Full);
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.availability.get() == Availability::Disabled {
            return Err(StorageError::Unavailable);
        }
        Ok(self.get(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self.availability.get() {
            Availability::Disabled => Err(StorageError::Unavailable),
            Availability::Full => Err(StorageError::QuotaExceeded),
            Availability::Available => {
                self.entries
                    .borrow_mut()
                    .insert(key.to_string(), value.to_string());
                Ok(())
            }
        }
    }
}

/// TOML key-value file, e.g. `theme = "dark"`
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(toml::from_str(&raw)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

impl PreferenceStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // A corrupt file is replaced rather than blocking every future write
        let mut entries = self.load().unwrap_or_else(|err| {
            tracing::warn!("storage: discarding unreadable {}: {}", self.path.display(), err);
            BTreeMap::new()
        });
        entries.insert(key.to_string(), value.to_string());

        let payload = toml::to_string(&entries)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, payload)?;
        Ok(())
    }
}
