#![forbid(unsafe_code)]

//! Key-value storage backends for persisted layouts.
//!
//! [`StorageBackend`] is the host's string store (browser `localStorage`, a
//! settings file, a test map). Values are opaque strings; the layout schema
//! lives in `costream-layout`.
//!
//! - [`MemoryStorage`]: shared in-process map with an optional quota and an
//!   availability switch for exercising failure paths.
//! - [`FileStorage`] (feature `state-persistence`): one JSON file per key,
//!   written with a temp-file-then-rename so a crash never leaves a torn file.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

#[cfg(feature = "state-persistence")]
use std::path::{Path, PathBuf};

/// Errors from a storage backend.
#[derive(Debug)]
pub enum StorageError {
    /// The backend cannot be reached at all.
    Unavailable(String),
    /// Writing `bytes` under `key` would exceed the backend quota.
    QuotaExceeded { key: String, bytes: usize, limit: usize },
    /// Filesystem failure.
    Io(std::io::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
            Self::QuotaExceeded { key, bytes, limit } => write!(
                f,
                "storage quota exceeded writing {key:?}: {bytes} bytes > {limit} byte limit"
            ),
            Self::Io(e) => write!(f, "storage I/O error: {e}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Unavailable(_) | Self::QuotaExceeded { .. } => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// String key-value store addressed by a layout key.
pub trait StorageBackend {
    /// Backend name for log fields.
    fn name(&self) -> &'static str;

    /// Raw value under `key`, or `None` when absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing an absent key succeeds.
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}

impl<B: StorageBackend + ?Sized> StorageBackend for Box<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: HashMap<String, String>,
    quota: Option<usize>,
    unavailable: bool,
}

/// In-memory backend. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject values longer than `limit` bytes.
    #[must_use]
    pub fn with_quota(limit: usize) -> Self {
        let storage = Self::default();
        storage.lock().quota = Some(limit);
        storage
    }

    /// Simulate the backend going away (or coming back).
    pub fn set_available(&self, available: bool) {
        self.lock().unavailable = !available;
    }

    /// Write a raw value, bypassing quota and availability.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.lock().entries.insert(key.into(), value.into());
    }

    /// Raw value, bypassing availability.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().entries.get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_available(inner: &MemoryInner) -> StorageResult<()> {
        if inner.unavailable {
            Err(StorageError::Unavailable("memory storage disabled".into()))
        } else {
            Ok(())
        }
    }
}

impl StorageBackend for MemoryStorage {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let inner = self.lock();
        Self::check_available(&inner)?;
        Ok(inner.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let mut inner = self.lock();
        Self::check_available(&inner)?;
        if let Some(limit) = inner.quota
            && value.len() > limit
        {
            return Err(StorageError::QuotaExceeded {
                key: key.to_owned(),
                bytes: value.len(),
                limit,
            });
        }
        inner.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        let mut inner = self.lock();
        Self::check_available(&inner)?;
        inner.entries.remove(key);
        Ok(())
    }
}

/// Directory-backed storage: `<dir>/<key>.json`.
#[cfg(feature = "state-persistence")]
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

#[cfg(feature = "state-persistence")]
impl FileStorage {
    /// Store files under `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that holds `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file}.json"))
    }
}

#[cfg(feature = "state-persistence")]
impl StorageBackend for FileStorage {
    fn name(&self) -> &'static str {
        "file"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let temp = path.with_extension("json.tmp");
        std::fs::write(&temp, value)?;
        std::fs::rename(&temp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
