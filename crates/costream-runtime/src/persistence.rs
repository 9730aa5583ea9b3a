#![forbid(unsafe_code)]

//! Layout persistence over a [`StorageBackend`].
//!
//! # Load
//!
//! [`LayoutPersistence::load`] never fails. Absence, storage failure, parse
//! failure and structural validation failure all produce the caller's fallback
//! snapshot, tagged with a [`LoadSource`] so the host can tell why.
//!
//! # Save
//!
//! [`LayoutPersistence::save`] writes the full snapshot synchronously. A
//! failure is logged at `warn` and counted; it never reaches the gesture that
//! triggered the commit. The in-memory store stays authoritative.

use std::fmt;

use costream_layout::{LayoutSnapshot, SnapshotError};
use tracing::{debug, warn};

use crate::storage::{StorageBackend, StorageError, StorageResult};

/// Default key for the persisted layout.
pub const DEFAULT_LAYOUT_KEY: &str = "costream-layout";

/// Why a stored layout could not be used.
#[derive(Debug)]
pub enum PersistenceError {
    /// The backend failed to read or write.
    Unavailable(StorageError),
    /// The stored value did not parse or failed validation.
    Malformed(SnapshotError),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(e) => write!(f, "persistence unavailable: {e}"),
            Self::Malformed(e) => write!(f, "malformed layout snapshot: {e}"),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unavailable(e) => Some(e),
            Self::Malformed(e) => Some(e),
        }
    }
}

/// Where a loaded snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// A valid stored layout.
    Stored,
    /// Nothing stored under the key; fallback used.
    Missing,
    /// Stored value rejected; fallback used.
    Malformed,
    /// Backend read failed; fallback used.
    Unavailable,
}

impl LoadSource {
    #[must_use]
    pub const fn is_stored(self) -> bool {
        matches!(self, Self::Stored)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stored => "stored",
            Self::Missing => "missing",
            Self::Malformed => "malformed",
            Self::Unavailable => "unavailable",
        }
    }
}

/// Result of [`LayoutPersistence::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    pub snapshot: LayoutSnapshot,
    pub source: LoadSource,
}

/// Save/load counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistenceStats {
    pub loads: u64,
    pub fallbacks: u64,
    pub saves: u64,
    pub save_failures: u64,
}

/// Serializes layout snapshots to one key of a storage backend.
pub struct LayoutPersistence {
    backend: Box<dyn StorageBackend>,
    key: String,
    min_size: i32,
    stats: PersistenceStats,
}

impl fmt::Debug for LayoutPersistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutPersistence")
            .field("backend", &self.backend.name())
            .field("key", &self.key)
            .field("min_size", &self.min_size)
            .field("stats", &self.stats)
            .finish()
    }
}

impl LayoutPersistence {
    /// `min_size` is the smallest dimension a stored panel may have.
    pub fn new(backend: Box<dyn StorageBackend>, key: impl Into<String>, min_size: i32) -> Self {
        Self {
            backend,
            key: key.into(),
            min_size,
            stats: PersistenceStats::default(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    #[must_use]
    pub const fn stats(&self) -> PersistenceStats {
        self.stats
    }

    /// Read and validate the stored layout.
    ///
    /// `Ok(None)` means nothing is stored under the key.
    pub fn try_load(&self) -> Result<Option<LayoutSnapshot>, PersistenceError> {
        let Some(raw) = self
            .backend
            .get(&self.key)
            .map_err(PersistenceError::Unavailable)?
        else {
            return Ok(None);
        };
        let snapshot = LayoutSnapshot::from_json(&raw).map_err(PersistenceError::Malformed)?;
        snapshot
            .validate(self.min_size)
            .map_err(PersistenceError::Malformed)?;
        Ok(Some(snapshot))
    }

    /// Load the stored layout, or `fallback()` when it cannot be used.
    pub fn load(&mut self, fallback: impl FnOnce() -> LayoutSnapshot) -> LoadOutcome {
        self.stats.loads += 1;
        let source = match self.try_load() {
            Ok(Some(snapshot)) => {
                debug!(
                    key = %self.key,
                    backend = self.backend.name(),
                    panels = snapshot.len(),
                    "loaded stored layout"
                );
                return LoadOutcome {
                    snapshot,
                    source: LoadSource::Stored,
                };
            }
            Ok(None) => LoadSource::Missing,
            Err(PersistenceError::Malformed(error)) => {
                warn!(
                    key = %self.key,
                    backend = self.backend.name(),
                    %error,
                    "stored layout is malformed, using default layout"
                );
                LoadSource::Malformed
            }
            Err(PersistenceError::Unavailable(error)) => {
                warn!(
                    key = %self.key,
                    backend = self.backend.name(),
                    %error,
                    "layout storage unavailable, using default layout"
                );
                LoadSource::Unavailable
            }
        };
        self.stats.fallbacks += 1;
        LoadOutcome {
            snapshot: fallback(),
            source,
        }
    }

    /// Persist `snapshot`. Returns whether the write succeeded.
    pub fn save(&mut self, snapshot: &LayoutSnapshot) -> bool {
        let result = snapshot
            .to_json()
            .map_err(PersistenceError::Malformed)
            .and_then(|json| {
                self.backend
                    .set(&self.key, &json)
                    .map_err(PersistenceError::Unavailable)
            });
        match result {
            Ok(()) => {
                self.stats.saves += 1;
                debug!(key = %self.key, panels = snapshot.len(), "layout saved");
                true
            }
            Err(error) => {
                self.stats.save_failures += 1;
                warn!(
                    key = %self.key,
                    backend = self.backend.name(),
                    %error,
                    "failed to persist layout"
                );
                false
            }
        }
    }

    /// Delete the stored layout.
    pub fn clear(&mut self) -> StorageResult<()> {
        self.backend.remove(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use costream_layout::{MIN_PANEL_SIZE, PanelRecord, Rect};
    use pretty_assertions::assert_eq;

    fn fallback() -> LayoutSnapshot {
        LayoutSnapshot::from_rects(&[Rect::new(0, 0, 200, 200); 3], MIN_PANEL_SIZE)
    }

    fn persistence(storage: &MemoryStorage) -> LayoutPersistence {
        LayoutPersistence::new(Box::new(storage.clone()), DEFAULT_LAYOUT_KEY, MIN_PANEL_SIZE)
    }

    #[test]
    fn missing_key_falls_back() {
        let storage = MemoryStorage::new();
        let outcome = persistence(&storage).load(fallback);
        assert_eq!(outcome.source, LoadSource::Missing);
        assert_eq!(outcome.snapshot, fallback());
    }

    #[test]
    fn save_then_load_round_trips() {
        let storage = MemoryStorage::new();
        let mut persistence = persistence(&storage);
        let layout = LayoutSnapshot::new(vec![PanelRecord {
            id: "7".into(),
            x: -3,
            y: 41,
            width: 250,
            height: 280,
        }]);

        assert!(persistence.save(&layout));
        let first = persistence.load(fallback);
        assert!(persistence.save(&first.snapshot));
        let second = persistence.load(fallback);

        assert_eq!(first.source, LoadSource::Stored);
        assert_eq!(first.snapshot, layout);
        assert_eq!(second.snapshot, layout);
    }

    #[test]
    fn malformed_values_fall_back() {
        let cases = [
            "not json",
            r#"{"schema_version":1,"panels":[{"id":"1","x":0,"y":0,"width":200}]}"#,
            r#"[{"id":"1","x":"0","y":0,"width":200,"height":200}]"#,
            r#"[{"id":"1","x":0,"y":0,"width":200,"height":200},{"id":"1","x":0,"y":0,"width":200,"height":200}]"#,
            r#"[{"id":"1","x":0,"y":0,"width":5,"height":200}]"#,
            r#"[{"id":"1","x":0.5,"y":0,"width":200,"height":200}]"#,
            r#"{"schema_version":99,"panels":[]}"#,
        ];
        for raw in cases {
            let storage = MemoryStorage::new();
            storage.insert_raw(DEFAULT_LAYOUT_KEY, raw);
            let outcome = persistence(&storage).load(fallback);
            assert_eq!(outcome.source, LoadSource::Malformed, "input: {raw}");
            assert_eq!(outcome.snapshot, fallback());
        }
    }

    #[test]
    fn bare_array_loads() {
        let storage = MemoryStorage::new();
        storage.insert_raw(
            DEFAULT_LAYOUT_KEY,
            r#"[{"id":"a","x":10,"y":20,"width":30,"height":40}]"#,
        );
        let outcome = persistence(&storage).load(fallback);
        assert_eq!(outcome.source, LoadSource::Stored);
        assert_eq!(outcome.snapshot.records()[0].rect(), Rect::new(10, 20, 30, 40));
    }

    #[test]
    fn unavailable_backend_falls_back_and_save_reports_failure() {
        let storage = MemoryStorage::new();
        storage.set_available(false);
        let mut persistence = persistence(&storage);

        assert_eq!(persistence.load(fallback).source, LoadSource::Unavailable);
        assert!(!persistence.save(&fallback()));
        assert_eq!(
            persistence.stats(),
            PersistenceStats {
                loads: 1,
                fallbacks: 1,
                saves: 0,
                save_failures: 1,
            }
        );
    }

    #[test]
    fn clear_removes_stored_layout() {
        let storage = MemoryStorage::new();
        let mut persistence = persistence(&storage);
        persistence.save(&fallback());
        persistence.clear().unwrap();
        assert_eq!(persistence.load(fallback).source, LoadSource::Missing);
    }
}
