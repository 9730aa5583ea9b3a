#![forbid(unsafe_code)]

//! Costream error model and local recovery.
//!
//! Every failure in the panel board is recovered where it happens: nothing
//! here is meant to reach the user as a dialog or terminate the process.
//! [`Error::recovery`] names the recovery each variant calls for, so hosts can
//! route errors without matching on every inner type.

use std::fmt;

use costream_layout::{LayoutError, SnapshotError};
use costream_runtime::{BoardError, ConfigError, PersistenceError, StorageError};

/// Top-level error for Costream hosts.
#[derive(Debug)]
pub enum Error {
    /// Store or controller rejected an operation.
    Layout(LayoutError),
    /// Persisted layout did not parse or validate.
    Snapshot(SnapshotError),
    /// Storage backend failure.
    Storage(StorageError),
    /// Configuration failed to load or validate.
    Config(ConfigError),
}

/// Standard result type for Costream APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// What the host should do about an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Drop the offending input event; committed state is unchanged.
    IgnoreInput,
    /// Use the generated default layout instead of the stored one.
    FallbackToDefault,
    /// Keep the in-memory layout; the write is skipped.
    SkipPersist,
    /// The board cannot start with this configuration.
    RejectConfig,
}

impl Error {
    /// Recovery for this error.
    #[must_use]
    pub fn recovery(&self) -> Recovery {
        match self {
            Self::Layout(LayoutError::InvalidMinimumSize { .. }) => Recovery::RejectConfig,
            Self::Layout(LayoutError::InvalidSnapshot(_)) => Recovery::FallbackToDefault,
            Self::Layout(
                LayoutError::PanelNotFound(_)
                | LayoutError::InvalidGeometry { .. }
                | LayoutError::GestureConflict { .. }
                | LayoutError::IdsExhausted,
            ) => Recovery::IgnoreInput,
            Self::Snapshot(SnapshotError::Serialize(_)) => Recovery::SkipPersist,
            Self::Snapshot(_) => Recovery::FallbackToDefault,
            Self::Storage(_) => Recovery::SkipPersist,
            Self::Config(_) => Recovery::RejectConfig,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Layout(e) => write!(f, "{e}"),
            Self::Snapshot(e) => write!(f, "{e}"),
            Self::Storage(e) => write!(f, "{e}"),
            Self::Config(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Layout(e) => Some(e),
            Self::Snapshot(e) => Some(e),
            Self::Storage(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

impl From<LayoutError> for Error {
    fn from(e: LayoutError) -> Self {
        Self::Layout(e)
    }
}

impl From<SnapshotError> for Error {
    fn from(e: SnapshotError) -> Self {
        Self::Snapshot(e)
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<PersistenceError> for Error {
    fn from(e: PersistenceError) -> Self {
        match e {
            PersistenceError::Unavailable(e) => Self::Storage(e),
            PersistenceError::Malformed(e) => Self::Snapshot(e),
        }
    }
}

impl From<BoardError> for Error {
    fn from(e: BoardError) -> Self {
        match e {
            BoardError::Config(e) => Self::Config(e),
            BoardError::Layout(e) => Self::Layout(e),
            BoardError::Storage(e) => Self::Storage(e),
        }
    }
}
