#![forbid(unsafe_code)]

//! Costream runtime: storage, persistence, configuration and the board.
//!
//! # Role in Costream
//! `costream-runtime` wires the pure layout core to the outside world. A
//! [`Board`] boots from a [`StorageBackend`], falls back to a preset when the
//! stored layout is missing or unusable, and saves after every commit.
//!
//! # Feature flags
//! - `state-persistence`: [`FileStorage`], a directory-backed backend.
//! - `board-config`: TOML/JSON loaders on [`BoardConfig`].
//!
//! # Logging
//! All diagnostics go through `tracing`. This crate never installs a
//! subscriber; hosts choose their own.

pub mod board;
pub mod config;
pub mod persistence;
pub mod storage;

pub use board::{Board, BoardError, PanelView};
pub use config::{BoardConfig, ConfigError, DefaultLayoutKind};
pub use persistence::{
    DEFAULT_LAYOUT_KEY, LayoutPersistence, LoadOutcome, LoadSource, PersistenceError,
    PersistenceStats,
};
#[cfg(feature = "state-persistence")]
pub use storage::FileStorage;
pub use storage::{MemoryStorage, StorageBackend, StorageError, StorageResult};
