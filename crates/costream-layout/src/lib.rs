#![forbid(unsafe_code)]

//! Panel layout state machine.
//!
//! # Role in Costream
//! `costream-layout` turns normalized drag and resize input into committed
//! panel geometry. It owns the canonical panel table ([`PanelStore`]), the pure
//! geometry rules ([`clamp`], [`orientation_preset`]), the two gesture
//! controllers ([`DragController`], [`ResizeController`]) and the persisted
//! snapshot schema ([`LayoutSnapshot`]).
//!
//! # Commit model
//! Controllers only hold transient preview state. The store is written in
//! exactly one place per gesture (drag release or resize release) through
//! [`PanelStore::upsert`], and every successful write hands a full snapshot to
//! the store's subscribers. Storage I/O lives in `costream-runtime`.

pub mod bounds;
pub mod drag;
pub mod error;
pub mod panel;
pub mod preset;
pub mod resize;
pub mod snapshot;
pub mod store;

pub use bounds::clamp;
pub use costream_core::event::{DragEvent, DragPhase, PointerEvent, PointerEventKind};
pub use costream_core::geometry::{Axis, Delta, Point, Rect, Size};
pub use costream_core::window::{Orientation, WindowMetrics};
pub use drag::{DragController, DragEffect, DragNoopReason, DragState, DragTransition};
pub use error::{LayoutError, LayoutResult};
pub use panel::{DEFAULT_PANEL_SIZE, GestureKind, MIN_PANEL_SIZE, Panel, PanelId};
pub use preset::{
    OrientationPresets, PRESET_PANEL_COUNT, PresetStrategy, SeedLayout, default_snapshot,
    orientation_preset,
};
pub use resize::{
    ListenerCommand, ResizeController, ResizeDispatch, ResizeEffect, ResizeIgnoredReason,
    ResizeSessionId, ResizeState, TeardownReason,
};
pub use snapshot::{LAYOUT_SCHEMA_VERSION, LayoutSnapshot, PanelRecord, SnapshotError};
pub use store::{PanelStore, SubscriberId};
