#![forbid(unsafe_code)]

//! Costream public facade crate.
//!
//! Draggable, resizable panel boards whose layout survives reloads. This crate
//! re-exports the common types from the internal crates and offers a small
//! prelude:
//!
//! ```rust,ignore
//! use costream::prelude::*;
//!
//! let mut board = Board::boot(BoardConfig::default(), Box::new(MemoryStorage::new()))?;
//! let id = PanelId::from("2");
//! board.drag(&id, DragEvent::start())?;
//! board.drag(&id, DragEvent::end(50, 20))?;
//! ```

pub mod error;

// --- Core re-exports -------------------------------------------------------

pub use costream_core::event::{DragEvent, DragPhase, PointerEvent, PointerEventKind};
pub use costream_core::geometry::{Axis, Delta, Point, Rect, Size};
pub use costream_core::window::{Orientation, WindowMetrics};

// --- Layout re-exports -----------------------------------------------------

pub use costream_layout::{
    DragEffect, DragTransition, GestureKind, LayoutSnapshot, ListenerCommand, MIN_PANEL_SIZE,
    OrientationPresets, Panel, PanelId, PanelRecord, PanelStore, PresetStrategy, ResizeDispatch,
    ResizeEffect, ResizeSessionId, SeedLayout, clamp, orientation_preset,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "state-persistence")]
pub use costream_runtime::FileStorage;
pub use costream_runtime::{
    Board, BoardConfig, DefaultLayoutKind, LoadSource, MemoryStorage, PanelView, StorageBackend,
};

// --- Errors ---------------------------------------------------------------

pub use error::{Error, Recovery, Result};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Board, BoardConfig, DragEvent, Error, MemoryStorage, PanelId, Point, PointerEvent, Rect,
        Result, Size, WindowMetrics,
    };

    pub use crate::{core, layout, runtime};
}

pub use costream_core as core;
pub use costream_layout as layout;
pub use costream_runtime as runtime;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use pretty_assertions::assert_eq;

    fn run() -> Result<Vec<Rect>> {
        let mut board = Board::boot(
            BoardConfig {
                default_layout: crate::DefaultLayoutKind::Seed,
                window: WindowMetrics::from_dimensions(1000, 800),
                ..BoardConfig::default()
            },
            Box::new(MemoryStorage::new()),
        )?;
        let id = PanelId::from("2");
        board.drag(&id, DragEvent::start())?;
        board.drag(&id, DragEvent::end(50, 20))?;
        Ok(board.panels().map(|panel| panel.rect()).collect())
    }

    #[test]
    fn prelude_drives_a_board() {
        assert_eq!(
            run().unwrap(),
            vec![
                Rect::new(0, 0, 200, 200),
                Rect::new(50, 20, 200, 200),
                Rect::new(0, 0, 200, 200),
            ]
        );
    }
}
