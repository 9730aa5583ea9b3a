#![forbid(unsafe_code)]

//! Normalized input events consumed by the panel controllers.
//!
//! # Design Notes
//!
//! - Drag gestures arrive already recognized: the host's gesture layer reports
//!   a phase and the **cumulative** movement since the gesture started. The
//!   controllers read that movement verbatim and never re-accumulate it.
//! - Resize-handle input arrives as raw pointer down/move/up with absolute
//!   positions. The pointer id lets the controller ignore strays from other
//!   pointers.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{Delta, Point};

/// Lifecycle phase of a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DragPhase {
    Start,
    Move,
    End,
    /// The gesture source aborted (escape, focus loss, lost capture).
    Cancel,
}

/// One drag gesture event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DragEvent {
    pub phase: DragPhase,
    /// Displacement since the gesture started.
    #[cfg_attr(feature = "serde", serde(default))]
    pub movement: Delta,
}

impl DragEvent {
    /// Create a drag event.
    #[must_use]
    pub const fn new(phase: DragPhase, movement: Delta) -> Self {
        Self { phase, movement }
    }

    /// Gesture start (no movement yet).
    #[must_use]
    pub const fn start() -> Self {
        Self::new(DragPhase::Start, Delta::ZERO)
    }

    /// Intermediate move with cumulative movement `(dx, dy)`.
    #[must_use]
    pub const fn moved(dx: i32, dy: i32) -> Self {
        Self::new(DragPhase::Move, Delta::new(dx, dy))
    }

    /// Gesture release with final cumulative movement `(dx, dy)`.
    #[must_use]
    pub const fn end(dx: i32, dy: i32) -> Self {
        Self::new(DragPhase::End, Delta::new(dx, dy))
    }

    /// Gesture abort.
    #[must_use]
    pub const fn cancel() -> Self {
        Self::new(DragPhase::Cancel, Delta::ZERO)
    }
}

/// The type of a resize-handle pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PointerEventKind {
    /// Pointer pressed on the handle.
    Down,
    /// Pointer moved anywhere in the window.
    Move,
    /// Pointer released anywhere in the window.
    Up,
}

/// A pointer event with absolute position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    /// Host pointer identity (mouse is usually 1).
    pub pointer_id: u32,
    pub position: Point,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[must_use]
    pub const fn new(kind: PointerEventKind, pointer_id: u32, position: Point) -> Self {
        Self {
            kind,
            pointer_id,
            position,
        }
    }

    #[must_use]
    pub const fn down(pointer_id: u32, x: i32, y: i32) -> Self {
        Self::new(PointerEventKind::Down, pointer_id, Point::new(x, y))
    }

    #[must_use]
    pub const fn moved(pointer_id: u32, x: i32, y: i32) -> Self {
        Self::new(PointerEventKind::Move, pointer_id, Point::new(x, y))
    }

    #[must_use]
    pub const fn up(pointer_id: u32, x: i32, y: i32) -> Self {
        Self::new(PointerEventKind::Up, pointer_id, Point::new(x, y))
    }
}
