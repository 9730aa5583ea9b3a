#![forbid(unsafe_code)]

//! Core: geometry primitives and normalized input events.
//!
//! # Role in Costream
//! `costream-core` is the input layer. It owns the integer geometry used for
//! panel positions and sizes, and the already-normalized events the layout
//! state machine consumes: cumulative drag gestures, resize-handle pointer
//! events, and window metrics snapshots.
//!
//! # How it fits in the system
//! The layout crate (`costream-layout`) turns these events into committed
//! panel geometry. Raw pointer capture, multi-touch disambiguation and window
//! measuring belong to the host; by the time an event reaches this crate it is
//! a plain value.

pub mod event;
pub mod geometry;
pub mod window;

pub use event::{DragEvent, DragPhase, PointerEvent, PointerEventKind};
pub use geometry::{Axis, Delta, Point, Rect, Size};
pub use window::{Orientation, WindowMetrics};
