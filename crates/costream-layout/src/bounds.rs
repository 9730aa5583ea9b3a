//! Container bounds clamp for drag results.
//!
//! # Contract
//!
//! [`clamp`] moves a rectangle the minimum distance needed to bring its edges
//! inside `[0, container.width] x [0, container.height]`. It never changes the
//! size. When the rectangle is larger than the container on an axis, its origin
//! is pinned to 0 on that axis and it overflows past the far edge.
//!
//! Only drag commits are clamped. Resize commits may extend past the container.

use costream_core::geometry::{Rect, Size};

/// Constrain `rect` to `container` by translation only.
#[must_use]
pub fn clamp(rect: Rect, container: Size) -> Rect {
    Rect {
        x: clamp_axis(rect.x, rect.width, container.width),
        y: clamp_axis(rect.y, rect.height, container.height),
        width: rect.width,
        height: rect.height,
    }
}

fn clamp_axis(origin: i32, extent: i32, limit: i32) -> i32 {
    let max_origin = limit.saturating_sub(extent);
    if max_origin <= 0 {
        return 0;
    }
    origin.clamp(0, max_origin)
}
