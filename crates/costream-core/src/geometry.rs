#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Coordinates are signed integers in host pixels with the origin at the
//! top-left of the board container. Positions may go negative (a drag past the
//! left edge) until the bounds clamp pulls them back in.

use std::ops::{Add, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point in board coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// The board origin.
    pub const ORIGIN: Self = Self::new(0, 0);

    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate by a delta, saturating at the `i32` range.
    #[inline]
    #[must_use]
    pub const fn offset(self, delta: Delta) -> Self {
        Self {
            x: self.x.saturating_add(delta.dx),
            y: self.y.saturating_add(delta.dy),
        }
    }

    /// Displacement from `origin` to `self`.
    #[inline]
    #[must_use]
    pub const fn delta_from(self, origin: Point) -> Delta {
        Delta {
            dx: self.x.saturating_sub(origin.x),
            dy: self.y.saturating_sub(origin.y),
        }
    }
}

impl Add<Delta> for Point {
    type Output = Point;

    fn add(self, rhs: Delta) -> Point {
        self.offset(rhs)
    }
}

impl Sub for Point {
    type Output = Delta;

    fn sub(self, rhs: Point) -> Delta {
        self.delta_from(rhs)
    }
}

/// A displacement between two points.
///
/// Drag gestures report their movement as a `Delta` that is cumulative since
/// the gesture started, not per-event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Delta {
    pub dx: i32,
    pub dy: i32,
}

impl Delta {
    /// No movement.
    pub const ZERO: Self = Self::new(0, 0);

    /// Create a new delta.
    #[inline]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Component-wise sum, saturating.
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, other: Delta) -> Self {
        Self {
            dx: self.dx.saturating_add(other.dx),
            dy: self.dy.saturating_add(other.dy),
        }
    }
}

impl Add for Delta {
    type Output = Delta;

    fn add(self, rhs: Delta) -> Delta {
        self.saturating_add(rhs)
    }
}

/// Width and height of a panel or container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Square size with equal sides.
    #[inline]
    pub const fn square(side: i32) -> Self {
        Self::new(side, side)
    }

    /// Raise each dimension to at least `min`. There is no upper bound.
    #[inline]
    #[must_use]
    pub const fn at_least(self, min: i32) -> Self {
        Self {
            width: if self.width < min { min } else { self.width },
            height: if self.height < min { min } else { self.height },
        }
    }

    /// Whether both dimensions are at least `min`.
    #[inline]
    pub const fn fits_minimum(self, min: i32) -> bool {
        self.width >= min && self.height >= min
    }

    /// Grow (or shrink, for negative components) by a delta, saturating.
    #[inline]
    #[must_use]
    pub const fn grown_by(self, delta: Delta) -> Self {
        Self {
            width: self.width.saturating_add(delta.dx),
            height: self.height.saturating_add(delta.dy),
        }
    }
}

/// An axis-aligned rectangle: top-left position plus size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Assemble a rectangle from its position and size.
    #[inline]
    pub const fn from_parts(position: Point, size: Size) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    /// Top-left corner.
    #[inline]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// The same rectangle moved to a new top-left corner.
    #[inline]
    #[must_use]
    pub const fn with_position(self, position: Point) -> Self {
        Self::from_parts(position, self.size())
    }
}

/// Directions a drag is allowed to move along.
///
/// Movement on a disallowed axis is discarded before the drag preview and
/// commit are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Axis {
    #[default]
    All,
    Horizontal,
    Vertical,
}

impl Axis {
    /// Drop the movement components this axis does not permit.
    #[inline]
    #[must_use]
    pub const fn project(self, delta: Delta) -> Delta {
        match self {
            Self::All => delta,
            Self::Horizontal => Delta::new(delta.dx, 0),
            Self::Vertical => Delta::new(0, delta.dy),
        }
    }
}
