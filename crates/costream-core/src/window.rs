#![forbid(unsafe_code)]

//! Window metrics snapshots.
//!
//! The host measures the window (resize events, orientation polling) and hands
//! the core a fresh [`WindowMetrics`] value each time. The core never measures
//! anything itself.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::Size;

/// Screen orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Orientation {
    #[default]
    Landscape,
    Portrait,
}

impl Orientation {
    /// Orientation implied by dimensions; a square window counts as landscape.
    #[must_use]
    pub const fn from_dimensions(width: i32, height: i32) -> Self {
        if height > width {
            Self::Portrait
        } else {
            Self::Landscape
        }
    }
}

/// A `(width, height, orientation)` snapshot supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WindowMetrics {
    pub width: i32,
    pub height: i32,
    pub orientation: Orientation,
}

impl WindowMetrics {
    /// Create metrics with an explicit orientation.
    ///
    /// Hosts that read `screen.orientation` may report an orientation that
    /// disagrees with the aspect ratio; it is kept as given.
    #[must_use]
    pub const fn new(width: i32, height: i32, orientation: Orientation) -> Self {
        Self {
            width,
            height,
            orientation,
        }
    }

    /// Create metrics, deriving the orientation from the aspect ratio.
    #[must_use]
    pub const fn from_dimensions(width: i32, height: i32) -> Self {
        Self::new(width, height, Orientation::from_dimensions(width, height))
    }

    /// The drag container implied by these metrics.
    #[must_use]
    pub const fn container(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl Default for WindowMetrics {
    fn default() -> Self {
        Self::from_dimensions(1280, 800)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_from_dimensions() {
        assert_eq!(Orientation::from_dimensions(1000, 800), Orientation::Landscape);
        assert_eq!(Orientation::from_dimensions(800, 1000), Orientation::Portrait);
        assert_eq!(Orientation::from_dimensions(500, 500), Orientation::Landscape);
    }

    #[test]
    fn explicit_orientation_is_preserved() {
        let m = WindowMetrics::new(1000, 800, Orientation::Portrait);
        assert_eq!(m.orientation, Orientation::Portrait);
        assert_eq!(m.container(), Size::new(1000, 800));
    }
}
