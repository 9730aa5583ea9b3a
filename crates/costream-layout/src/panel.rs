//! Panel identity and geometry records.

use std::fmt;

use costream_core::geometry::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Smallest width or height a committed panel may have.
pub const MIN_PANEL_SIZE: i32 = 20;

/// Side length of a panel created without explicit geometry.
pub const DEFAULT_PANEL_SIZE: i32 = 200;

/// Stable panel identifier.
///
/// Assigned once at creation and never reused within a store. Persisted as a
/// plain JSON string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelId(String);

impl PanelId {
    /// Wrap a host-provided identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Identifier generated from a store sequence number.
    #[must_use]
    pub fn from_sequence(seq: u64) -> Self {
        Self(seq.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value if the id is a generated sequence number.
    #[must_use]
    pub fn sequence(&self) -> Option<u64> {
        self.0.parse().ok()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PanelId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for PanelId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// One movable, resizable rectangle with committed geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub id: PanelId,
    pub position: Point,
    pub size: Size,
}

impl Panel {
    #[must_use]
    pub fn new(id: PanelId, position: Point, size: Size) -> Self {
        Self { id, position, size }
    }

    /// Committed bounds.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_parts(self.position, self.size)
    }
}

/// Which controller owns a gesture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    Drag,
    Resize,
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drag => f.write_str("drag"),
            Self::Resize => f.write_str("resize"),
        }
    }
}
