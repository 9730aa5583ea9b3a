//! Error types for panel store and controller operations.

use std::fmt;

use costream_core::geometry::Size;

use crate::panel::{GestureKind, PanelId};

/// Errors from layout operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// No panel with the given id exists in the store.
    PanelNotFound(PanelId),
    /// A committed size would fall below the minimum panel size.
    InvalidGeometry { id: PanelId, size: Size, min: i32 },
    /// The configured minimum panel size is not positive.
    InvalidMinimumSize { min: i32 },
    /// Another gesture already owns this panel.
    GestureConflict { id: PanelId, active: GestureKind },
    /// A snapshot handed to the store failed validation.
    InvalidSnapshot(String),
    /// Every numeric id from the store's sequence onward is taken.
    IdsExhausted,
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PanelNotFound(id) => write!(f, "panel not found: {id}"),
            Self::InvalidGeometry { id, size, min } => write!(
                f,
                "panel {id} size {}x{} is below the minimum of {min}",
                size.width, size.height
            ),
            Self::InvalidMinimumSize { min } => {
                write!(f, "minimum panel size must be > 0 (got {min})")
            }
            Self::GestureConflict { id, active } => {
                write!(f, "panel {id} already has an active {active} gesture")
            }
            Self::InvalidSnapshot(reason) => write!(f, "invalid layout snapshot: {reason}"),
            Self::IdsExhausted => write!(f, "no panel ids left to assign"),
        }
    }
}

impl std::error::Error for LayoutError {}

/// Result alias for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            LayoutError::PanelNotFound("9".into()).to_string(),
            "panel not found: 9"
        );
        assert_eq!(
            LayoutError::InvalidGeometry {
                id: "1".into(),
                size: Size::new(5, 30),
                min: 20,
            }
            .to_string(),
            "panel 1 size 5x30 is below the minimum of 20"
        );
        assert_eq!(
            LayoutError::GestureConflict {
                id: "2".into(),
                active: GestureKind::Resize,
            }
            .to_string(),
            "panel 2 already has an active resize gesture"
        );
    }
}
