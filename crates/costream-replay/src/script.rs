//! JSONL gesture scripts.
//!
//! One step per line, tagged by `op`. Blank lines and lines starting with `#`
//! are skipped.
//!
//! ```text
//! {"op":"drag","panel":"2","phase":"start"}
//! {"op":"drag","panel":"2","phase":"end","dx":50,"dy":-20}
//! {"op":"pointer","panel":"3","kind":"down","x":100,"y":100}
//! {"op":"pointer","kind":"up","x":150,"y":180}
//! {"op":"window","width":600,"height":1000}
//! ```

use std::path::Path;

use costream::{DragEvent, DragPhase, Delta, Orientation, PanelId, PointerEventKind, WindowMetrics};
use serde::{Deserialize, Serialize};

use crate::error::{ReplayError, Result};

const fn default_pointer_id() -> u32 {
    1
}

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// A recognized drag gesture event with cumulative movement.
    Drag {
        panel: PanelId,
        phase: DragPhase,
        #[serde(default)]
        dx: i32,
        #[serde(default)]
        dy: i32,
    },
    /// Raw resize-handle input. `panel` is only read for `down`; moves and
    /// releases reach whichever listener is attached.
    Pointer {
        #[serde(default)]
        panel: Option<PanelId>,
        kind: PointerEventKind,
        #[serde(default = "default_pointer_id")]
        pointer_id: u32,
        x: i32,
        y: i32,
    },
    /// New window metrics. Orientation follows the aspect ratio when absent.
    Window {
        width: i32,
        height: i32,
        #[serde(default)]
        orientation: Option<Orientation>,
    },
    AddPanel,
    /// The component hosting `panel` unmounted.
    Detach { panel: PanelId },
    Shutdown,
}

impl Step {
    /// Short name used in reports.
    #[must_use]
    pub const fn op(&self) -> &'static str {
        match self {
            Self::Drag { .. } => "drag",
            Self::Pointer { .. } => "pointer",
            Self::Window { .. } => "window",
            Self::AddPanel => "add_panel",
            Self::Detach { .. } => "detach",
            Self::Shutdown => "shutdown",
        }
    }

    /// The drag event carried by a `drag` step.
    #[must_use]
    pub const fn drag_event(&self) -> Option<DragEvent> {
        match self {
            Self::Drag { phase, dx, dy, .. } => Some(DragEvent::new(*phase, Delta::new(*dx, *dy))),
            _ => None,
        }
    }

    /// The metrics carried by a `window` step.
    #[must_use]
    pub const fn window_metrics(&self) -> Option<WindowMetrics> {
        match self {
            Self::Window {
                width,
                height,
                orientation: Some(orientation),
            } => Some(WindowMetrics::new(*width, *height, *orientation)),
            Self::Window {
                width,
                height,
                orientation: None,
            } => Some(WindowMetrics::from_dimensions(*width, *height)),
            _ => None,
        }
    }
}

/// A parsed step and its 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub step: Step,
}

/// Parse a JSONL script.
pub fn parse_script(text: &str) -> Result<Vec<ScriptLine>> {
    let mut steps = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let step: Step =
            serde_json::from_str(trimmed).map_err(|error| ReplayError::ScriptParse {
                line,
                message: error.to_string(),
            })?;
        if let Step::Pointer {
            panel: None,
            kind: PointerEventKind::Down,
            ..
        } = step
        {
            return Err(ReplayError::ScriptParse {
                line,
                message: "pointer down needs a panel".to_string(),
            });
        }
        steps.push(ScriptLine { line, step });
    }
    Ok(steps)
}

/// Read and parse a script file.
pub fn load_script(path: &Path) -> Result<Vec<ScriptLine>> {
    let text = std::fs::read_to_string(path).map_err(|error| {
        if error.kind() == std::io::ErrorKind::NotFound {
            ReplayError::MissingScript {
                path: path.to_path_buf(),
            }
        } else {
            ReplayError::Io(error)
        }
    })?;
    parse_script(&text)
}
