#![forbid(unsafe_code)]

//! Board configuration as data.
//!
//! ```toml
//! # costream.toml
//! storage_key = "costream-layout"
//! min_panel_size = 20
//! drag_axis = "all"
//! default_layout = "orientation"
//!
//! [window]
//! width = 1280
//! height = 800
//! orientation = "landscape"
//! ```
//!
//! ```rust,ignore
//! let config = BoardConfig::from_toml_file("costream.toml")?;
//! ```
//!
//! Every field has a default matching the product constants, so a partial file
//! (or none at all) is valid.

#[cfg(feature = "board-config")]
use std::path::Path;

use costream_core::geometry::{Axis, Size};
use costream_core::window::WindowMetrics;
use costream_layout::{
    DEFAULT_PANEL_SIZE, MIN_PANEL_SIZE, OrientationPresets, PRESET_PANEL_COUNT, PresetStrategy,
    SeedLayout,
};
use serde::{Deserialize, Serialize};

use crate::persistence::DEFAULT_LAYOUT_KEY;

/// Which strategy produces the layout when nothing is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultLayoutKind {
    /// Window-orientation presets.
    #[default]
    Orientation,
    /// Fixed panels stacked at the origin.
    Seed,
}

/// Tunables for one board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Storage key for the persisted layout.
    pub storage_key: String,
    /// Smallest committed width or height.
    pub min_panel_size: i32,
    /// Axis constraint for drags.
    pub drag_axis: Axis,
    pub default_layout: DefaultLayoutKind,
    /// Panel count for [`DefaultLayoutKind::Seed`].
    pub seed_panel_count: usize,
    /// Side length of seeded and added panels.
    pub seed_panel_size: i32,
    /// Window metrics assumed until the host reports real ones.
    pub window: WindowMetrics,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_LAYOUT_KEY.to_owned(),
            min_panel_size: MIN_PANEL_SIZE,
            drag_axis: Axis::All,
            default_layout: DefaultLayoutKind::Orientation,
            seed_panel_count: PRESET_PANEL_COUNT,
            seed_panel_size: DEFAULT_PANEL_SIZE,
            window: WindowMetrics::default(),
        }
    }
}

impl BoardConfig {
    /// Load from a TOML string and validate.
    #[cfg(feature = "board-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file on disk and validate.
    #[cfg(feature = "board-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string and validate.
    #[cfg(feature = "board-config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field is within range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        if self.storage_key.trim().is_empty() {
            errors.push("storage_key must not be empty".to_owned());
        }
        if self.min_panel_size <= 0 {
            errors.push(format!(
                "min_panel_size must be > 0, got {}",
                self.min_panel_size
            ));
        }
        if self.seed_panel_size < self.min_panel_size {
            errors.push(format!(
                "seed_panel_size {} is below min_panel_size {}",
                self.seed_panel_size, self.min_panel_size
            ));
        }
        if self.window.width < 0 || self.window.height < 0 {
            errors.push(format!(
                "window dimensions must be >= 0, got {}x{}",
                self.window.width, self.window.height
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Default-layout strategy selected by this config.
    #[must_use]
    pub fn strategy(&self) -> Box<dyn PresetStrategy> {
        match self.default_layout {
            DefaultLayoutKind::Orientation => Box::new(OrientationPresets),
            DefaultLayoutKind::Seed => Box::new(SeedLayout::new(
                self.seed_panel_count,
                Size::square(self.seed_panel_size),
            )),
        }
    }

    /// Size given to panels added without explicit geometry.
    #[must_use]
    pub const fn new_panel_size(&self) -> Size {
        Size::square(self.seed_panel_size)
    }
}

/// Errors from loading or validating a [`BoardConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    #[cfg(feature = "board-config")]
    Toml(toml::de::Error),
    #[cfg(feature = "board-config")]
    Json(serde_json::Error),
    /// One message per out-of-range field.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "board-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "board-config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => write!(f, "invalid board config: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "board-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "board-config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
