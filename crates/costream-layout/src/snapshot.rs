//! Persisted layout schema with versioning and validation.
//!
//! A [`LayoutSnapshot`] is the full serialized state of all panels: an ordered
//! list of `{id, x, y, width, height}` records.
//!
//! # Schema Versioning Policy
//!
//! - Snapshots are written as a versioned envelope:
//!   `{"schema_version": 1, "panels": [...]}`.
//! - A bare JSON array of records (the pre-envelope format) is still accepted
//!   on load and migrated to the current version.
//! - Unknown future versions are rejected so the caller can fall back.
//!
//! # Validation
//!
//! Parsing catches missing fields and wrong types. [`LayoutSnapshot::validate`]
//! adds the structural rules serde cannot express: non-empty ids, no duplicate
//! ids, and every dimension at or above the minimum panel size.

use std::fmt;

use costream_core::geometry::{Point, Rect, Size};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::panel::{Panel, PanelId};

/// Current layout schema version.
pub const LAYOUT_SCHEMA_VERSION: u16 = 1;

/// One persisted panel record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelRecord {
    pub id: PanelId,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PanelRecord {
    #[must_use]
    pub fn from_panel(panel: &Panel) -> Self {
        Self {
            id: panel.id.clone(),
            x: panel.position.x,
            y: panel.position.y,
            width: panel.size.width,
            height: panel.size.height,
        }
    }

    #[must_use]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    #[must_use]
    pub const fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    #[must_use]
    pub fn to_panel(&self) -> Panel {
        Panel::new(self.id.clone(), self.position(), self.size())
    }
}

/// Full ordered layout state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LayoutSnapshot {
    panels: Vec<PanelRecord>,
}

#[derive(Serialize, Deserialize)]
struct LayoutEnvelope {
    schema_version: u16,
    panels: Vec<PanelRecord>,
}

#[derive(Serialize)]
struct LayoutEnvelopeRef<'a> {
    schema_version: u16,
    panels: &'a [PanelRecord],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredLayout {
    Versioned(LayoutEnvelope),
    Bare(Vec<PanelRecord>),
}

impl LayoutSnapshot {
    #[must_use]
    pub fn new(panels: Vec<PanelRecord>) -> Self {
        Self { panels }
    }

    /// Snapshot of panels in iteration order.
    pub fn from_panels<'a>(panels: impl IntoIterator<Item = &'a Panel>) -> Self {
        Self {
            panels: panels.into_iter().map(PanelRecord::from_panel).collect(),
        }
    }

    /// Assign sequential ids `"1"..="n"` to a list of rectangles, raising each
    /// dimension to at least `min_size`.
    #[must_use]
    pub fn from_rects(rects: &[Rect], min_size: i32) -> Self {
        let panels = rects
            .iter()
            .enumerate()
            .map(|(index, rect)| {
                let size = rect.size().at_least(min_size);
                PanelRecord {
                    id: PanelId::from_sequence(index as u64 + 1),
                    x: rect.x,
                    y: rect.y,
                    width: size.width,
                    height: size.height,
                }
            })
            .collect();
        Self { panels }
    }

    #[must_use]
    pub fn records(&self) -> &[PanelRecord] {
        &self.panels
    }

    pub fn iter(&self) -> impl Iterator<Item = &PanelRecord> + '_ {
        self.panels.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Record for a panel id, if present.
    #[must_use]
    pub fn get(&self, id: &PanelId) -> Option<&PanelRecord> {
        self.panels.iter().find(|record| &record.id == id)
    }

    /// Validate structural invariants.
    pub fn validate(&self, min_size: i32) -> Result<(), SnapshotError> {
        let mut seen = FxHashSet::default();
        for (index, record) in self.panels.iter().enumerate() {
            if record.id.is_empty() {
                return Err(SnapshotError::EmptyPanelId { index });
            }
            if !seen.insert(&record.id) {
                return Err(SnapshotError::DuplicatePanelId(record.id.clone()));
            }
            if !record.size().fits_minimum(min_size) {
                return Err(SnapshotError::BelowMinimumSize {
                    id: record.id.clone(),
                    width: record.width,
                    height: record.height,
                    min: min_size,
                });
            }
        }
        Ok(())
    }

    /// Serialize to the versioned JSON envelope.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(&LayoutEnvelopeRef {
            schema_version: LAYOUT_SCHEMA_VERSION,
            panels: &self.panels,
        })
        .map_err(|err| SnapshotError::Serialize(err.to_string()))
    }

    /// Parse either the versioned envelope or a bare record array.
    ///
    /// Parsing does not run [`validate`](Self::validate); callers decide the
    /// minimum size to validate against.
    pub fn from_json(raw: &str) -> Result<Self, SnapshotError> {
        let stored: StoredLayout =
            serde_json::from_str(raw).map_err(|err| SnapshotError::Parse(err.to_string()))?;
        match stored {
            StoredLayout::Versioned(envelope) => {
                if envelope.schema_version != LAYOUT_SCHEMA_VERSION {
                    return Err(SnapshotError::UnsupportedVersion {
                        found: envelope.schema_version,
                        expected: LAYOUT_SCHEMA_VERSION,
                    });
                }
                Ok(Self::new(envelope.panels))
            }
            StoredLayout::Bare(panels) => Ok(Self::new(panels)),
        }
    }
}

impl<'a> IntoIterator for &'a LayoutSnapshot {
    type Item = &'a PanelRecord;
    type IntoIter = std::slice::Iter<'a, PanelRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.panels.iter()
    }
}

/// Errors from snapshot parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// Stored text is not valid JSON or does not match the record shape.
    Parse(String),
    /// Serialization failed.
    Serialize(String),
    /// Envelope carries a schema version this build does not understand.
    UnsupportedVersion { found: u16, expected: u16 },
    /// Record at `index` has an empty id.
    EmptyPanelId { index: usize },
    /// Two records share an id.
    DuplicatePanelId(PanelId),
    /// Record has a dimension below the minimum panel size.
    BelowMinimumSize {
        id: PanelId,
        width: i32,
        height: i32,
        min: i32,
    },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(reason) => write!(f, "layout parse failed: {reason}"),
            Self::Serialize(reason) => write!(f, "layout serialization failed: {reason}"),
            Self::UnsupportedVersion { found, expected } => write!(
                f,
                "unsupported layout schema version {found} (expected {expected})"
            ),
            Self::EmptyPanelId { index } => write!(f, "panel record {index} has an empty id"),
            Self::DuplicatePanelId(id) => write!(f, "duplicate panel id {id}"),
            Self::BelowMinimumSize {
                id,
                width,
                height,
                min,
            } => write!(
                f,
                "panel {id} size {width}x{height} is below the minimum of {min}"
            ),
        }
    }
}

impl std::error::Error for SnapshotError {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(id: &str, x: i32, y: i32, width: i32, height: i32) -> PanelRecord {
        PanelRecord {
            id: id.into(),
            x,
            y,
            width,
            height,
        }
    }

    fn three_panels() -> LayoutSnapshot {
        LayoutSnapshot::new(vec![
            record("1", 0, 0, 200, 200),
            record("2", 50, -20, 200, 200),
            record("3", 0, 0, 200, 200),
        ])
    }

    #[test]
    fn serializes_versioned_envelope() {
        let json = LayoutSnapshot::new(vec![record("1", 1, 2, 30, 40)])
            .to_json()
            .expect("serialize");
        assert_eq!(
            json,
            r#"{"schema_version":1,"panels":[{"id":"1","x":1,"y":2,"width":30,"height":40}]}"#
        );
    }

    #[test]
    fn json_roundtrip_preserves_order_and_integers() {
        let snapshot = three_panels();
        let parsed = LayoutSnapshot::from_json(&snapshot.to_json().expect("serialize"))
            .expect("parse");
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn bare_array_is_migrated() {
        let raw = r#"[{"id":"a","x":3,"y":4,"width":100,"height":120}]"#;
        let parsed = LayoutSnapshot::from_json(raw).expect("parse bare");
        assert_eq!(parsed.records(), &[record("a", 3, 4, 100, 120)]);
    }

    #[test]
    fn future_version_is_rejected() {
        let raw = r#"{"schema_version":9,"panels":[]}"#;
        assert_eq!(
            LayoutSnapshot::from_json(raw),
            Err(SnapshotError::UnsupportedVersion {
                found: 9,
                expected: LAYOUT_SCHEMA_VERSION,
            })
        );
    }

    #[test]
    fn missing_field_fails_to_parse() {
        let raw = r#"[{"id":"1","x":0,"y":0}]"#;
        assert!(matches!(
            LayoutSnapshot::from_json(raw),
            Err(SnapshotError::Parse(_))
        ));
    }

    #[test]
    fn wrong_type_fails_to_parse() {
        let raw = r#"[{"id":"1","x":"0","y":0,"width":20,"height":20}]"#;
        assert!(matches!(
            LayoutSnapshot::from_json(raw),
            Err(SnapshotError::Parse(_))
        ));
    }

    #[test]
    fn garbage_fails_to_parse() {
        assert!(matches!(
            LayoutSnapshot::from_json("not json"),
            Err(SnapshotError::Parse(_))
        ));
    }

    #[test]
    fn validate_accepts_well_formed() {
        assert_eq!(three_panels().validate(20), Ok(()));
        assert_eq!(LayoutSnapshot::default().validate(20), Ok(()));
    }

    #[test]
    fn validate_rejects_duplicate_id() {
        let snapshot = LayoutSnapshot::new(vec![
            record("1", 0, 0, 200, 200),
            record("1", 5, 5, 200, 200),
        ]);
        assert_eq!(
            snapshot.validate(20),
            Err(SnapshotError::DuplicatePanelId("1".into()))
        );
    }

    #[test]
    fn validate_rejects_empty_id() {
        let snapshot = LayoutSnapshot::new(vec![record("", 0, 0, 200, 200)]);
        assert_eq!(
            snapshot.validate(20),
            Err(SnapshotError::EmptyPanelId { index: 0 })
        );
    }

    #[test]
    fn validate_rejects_undersized_panel() {
        let snapshot = LayoutSnapshot::new(vec![record("1", 0, 0, 5, 200)]);
        assert!(matches!(
            snapshot.validate(20),
            Err(SnapshotError::BelowMinimumSize { width: 5, .. })
        ));
    }

    #[test]
    fn from_rects_assigns_sequential_ids_and_enforces_minimum() {
        let snapshot =
            LayoutSnapshot::from_rects(&[Rect::new(0, 0, 10, 300), Rect::new(10, 0, 50, 50)], 20);
        assert_eq!(
            snapshot.records(),
            &[record("1", 0, 0, 20, 300), record("2", 10, 0, 50, 50)]
        );
    }

    #[test]
    fn error_display() {
        assert_eq!(
            SnapshotError::DuplicatePanelId("4".into()).to_string(),
            "duplicate panel id 4"
        );
        assert_eq!(
            SnapshotError::UnsupportedVersion {
                found: 2,
                expected: 1
            }
            .to_string(),
            "unsupported layout schema version 2 (expected 1)"
        );
    }
}
