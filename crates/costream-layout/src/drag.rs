//! Drag gesture controller.
//!
//! ```text
//! Idle --start--> Active { anchor, preview } --end--> Idle   (one commit)
//!                        \----------------cancel----> Idle   (no commit)
//! ```
//!
//! Each panel id owns an independent session, so interleaved drags on
//! different panels never observe each other. Movement reported by the event
//! source is cumulative since the gesture started and is applied verbatim:
//! `preview = anchor + movement`, never re-accumulated.
//!
//! # Failure Modes
//!
//! - Events that do not fit the current state (a `move` with no active
//!   session, a second `start`) produce [`DragEffect::Noop`] with a reason and
//!   leave everything untouched.
//! - `start` on an unknown panel fails with
//!   [`LayoutError::PanelNotFound`](crate::LayoutError::PanelNotFound).
//! - If the panel disappears before `end`, the session is dropped and the
//!   error is returned; the store is not written.

use std::collections::BTreeMap;

use costream_core::event::{DragEvent, DragPhase};
use costream_core::geometry::{Axis, Delta, Point, Rect, Size};
use serde::{Deserialize, Serialize};

use crate::bounds::clamp;
use crate::error::LayoutResult;
use crate::panel::PanelId;
use crate::store::PanelStore;

/// Lifecycle state of one panel's drag session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragState {
    Idle,
    Active { anchor: Point, preview: Point },
}

/// Why a drag event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragNoopReason {
    IdleWithoutActiveDrag,
    DragAlreadyInProgress,
}

/// Effect produced by one drag event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum DragEffect {
    Started {
        anchor: Point,
    },
    Preview {
        position: Point,
    },
    /// `unclamped` is `anchor + movement`; `position` is what the store holds.
    Committed {
        unclamped: Point,
        position: Point,
    },
    Canceled,
    Noop {
        reason: DragNoopReason,
    },
}

/// One drag state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragTransition {
    pub transition_id: u64,
    pub panel: PanelId,
    pub from: DragState,
    pub to: DragState,
    pub effect: DragEffect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DragSession {
    anchor: Point,
    preview: Point,
}

impl DragSession {
    const fn state(self) -> DragState {
        DragState::Active {
            anchor: self.anchor,
            preview: self.preview,
        }
    }
}

/// Per-panel drag sessions with live preview and a single commit on release.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    sessions: BTreeMap<PanelId, DragSession>,
    axis: Axis,
    transition_counter: u64,
}

impl DragController {
    #[must_use]
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            ..Self::default()
        }
    }

    /// Axis constraint applied to every movement.
    #[must_use]
    pub const fn axis(&self) -> Axis {
        self.axis
    }

    /// Current state of a panel's session.
    #[must_use]
    pub fn state(&self, id: &PanelId) -> DragState {
        self.sessions
            .get(id)
            .map_or(DragState::Idle, |session| session.state())
    }

    /// Live preview position, if the panel is being dragged.
    #[must_use]
    pub fn preview(&self, id: &PanelId) -> Option<Point> {
        self.sessions.get(id).map(|session| session.preview)
    }

    #[must_use]
    pub fn is_dragging(&self, id: &PanelId) -> bool {
        self.sessions.contains_key(id)
    }

    /// Number of panels with an active drag.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }

    /// Feed one drag event for `id`.
    ///
    /// Only `end` writes to the store, and it writes exactly once.
    pub fn apply(
        &mut self,
        store: &mut PanelStore,
        id: &PanelId,
        event: DragEvent,
        container: Size,
    ) -> LayoutResult<DragTransition> {
        let from = self.state(id);
        let movement = self.axis.project(event.movement);

        let idle = DragEffect::Noop {
            reason: DragNoopReason::IdleWithoutActiveDrag,
        };
        let effect = match event.phase {
            DragPhase::Start if self.sessions.contains_key(id) => DragEffect::Noop {
                reason: DragNoopReason::DragAlreadyInProgress,
            },
            DragPhase::Start => {
                let anchor = store.get(id)?.position;
                self.sessions.insert(
                    id.clone(),
                    DragSession {
                        anchor,
                        preview: anchor,
                    },
                );
                DragEffect::Started { anchor }
            }
            DragPhase::Move => match self.sessions.get_mut(id) {
                Some(session) => {
                    session.preview = session.anchor + movement;
                    DragEffect::Preview {
                        position: session.preview,
                    }
                }
                None => idle,
            },
            DragPhase::End => match self.sessions.remove(id) {
                Some(session) => {
                    let (unclamped, position) =
                        commit(store, id, session.anchor, movement, container)?;
                    DragEffect::Committed {
                        unclamped,
                        position,
                    }
                }
                None => idle,
            },
            DragPhase::Cancel => match self.sessions.remove(id) {
                Some(_) => DragEffect::Canceled,
                None => idle,
            },
        };

        Ok(self.transition(id, from, effect))
    }

    /// Drop a panel's session without committing.
    pub fn force_cancel(&mut self, id: &PanelId) -> Option<DragTransition> {
        let from = self.state(id);
        self.sessions.remove(id)?;
        Some(self.transition(id, from, DragEffect::Canceled))
    }

    /// Drop every session without committing.
    pub fn cancel_all(&mut self) -> Vec<DragTransition> {
        let ids: Vec<PanelId> = self.sessions.keys().cloned().collect();
        ids.iter().filter_map(|id| self.force_cancel(id)).collect()
    }

    fn transition(&mut self, id: &PanelId, from: DragState, effect: DragEffect) -> DragTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        DragTransition {
            transition_id: self.transition_counter,
            panel: id.clone(),
            from,
            to: self.state(id),
            effect,
        }
    }
}

fn commit(
    store: &mut PanelStore,
    id: &PanelId,
    anchor: Point,
    movement: Delta,
    container: Size,
) -> LayoutResult<(Point, Point)> {
    let size = store.get(id)?.size;
    let unclamped = anchor + movement;
    let position = clamp(Rect::from_parts(unclamped, size), container).position();
    store.upsert(id, position, size)?;
    Ok((unclamped, position))
}
