#![forbid(unsafe_code)]

//! Resize-handle controller with scoped pointer listeners.
//!
//! A resize session is created by a pointer-down on a panel's handle and
//! destroyed by the matching pointer-up or a forced teardown. The controller
//! tells the host when to attach and detach its window-level move/up listeners
//! through [`ListenerCommand`]s carried on each [`ResizeDispatch`]:
//!
//! ```text
//! pointer_down ──► Attach { pointer_id, session }
//! pointer_move ──► (no command)
//! pointer_up   ──► Detach { pointer_id, session }   + commit
//! teardown     ──► Detach { pointer_id, session }   (no commit)
//! ```
//!
//! # Invariants
//!
//! 1. At most one session is active at a time. A second pointer-down while a
//!    session is live is ignored; it does not steal the listeners.
//! 2. Every `Attach` is followed by exactly one `Detach` for the same session.
//!    No `Detach` is emitted for a session that is not active.
//! 3. Move and up events are addressed by [`ResizeSessionId`] and pointer id.
//!    Events carrying a stale session handle or a foreign pointer are ignored.
//! 4. Preview and committed sizes are raised to the store minimum per
//!    dimension. There is no upper bound and no container clamp.
//!
//! # Failure Modes
//!
//! - Pointer-down on an unknown panel returns
//!   [`LayoutError::PanelNotFound`](crate::LayoutError::PanelNotFound) and
//!   attaches nothing.
//! - If the panel vanished before pointer-up, or the store rejects the commit,
//!   the session is torn down (listeners released) and nothing is written.

use costream_core::geometry::{Point, Size};
use serde::{Deserialize, Serialize};

use crate::error::LayoutResult;
use crate::panel::PanelId;
use crate::store::PanelStore;

/// Handle identifying one resize session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResizeSessionId(pub u64);

/// Host command for the global pointer listeners owned by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ListenerCommand {
    Attach {
        pointer_id: u32,
        session: ResizeSessionId,
    },
    Detach {
        pointer_id: u32,
        session: ResizeSessionId,
    },
}

impl ListenerCommand {
    #[must_use]
    pub const fn session(self) -> ResizeSessionId {
        match self {
            Self::Attach { session, .. } | Self::Detach { session, .. } => session,
        }
    }
}

/// Controller state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ResizeState {
    Idle,
    Resizing {
        panel: PanelId,
        session: ResizeSessionId,
        pointer_id: u32,
        start_size: Size,
        start_pointer: Point,
        preview: Size,
    },
}

/// Why a pointer event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeIgnoredReason {
    SessionAlreadyActive,
    NoActiveSession,
    StaleSession,
    PointerMismatch,
}

/// Why a session ended without a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeardownReason {
    /// The panel was gone by pointer-up.
    PanelMissing,
    /// The store refused the committed geometry.
    CommitRejected,
    /// The component owning the panel went away mid-gesture.
    OwnerGone,
    /// The host is shutting the board down.
    Shutdown,
}

/// Effect of one resize dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum ResizeEffect {
    Started { start_size: Size },
    Preview { size: Size },
    Committed { size: Size },
    TornDown { reason: TeardownReason },
    Ignored { reason: ResizeIgnoredReason },
}

/// Result of one resize input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeDispatch {
    pub panel: Option<PanelId>,
    pub session: Option<ResizeSessionId>,
    pub effect: ResizeEffect,
    pub listener: Option<ListenerCommand>,
}

impl ResizeDispatch {
    fn ignored(panel: Option<PanelId>, reason: ResizeIgnoredReason) -> Self {
        Self {
            panel,
            session: None,
            effect: ResizeEffect::Ignored { reason },
            listener: None,
        }
    }

    /// Whether this dispatch changed controller state.
    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        matches!(self.effect, ResizeEffect::Ignored { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ResizeSession {
    panel: PanelId,
    id: ResizeSessionId,
    pointer_id: u32,
    start_size: Size,
    start_pointer: Point,
    min_size: i32,
    preview: Size,
}

impl ResizeSession {
    fn candidate(&self, pointer: Point) -> Size {
        self.start_size
            .grown_by(pointer.delta_from(self.start_pointer))
            .at_least(self.min_size)
    }

    const fn detach(&self) -> ListenerCommand {
        ListenerCommand::Detach {
            pointer_id: self.pointer_id,
            session: self.id,
        }
    }

    fn end(self, effect: ResizeEffect) -> ResizeDispatch {
        ResizeDispatch {
            listener: Some(self.detach()),
            session: Some(self.id),
            panel: Some(self.panel),
            effect,
        }
    }
}

/// Single-session resize controller.
#[derive(Debug, Clone)]
pub struct ResizeController {
    active: Option<ResizeSession>,
    next_session: u64,
}

impl Default for ResizeController {
    fn default() -> Self {
        Self {
            active: None,
            next_session: 1,
        }
    }
}

impl ResizeController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> ResizeState {
        match &self.active {
            None => ResizeState::Idle,
            Some(session) => ResizeState::Resizing {
                panel: session.panel.clone(),
                session: session.id,
                pointer_id: session.pointer_id,
                start_size: session.start_size,
                start_pointer: session.start_pointer,
                preview: session.preview,
            },
        }
    }

    #[must_use]
    pub fn active_session(&self) -> Option<ResizeSessionId> {
        self.active.as_ref().map(|session| session.id)
    }

    #[must_use]
    pub fn active_panel(&self) -> Option<&PanelId> {
        self.active.as_ref().map(|session| &session.panel)
    }

    #[must_use]
    pub fn active_pointer_id(&self) -> Option<u32> {
        self.active.as_ref().map(|session| session.pointer_id)
    }

    /// Live preview size of the panel being resized.
    #[must_use]
    pub fn preview(&self, id: &PanelId) -> Option<Size> {
        self.active
            .as_ref()
            .filter(|session| &session.panel == id)
            .map(|session| session.preview)
    }

    #[must_use]
    pub fn is_resizing(&self, id: &PanelId) -> bool {
        self.preview(id).is_some()
    }

    /// Pointer-down on a panel's resize handle.
    pub fn pointer_down(
        &mut self,
        store: &PanelStore,
        id: &PanelId,
        pointer_id: u32,
        position: Point,
    ) -> LayoutResult<ResizeDispatch> {
        if self.active.is_some() {
            return Ok(ResizeDispatch::ignored(
                Some(id.clone()),
                ResizeIgnoredReason::SessionAlreadyActive,
            ));
        }
        let start_size = store.get(id)?.size;

        let session = ResizeSessionId(self.next_session);
        self.next_session = self.next_session.saturating_add(1);
        self.active = Some(ResizeSession {
            panel: id.clone(),
            id: session,
            pointer_id,
            start_size,
            start_pointer: position,
            min_size: store.min_size(),
            preview: start_size,
        });

        Ok(ResizeDispatch {
            panel: Some(id.clone()),
            session: Some(session),
            effect: ResizeEffect::Started { start_size },
            listener: Some(ListenerCommand::Attach {
                pointer_id,
                session,
            }),
        })
    }

    /// Pointer-move delivered to the session's listener.
    pub fn pointer_move(
        &mut self,
        session: ResizeSessionId,
        pointer_id: u32,
        position: Point,
    ) -> ResizeDispatch {
        let active = match self.addressed(session, pointer_id) {
            Ok(active) => active,
            Err(ignored) => return ignored,
        };
        active.preview = active.candidate(position);
        ResizeDispatch {
            panel: Some(active.panel.clone()),
            session: Some(active.id),
            effect: ResizeEffect::Preview {
                size: active.preview,
            },
            listener: None,
        }
    }

    /// Pointer-up delivered to the session's listener. Commits and releases.
    pub fn pointer_up(
        &mut self,
        store: &mut PanelStore,
        session: ResizeSessionId,
        pointer_id: u32,
        position: Point,
    ) -> ResizeDispatch {
        if let Err(ignored) = self.addressed(session, pointer_id) {
            return ignored;
        }
        let Some(active) = self.active.take() else {
            return ResizeDispatch::ignored(None, ResizeIgnoredReason::NoActiveSession);
        };

        let size = active.candidate(position);
        let effect = match store.get(&active.panel).map(|panel| panel.position) {
            Err(_) => ResizeEffect::TornDown {
                reason: TeardownReason::PanelMissing,
            },
            Ok(current) => match store.upsert(&active.panel, current, size) {
                Ok(()) => ResizeEffect::Committed { size },
                Err(_) => ResizeEffect::TornDown {
                    reason: TeardownReason::CommitRejected,
                },
            },
        };
        active.end(effect)
    }

    /// End the active session without committing.
    pub fn force_teardown(&mut self, reason: TeardownReason) -> Option<ResizeDispatch> {
        self.active
            .take()
            .map(|session| session.end(ResizeEffect::TornDown { reason }))
    }

    /// Tear down the active session if it belongs to `id`.
    pub fn teardown_panel(&mut self, id: &PanelId) -> Option<ResizeDispatch> {
        if self.active_panel() != Some(id) {
            return None;
        }
        self.force_teardown(TeardownReason::OwnerGone)
    }

    fn addressed(
        &mut self,
        session: ResizeSessionId,
        pointer_id: u32,
    ) -> Result<&mut ResizeSession, ResizeDispatch> {
        let Some(active) = self.active.as_mut() else {
            return Err(ResizeDispatch::ignored(
                None,
                ResizeIgnoredReason::NoActiveSession,
            ));
        };
        if active.id != session {
            return Err(ResizeDispatch::ignored(
                Some(active.panel.clone()),
                ResizeIgnoredReason::StaleSession,
            ));
        }
        if active.pointer_id != pointer_id {
            return Err(ResizeDispatch::ignored(
                Some(active.panel.clone()),
                ResizeIgnoredReason::PointerMismatch,
            ));
        }
        Ok(active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;
    use crate::panel::MIN_PANEL_SIZE;
    use crate::snapshot::LayoutSnapshot;
    use costream_core::geometry::Rect;
    use pretty_assertions::assert_eq;

    fn seeded() -> PanelStore {
        let snapshot = LayoutSnapshot::from_rects(
            &[Rect::new(0, 0, 200, 200), Rect::new(300, 40, 200, 200)],
            MIN_PANEL_SIZE,
        );
        PanelStore::from_snapshot(&snapshot, MIN_PANEL_SIZE).expect("seed")
    }

    fn begin(resize: &mut ResizeController, store: &PanelStore, id: &str) -> ResizeSessionId {
        resize
            .pointer_down(store, &id.into(), 7, Point::new(100, 100))
            .expect("down")
            .session
            .expect("session")
    }

    #[test]
    fn resize_commits_grown_size_at_current_position() {
        let mut store = seeded();
        let mut resize = ResizeController::new();
        let session = begin(&mut resize, &store, "2");

        let preview = resize.pointer_move(session, 7, Point::new(150, 180));
        assert_eq!(
            preview.effect,
            ResizeEffect::Preview {
                size: Size::new(250, 280)
            }
        );
        let up = resize.pointer_up(&mut store, session, 7, Point::new(150, 180));

        assert_eq!(
            up.effect,
            ResizeEffect::Committed {
                size: Size::new(250, 280)
            }
        );
        assert_eq!(
            store.get(&"2".into()).unwrap().rect(),
            Rect::new(300, 40, 250, 280)
        );
        assert_eq!(resize.state(), ResizeState::Idle);
    }

    #[test]
    fn shrinking_below_minimum_commits_minimum() {
        let mut store = seeded();
        let mut resize = ResizeController::new();
        let session = begin(&mut resize, &store, "1");

        // width target 5
        let up = resize.pointer_up(&mut store, session, 7, Point::new(-95, 150));
        assert_eq!(
            up.effect,
            ResizeEffect::Committed {
                size: Size::new(20, 250)
            }
        );
        assert_eq!(store.get(&"1".into()).unwrap().size, Size::new(20, 250));
    }

    #[test]
    fn preview_is_not_clamped_to_any_container() {
        let store = seeded();
        let mut resize = ResizeController::new();
        let session = begin(&mut resize, &store, "1");
        resize.pointer_move(session, 7, Point::new(5_000, 5_000));
        assert_eq!(resize.preview(&"1".into()), Some(Size::new(5_100, 5_100)));
    }

    #[test]
    fn attach_then_exactly_one_detach() {
        let mut store = seeded();
        let mut resize = ResizeController::new();
        let down = resize
            .pointer_down(&store, &"1".into(), 3, Point::ORIGIN)
            .unwrap();
        let session = down.session.unwrap();
        assert_eq!(
            down.listener,
            Some(ListenerCommand::Attach {
                pointer_id: 3,
                session
            })
        );

        let up = resize.pointer_up(&mut store, session, 3, Point::new(10, 10));
        assert_eq!(
            up.listener,
            Some(ListenerCommand::Detach {
                pointer_id: 3,
                session
            })
        );

        // A late move after release must not resize anything.
        let late = resize.pointer_move(session, 3, Point::new(90, 90));
        assert_eq!(
            late.effect,
            ResizeEffect::Ignored {
                reason: ResizeIgnoredReason::NoActiveSession
            }
        );
        assert_eq!(late.listener, None);
        assert_eq!(store.get(&"1".into()).unwrap().size, Size::new(210, 210));
    }

    #[test]
    fn second_pointer_down_does_not_steal_session() {
        let store = seeded();
        let mut resize = ResizeController::new();
        let session = begin(&mut resize, &store, "1");

        let other = resize
            .pointer_down(&store, &"2".into(), 8, Point::ORIGIN)
            .unwrap();
        assert!(other.is_ignored());
        assert_eq!(other.listener, None);
        assert_eq!(resize.active_session(), Some(session));

        // The original gesture keeps receiving moves.
        let moved = resize.pointer_move(session, 7, Point::new(120, 100));
        assert_eq!(
            moved.effect,
            ResizeEffect::Preview {
                size: Size::new(220, 200)
            }
        );
    }

    #[test]
    fn foreign_pointer_and_stale_session_are_ignored() {
        let mut store = seeded();
        let mut resize = ResizeController::new();
        let first = begin(&mut resize, &store, "1");
        resize.pointer_up(&mut store, first, 7, Point::new(100, 100));
        let second = begin(&mut resize, &store, "1");

        let stale = resize.pointer_move(first, 7, Point::new(0, 0));
        assert_eq!(
            stale.effect,
            ResizeEffect::Ignored {
                reason: ResizeIgnoredReason::StaleSession
            }
        );
        let foreign = resize.pointer_up(&mut store, second, 99, Point::new(0, 0));
        assert_eq!(
            foreign.effect,
            ResizeEffect::Ignored {
                reason: ResizeIgnoredReason::PointerMismatch
            }
        );
        assert_eq!(resize.active_session(), Some(second));
    }

    #[test]
    fn teardown_detaches_without_commit() {
        let mut store = seeded();
        let commits = std::rc::Rc::new(std::cell::Cell::new(0));
        let sink = std::rc::Rc::clone(&commits);
        store.subscribe(move |_| sink.set(sink.get() + 1));

        let mut resize = ResizeController::new();
        let session = begin(&mut resize, &store, "2");
        resize.pointer_move(session, 7, Point::new(400, 400));

        assert!(resize.teardown_panel(&"1".into()).is_none());
        let torn = resize.teardown_panel(&"2".into()).expect("active");
        assert_eq!(
            torn.effect,
            ResizeEffect::TornDown {
                reason: TeardownReason::OwnerGone
            }
        );
        assert_eq!(torn.listener.map(ListenerCommand::session), Some(session));
        assert!(resize.force_teardown(TeardownReason::Shutdown).is_none());
        assert_eq!(store.get(&"2".into()).unwrap().size, Size::square(200));
        assert_eq!(commits.get(), 0);
    }

    #[test]
    fn pointer_down_on_unknown_panel_attaches_nothing() {
        let store = seeded();
        let mut resize = ResizeController::new();
        let err = resize
            .pointer_down(&store, &"9".into(), 1, Point::ORIGIN)
            .unwrap_err();
        assert_eq!(err, LayoutError::PanelNotFound("9".into()));
        assert_eq!(resize.state(), ResizeState::Idle);
    }

    #[test]
    fn session_ids_are_never_reused() {
        let mut store = seeded();
        let mut resize = ResizeController::new();
        let a = begin(&mut resize, &store, "1");
        resize.pointer_up(&mut store, a, 7, Point::new(100, 100));
        let b = begin(&mut resize, &store, "1");
        assert!(b > a);
    }
}
