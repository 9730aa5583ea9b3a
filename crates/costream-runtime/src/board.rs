#![forbid(unsafe_code)]

//! The board: one panel store, both gesture controllers and persistence.
//!
//! # Boot
//!
//! ```text
//! storage ──load──► Stored layout ──────────────┐
//!    │                                          ├──► PanelStore::from_snapshot
//!    └─(missing / malformed / unavailable)──► preset(strategy, window)
//! ```
//!
//! After boot the store's only subscriber is the persistence sink: every
//! commit (drag release, resize release, added panel) saves synchronously.
//!
//! # Invariants
//!
//! 1. A panel is never dragged and resized at the same time. Starting one
//!    gesture while the other owns the panel fails with
//!    [`LayoutError::GestureConflict`].
//! 2. Window metrics only re-seed the layout while nothing has been stored or
//!    committed, and never during an active gesture.
//! 3. Teardown paths ([`Board::detach_panel`], [`Board::shutdown`]) cancel
//!    drags and release resize listeners without committing.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use costream_core::event::{DragEvent, DragPhase};
use costream_core::geometry::{Point, Rect};
use costream_core::window::WindowMetrics;
use costream_layout::{
    DragController, DragEffect, DragTransition, GestureKind, LayoutError, LayoutResult, Panel,
    PanelId, PanelStore, PresetStrategy, ResizeController, ResizeDispatch, ResizeEffect,
    ResizeSessionId, TeardownReason, default_snapshot,
};
use tracing::{debug, info};

use crate::config::{BoardConfig, ConfigError};
use crate::persistence::{LayoutPersistence, LoadSource, PersistenceStats};
use crate::storage::{StorageBackend, StorageError};

/// Errors from booting a board.
#[derive(Debug)]
pub enum BoardError {
    Config(ConfigError),
    Layout(LayoutError),
    Storage(StorageError),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "board config rejected: {e}"),
            Self::Layout(e) => write!(f, "board layout rejected: {e}"),
            Self::Storage(e) => write!(f, "board storage failed: {e}"),
        }
    }
}

impl std::error::Error for BoardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Layout(e) => Some(e),
            Self::Storage(e) => Some(e),
        }
    }
}

impl From<ConfigError> for BoardError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<LayoutError> for BoardError {
    fn from(e: LayoutError) -> Self {
        Self::Layout(e)
    }
}

impl From<StorageError> for BoardError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

/// One panel as the renderer should draw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub id: PanelId,
    /// Geometry held by the store.
    pub committed: Rect,
    /// Geometry to draw: the live preview while a gesture is active.
    pub display: Rect,
    pub gesture: Option<GestureKind>,
}

/// Panel board runtime.
pub struct Board {
    config: BoardConfig,
    store: PanelStore,
    drag: DragController,
    resize: ResizeController,
    persistence: Rc<RefCell<LayoutPersistence>>,
    commits: Rc<Cell<u64>>,
    strategy: Box<dyn PresetStrategy>,
    window: WindowMetrics,
    load_source: LoadSource,
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("store", &self.store)
            .field("drag", &self.drag)
            .field("resize", &self.resize)
            .field("strategy", &self.strategy.name())
            .field("window", &self.window)
            .field("load_source", &self.load_source)
            .field("commits", &self.commits.get())
            .finish()
    }
}

impl Board {
    /// Boot with the strategy selected by `config`.
    pub fn boot(config: BoardConfig, backend: Box<dyn StorageBackend>) -> Result<Self, BoardError> {
        let strategy = config.strategy();
        Self::with_strategy(config, backend, strategy)
    }

    /// Boot with an injected default-layout strategy.
    pub fn with_strategy(
        config: BoardConfig,
        backend: Box<dyn StorageBackend>,
        strategy: Box<dyn PresetStrategy>,
    ) -> Result<Self, BoardError> {
        config.validate()?;
        let window = config.window;
        let min_size = config.min_panel_size;

        let mut persistence =
            LayoutPersistence::new(backend, config.storage_key.clone(), min_size);
        let outcome = persistence.load(|| default_snapshot(strategy.as_ref(), window, min_size));
        let mut store = PanelStore::from_snapshot(&outcome.snapshot, min_size)?;

        info!(
            key = %config.storage_key,
            backend = persistence.backend_name(),
            source = outcome.source.as_str(),
            strategy = strategy.name(),
            panels = store.len(),
            "board booted"
        );

        let persistence = Rc::new(RefCell::new(persistence));
        let commits = Rc::new(Cell::new(0));
        {
            let persistence = Rc::clone(&persistence);
            let commits = Rc::clone(&commits);
            store.subscribe(move |snapshot| {
                commits.set(commits.get() + 1);
                persistence.borrow_mut().save(snapshot);
            });
        }

        Ok(Self {
            drag: DragController::new(config.drag_axis),
            resize: ResizeController::new(),
            config,
            store,
            persistence,
            commits,
            strategy,
            window,
            load_source: outcome.source,
        })
    }

    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &PanelStore {
        &self.store
    }

    #[must_use]
    pub const fn window(&self) -> WindowMetrics {
        self.window
    }

    /// How the boot layout was obtained.
    #[must_use]
    pub const fn load_source(&self) -> LoadSource {
        self.load_source
    }

    /// Number of commits since boot.
    #[must_use]
    pub fn commits(&self) -> u64 {
        self.commits.get()
    }

    #[must_use]
    pub fn persistence_stats(&self) -> PersistenceStats {
        self.persistence.borrow().stats()
    }

    /// Whether the layout came from storage or has been committed since.
    #[must_use]
    pub fn has_persisted_layout(&self) -> bool {
        self.load_source.is_stored() || self.commits.get() > 0
    }

    /// Panels in display order.
    pub fn panels(&self) -> impl ExactSizeIterator<Item = &Panel> + '_ {
        self.store.list()
    }

    #[must_use]
    pub fn drag_controller(&self) -> &DragController {
        &self.drag
    }

    #[must_use]
    pub fn resize_controller(&self) -> &ResizeController {
        &self.resize
    }

    /// Feed a drag event for a panel.
    pub fn drag(&mut self, id: &PanelId, event: DragEvent) -> LayoutResult<DragTransition> {
        if event.phase == DragPhase::Start && self.resize.is_resizing(id) {
            return Err(LayoutError::GestureConflict {
                id: id.clone(),
                active: GestureKind::Resize,
            });
        }
        let transition = self
            .drag
            .apply(&mut self.store, id, event, self.window.container())?;
        if let DragEffect::Committed {
            unclamped,
            position,
        } = transition.effect
        {
            debug!(
                panel = %id,
                x = position.x,
                y = position.y,
                clamped = unclamped != position,
                "drag committed"
            );
        }
        Ok(transition)
    }

    /// Pointer-down on a panel's resize handle.
    pub fn resize_pointer_down(
        &mut self,
        id: &PanelId,
        pointer_id: u32,
        position: Point,
    ) -> LayoutResult<ResizeDispatch> {
        if self.drag.is_dragging(id) {
            return Err(LayoutError::GestureConflict {
                id: id.clone(),
                active: GestureKind::Drag,
            });
        }
        self.resize
            .pointer_down(&self.store, id, pointer_id, position)
    }

    pub fn resize_pointer_move(
        &mut self,
        session: ResizeSessionId,
        pointer_id: u32,
        position: Point,
    ) -> ResizeDispatch {
        self.resize.pointer_move(session, pointer_id, position)
    }

    pub fn resize_pointer_up(
        &mut self,
        session: ResizeSessionId,
        pointer_id: u32,
        position: Point,
    ) -> ResizeDispatch {
        let dispatch = self
            .resize
            .pointer_up(&mut self.store, session, pointer_id, position);
        match (&dispatch.panel, dispatch.effect) {
            (Some(panel), ResizeEffect::Committed { size }) => {
                debug!(panel = %panel, width = size.width, height = size.height, "resize committed");
            }
            (Some(panel), ResizeEffect::TornDown { reason }) => {
                debug!(panel = %panel, ?reason, "resize ended without commit");
            }
            _ => {}
        }
        dispatch
    }

    /// Take a new window snapshot. Returns whether the layout was re-seeded.
    pub fn set_window_metrics(&mut self, metrics: WindowMetrics) -> LayoutResult<bool> {
        self.window = metrics;
        if self.has_persisted_layout()
            || self.drag.active_count() > 0
            || self.resize.active_session().is_some()
        {
            return Ok(false);
        }
        let preset = default_snapshot(self.strategy.as_ref(), metrics, self.store.min_size());
        self.store.reset_to(&preset)?;
        debug!(
            width = metrics.width,
            height = metrics.height,
            orientation = ?metrics.orientation,
            "default layout re-seeded"
        );
        Ok(true)
    }

    /// Append a panel with the default size at the origin.
    pub fn add_panel(&mut self) -> LayoutResult<PanelId> {
        let id = self
            .store
            .add(Point::ORIGIN, self.config.new_panel_size())?;
        debug!(panel = %id, "panel added");
        Ok(id)
    }

    /// Committed geometry merged with live previews.
    #[must_use]
    pub fn render_list(&self) -> Vec<PanelView> {
        self.store
            .list()
            .map(|panel| {
                let committed = panel.rect();
                let (display, gesture) = if let Some(position) = self.drag.preview(&panel.id) {
                    (committed.with_position(position), Some(GestureKind::Drag))
                } else if let Some(size) = self.resize.preview(&panel.id) {
                    (Rect::from_parts(panel.position, size), Some(GestureKind::Resize))
                } else {
                    (committed, None)
                };
                PanelView {
                    id: panel.id.clone(),
                    committed,
                    display,
                    gesture,
                }
            })
            .collect()
    }

    /// The component hosting `id` went away: end its gestures without commit.
    pub fn detach_panel(&mut self, id: &PanelId) -> Option<ResizeDispatch> {
        self.drag.force_cancel(id);
        self.resize.teardown_panel(id)
    }

    /// End every gesture without commit.
    pub fn shutdown(&mut self) -> Option<ResizeDispatch> {
        let canceled = self.drag.cancel_all();
        if !canceled.is_empty() {
            debug!(count = canceled.len(), "drags canceled on shutdown");
        }
        self.resize.force_teardown(TeardownReason::Shutdown)
    }

    /// Forget the stored layout and return to the default preset.
    ///
    /// Active gestures end without commit; the returned dispatch carries the
    /// `Detach` for a resize session that was open. The preset is checked and
    /// storage cleared before anything else, so a failure leaves the board
    /// untouched.
    pub fn reset_layout(&mut self) -> Result<Option<ResizeDispatch>, BoardError> {
        let preset = default_snapshot(self.strategy.as_ref(), self.window, self.store.min_size());
        preset
            .validate(self.store.min_size())
            .map_err(|err| LayoutError::InvalidSnapshot(err.to_string()))?;
        self.persistence.borrow_mut().clear()?;
        let teardown = self.shutdown();
        self.commits.set(0);
        self.load_source = LoadSource::Missing;
        self.store.reset_to(&preset)?;
        info!(panels = self.store.len(), "layout reset to default");
        Ok(teardown)
    }
}
