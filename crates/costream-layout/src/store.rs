//! Canonical in-memory panel table.
//!
//! [`PanelStore`] is the single owner of committed panel geometry. Panels keep
//! insertion order (display order). Ids are unique and never reused: generated
//! ids come from a monotonically increasing sequence that starts past every
//! numeric id already present.
//!
//! # Invariants
//!
//! 1. Exactly one panel per id.
//! 2. Every panel's width and height are `>= min_size`.
//! 3. Every successful [`upsert`](PanelStore::upsert) or
//!    [`add`](PanelStore::add) notifies all subscribers with a full snapshot,
//!    after the mutation is complete. Nothing else notifies.
//! 4. A failed mutation leaves the store untouched.
//!
//! The boot path ([`from_snapshot`](PanelStore::from_snapshot)) and preset
//! re-seeding ([`reset_to`](PanelStore::reset_to)) are initialization, not
//! commits, and do not notify.

use std::fmt;

use costream_core::geometry::{Point, Size};
use rustc_hash::FxHashMap;

use crate::error::{LayoutError, LayoutResult};
use crate::panel::{MIN_PANEL_SIZE, Panel, PanelId};
use crate::snapshot::LayoutSnapshot;

/// Handle returned by [`PanelStore::subscribe`].
pub type SubscriberId = u64;

type Subscriber = Box<dyn FnMut(&LayoutSnapshot)>;

/// Ordered `PanelId -> Panel` table with commit notification.
pub struct PanelStore {
    panels: Vec<Panel>,
    index: FxHashMap<PanelId, usize>,
    min_size: i32,
    next_sequence: u64,
    subscribers: Vec<(SubscriberId, Subscriber)>,
    next_subscriber: SubscriberId,
}

impl fmt::Debug for PanelStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelStore")
            .field("panels", &self.panels)
            .field("min_size", &self.min_size)
            .field("next_sequence", &self.next_sequence)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Default for PanelStore {
    fn default() -> Self {
        Self {
            panels: Vec::new(),
            index: FxHashMap::default(),
            min_size: MIN_PANEL_SIZE,
            next_sequence: 1,
            subscribers: Vec::new(),
            next_subscriber: 1,
        }
    }
}

impl PanelStore {
    /// Empty store with a custom minimum panel size.
    pub fn new(min_size: i32) -> LayoutResult<Self> {
        if min_size <= 0 {
            return Err(LayoutError::InvalidMinimumSize { min: min_size });
        }
        Ok(Self {
            min_size,
            ..Self::default()
        })
    }

    /// Initialize from a validated snapshot without notifying.
    pub fn from_snapshot(snapshot: &LayoutSnapshot, min_size: i32) -> LayoutResult<Self> {
        let mut store = Self::new(min_size)?;
        store.load(snapshot)?;
        Ok(store)
    }

    /// Replace every panel with the snapshot's contents without notifying.
    ///
    /// Subscribers are kept. The id sequence never moves backwards, so ids
    /// generated before the reset are not handed out again.
    pub fn reset_to(&mut self, snapshot: &LayoutSnapshot) -> LayoutResult<()> {
        self.load(snapshot)
    }

    fn load(&mut self, snapshot: &LayoutSnapshot) -> LayoutResult<()> {
        snapshot
            .validate(self.min_size)
            .map_err(|err| LayoutError::InvalidSnapshot(err.to_string()))?;

        self.panels = snapshot.iter().map(|record| record.to_panel()).collect();
        self.index = self
            .panels
            .iter()
            .enumerate()
            .map(|(position, panel)| (panel.id.clone(), position))
            .collect();
        let past_existing = self
            .panels
            .iter()
            .filter_map(|panel| panel.id.sequence())
            .max()
            .map_or(1, |max| max.saturating_add(1));
        self.next_sequence = self.next_sequence.max(past_existing);
        Ok(())
    }

    /// Minimum width/height enforced on every commit.
    #[must_use]
    pub const fn min_size(&self) -> i32 {
        self.min_size
    }

    pub fn get(&self, id: &PanelId) -> LayoutResult<&Panel> {
        self.index
            .get(id)
            .map(|&position| &self.panels[position])
            .ok_or_else(|| LayoutError::PanelNotFound(id.clone()))
    }

    #[must_use]
    pub fn contains(&self, id: &PanelId) -> bool {
        self.index.contains_key(id)
    }

    /// Panels in insertion order.
    pub fn list(&self) -> impl ExactSizeIterator<Item = &Panel> + '_ {
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

    /// Full snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot::from_panels(&self.panels)
    }

    /// Replace or insert a panel's geometry, then notify subscribers.
    pub fn upsert(&mut self, id: &PanelId, position: Point, size: Size) -> LayoutResult<()> {
        self.check_size(id, size)?;
        match self.index.get(id) {
            Some(&existing) => {
                let panel = &mut self.panels[existing];
                panel.position = position;
                panel.size = size;
            }
            None => self.insert(Panel::new(id.clone(), position, size)),
        }
        self.notify();
        Ok(())
    }

    /// Insert a new panel under a freshly generated id, then notify.
    pub fn add(&mut self, position: Point, size: Size) -> LayoutResult<PanelId> {
        let (id, seq) = self.peek_next_id()?;
        self.check_size(&id, size)?;
        self.next_sequence = seq.saturating_add(1);
        self.insert(Panel::new(id.clone(), position, size));
        self.notify();
        Ok(id)
    }

    /// Register a commit observer. It receives the full snapshot after every
    /// successful `upsert`/`add`.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&LayoutSnapshot) + 'static) -> SubscriberId {
        let id = self.next_subscriber;
        self.next_subscriber += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Remove a commit observer. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    fn check_size(&self, id: &PanelId, size: Size) -> LayoutResult<()> {
        if size.fits_minimum(self.min_size) {
            Ok(())
        } else {
            Err(LayoutError::InvalidGeometry {
                id: id.clone(),
                size,
                min: self.min_size,
            })
        }
    }

    fn peek_next_id(&self) -> LayoutResult<(PanelId, u64)> {
        let mut seq = self.next_sequence;
        loop {
            let candidate = PanelId::from_sequence(seq);
            if !self.index.contains_key(&candidate) {
                return Ok((candidate, seq));
            }
            seq = seq.checked_add(1).ok_or(LayoutError::IdsExhausted)?;
        }
    }

    fn insert(&mut self, panel: Panel) {
        self.index.insert(panel.id.clone(), self.panels.len());
        self.panels.push(panel);
    }

    fn notify(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&snapshot);
        }
    }
}
