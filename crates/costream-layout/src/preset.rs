//! Deterministic default arrangements.
//!
//! A [`PresetStrategy`] maps window metrics to an ordered list of panel
//! rectangles. The board uses it whenever no persisted layout exists.
//!
//! # Orientation presets
//!
//! [`OrientationPresets`] arranges three panels:
//!
//! ```text
//! landscape                    portrait
//! +-----------------+------+   +-------------------+
//! |                 |  1   |   |         0         |
//! |        0        +------+   +---------+---------+
//! |                 |  2   |   |    1    |    2    |
//! +-----------------+------+   +---------+---------+
//! ```
//!
//! Landscape: panel 0 takes 70% of the width at full height; panels 1 and 2
//! share the remaining column, split 40/60 vertically. Portrait: panel 0 takes
//! the top half; panels 1 and 2 split the bottom half side by side.
//!
//! # Invariants
//!
//! 1. Presets depend only on the metrics passed in: no history, no randomness.
//! 2. Percentages use integer arithmetic (floor); the remaining panels absorb
//!    the rounding so the arrangement tiles the window exactly.
//! 3. Sizes are not clamped here; [`default_snapshot`] raises them to the
//!    minimum panel size.

use costream_core::geometry::{Rect, Size};
use costream_core::window::{Orientation, WindowMetrics};

use crate::panel::DEFAULT_PANEL_SIZE;
use crate::snapshot::LayoutSnapshot;

/// Number of panels the orientation presets arrange.
pub const PRESET_PANEL_COUNT: usize = 3;

/// Source of the default layout.
pub trait PresetStrategy {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Ordered panel rectangles for the given window.
    fn preset(&self, metrics: WindowMetrics) -> Vec<Rect>;
}

/// Percentages for one orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SplitPercents {
    /// Share of the primary axis given to panel 0.
    primary: i64,
    /// Share of the secondary region given to panel 1.
    secondary: i64,
}

const LANDSCAPE: SplitPercents = SplitPercents {
    primary: 70,
    secondary: 40,
};

const PORTRAIT: SplitPercents = SplitPercents {
    primary: 50,
    secondary: 50,
};

fn percent_of(value: i32, percent: i64) -> i32 {
    // Widening keeps large windows from overflowing before the division.
    (i64::from(value) * percent / 100) as i32
}

/// Compute the three-panel arrangement for an orientation and window size.
#[must_use]
pub fn orientation_preset(orientation: Orientation, window: Size) -> Vec<Rect> {
    let (w, h) = (window.width.max(0), window.height.max(0));
    match orientation {
        Orientation::Landscape => {
            let main = Rect::new(0, 0, percent_of(w, LANDSCAPE.primary), h);
            let side_width = w - main.width;
            let top = Rect::new(main.width, 0, side_width, percent_of(h, LANDSCAPE.secondary));
            let bottom = Rect::new(main.width, top.height, side_width, h - top.height);
            vec![main, top, bottom]
        }
        Orientation::Portrait => {
            let main = Rect::new(0, 0, w, percent_of(h, PORTRAIT.primary));
            let lower_height = h - main.height;
            let left = Rect::new(0, main.height, percent_of(w, PORTRAIT.secondary), lower_height);
            let right = Rect::new(left.width, main.height, w - left.width, lower_height);
            vec![main, left, right]
        }
    }
}

/// Window-orientation driven presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrientationPresets;

impl PresetStrategy for OrientationPresets {
    fn name(&self) -> &'static str {
        "orientation"
    }

    fn preset(&self, metrics: WindowMetrics) -> Vec<Rect> {
        orientation_preset(metrics.orientation, metrics.container())
    }
}

/// Hard-coded seed set: `count` panels stacked at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedLayout {
    pub count: usize,
    pub size: Size,
}

impl SeedLayout {
    #[must_use]
    pub const fn new(count: usize, size: Size) -> Self {
        Self { count, size }
    }
}

impl Default for SeedLayout {
    fn default() -> Self {
        Self::new(PRESET_PANEL_COUNT, Size::square(DEFAULT_PANEL_SIZE))
    }
}

impl PresetStrategy for SeedLayout {
    fn name(&self) -> &'static str {
        "seed"
    }

    fn preset(&self, _metrics: WindowMetrics) -> Vec<Rect> {
        vec![Rect::new(0, 0, self.size.width, self.size.height); self.count]
    }
}

/// Build the fallback snapshot for a strategy, ids `"1"..="n"`.
#[must_use]
pub fn default_snapshot(
    strategy: &dyn PresetStrategy,
    metrics: WindowMetrics,
    min_size: i32,
) -> LayoutSnapshot {
    LayoutSnapshot::from_rects(&strategy.preset(metrics), min_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::MIN_PANEL_SIZE;
    use proptest::prelude::*;

    #[test]
    fn landscape_layout() {
        let rects = orientation_preset(Orientation::Landscape, Size::new(1000, 800));
        assert_eq!(
            rects,
            vec![
                Rect::new(0, 0, 700, 800),
                Rect::new(700, 0, 300, 320),
                Rect::new(700, 320, 300, 480),
            ]
        );
    }

    #[test]
    fn portrait_layout() {
        let rects = orientation_preset(Orientation::Portrait, Size::new(600, 1000));
        assert_eq!(
            rects,
            vec![
                Rect::new(0, 0, 600, 500),
                Rect::new(0, 500, 300, 500),
                Rect::new(300, 500, 300, 500),
            ]
        );
    }

    #[test]
    fn odd_dimensions_tile_exactly() {
        let rects = orientation_preset(Orientation::Landscape, Size::new(1001, 799));
        assert_eq!(rects[0].width + rects[1].width, 1001);
        assert_eq!(rects[1].height + rects[2].height, 799);
        assert_eq!(rects[2].y, rects[1].height);
    }

    #[test]
    fn strategy_uses_reported_orientation_not_aspect_ratio() {
        let metrics = WindowMetrics::new(1000, 800, Orientation::Portrait);
        assert_eq!(
            OrientationPresets.preset(metrics),
            orientation_preset(Orientation::Portrait, Size::new(1000, 800))
        );
    }

    #[test]
    fn seed_layout_stacks_default_panels_at_origin() {
        let rects = SeedLayout::default().preset(WindowMetrics::default());
        assert_eq!(rects, vec![Rect::new(0, 0, 200, 200); 3]);
    }

    #[test]
    fn default_snapshot_raises_tiny_windows_to_minimum() {
        let snapshot = default_snapshot(
            &OrientationPresets,
            WindowMetrics::from_dimensions(10, 10),
            MIN_PANEL_SIZE,
        );
        assert_eq!(snapshot.len(), PRESET_PANEL_COUNT);
        assert_eq!(snapshot.validate(MIN_PANEL_SIZE), Ok(()));
    }

    proptest! {
        #[test]
        fn preset_is_deterministic(
            w in 0i32..10_000, h in 0i32..10_000, portrait in any::<bool>(),
        ) {
            let orientation = if portrait { Orientation::Portrait } else { Orientation::Landscape };
            let metrics = WindowMetrics::new(w, h, orientation);
            prop_assert_eq!(OrientationPresets.preset(metrics), OrientationPresets.preset(metrics));
        }

        #[test]
        fn preset_panels_stay_inside_window(
            w in 0i32..10_000, h in 0i32..10_000, portrait in any::<bool>(),
        ) {
            let orientation = if portrait { Orientation::Portrait } else { Orientation::Landscape };
            for rect in orientation_preset(orientation, Size::new(w, h)) {
                prop_assert!(rect.x >= 0 && rect.y >= 0);
                prop_assert!(rect.right() <= w && rect.bottom() <= h);
            }
        }
    }
}
