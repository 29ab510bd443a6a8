// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window manager: which contiguous index range is materialized.
//!
//! The window starts [`Geometry::lines_before`] lines ahead of the first
//! visible line and spans [`Geometry::num_of_items`] items. Rather than
//! recomputing it on every scroll event, [`WindowManager`] keeps a
//! [`Threshold`] band around the scroll position and only moves the window
//! once the position leaves that band in the direction of travel.

use core::ops::Range;

use crate::scalar::ceil_to_usize;
use crate::{ExtentModel, Geometry, GeometryStrategy, Threshold};

/// Contiguous range of materialized indices.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Window {
    /// First materialized index.
    pub first_index: usize,
    /// Number of materialized items; never runs past the end of the data.
    pub num_of_items: usize,
}

impl Window {
    /// A window with nothing materialized.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            first_index: 0,
            num_of_items: 0,
        }
    }

    /// One past the last materialized index.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.first_index + self.num_of_items
    }

    /// Returns `true` if nothing is materialized.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.num_of_items == 0
    }

    /// Returns `true` if `index` is materialized.
    #[must_use]
    pub const fn contains(&self, index: usize) -> bool {
        index >= self.first_index && index < self.end()
    }

    /// Materialized indices in increasing order.
    #[must_use]
    pub const fn indices(&self) -> Range<usize> {
        self.first_index..self.end()
    }
}

/// Sign of the most recent scroll movement.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    /// Toward the start of the content.
    Backward,
    /// No established direction.
    #[default]
    Still,
    /// Toward the end of the content.
    Forward,
}

impl ScrollDirection {
    /// Direction of travel from `from` to `to`.
    #[must_use]
    pub fn between(from: f64, to: f64) -> Self {
        if to > from {
            Self::Forward
        } else if to < from {
            Self::Backward
        } else {
            Self::Still
        }
    }
}

/// Owner of the window's first index.
#[derive(Clone, Debug)]
pub struct WindowManager {
    first_index: usize,
    threshold: Threshold,
    scroll_position: f64,
}

impl WindowManager {
    /// A window at the start of the content.
    #[must_use]
    pub fn new(geometry: &mut Geometry) -> Self {
        let mut manager = Self {
            first_index: 0,
            threshold: geometry.initial_threshold(),
            scroll_position: 0.0,
        };
        manager.threshold = Self::band_for_line(geometry, 0);
        manager
    }

    /// First materialized index.
    #[must_use]
    pub const fn first_index(&self) -> usize {
        self.first_index
    }

    /// Current hysteresis band.
    #[must_use]
    pub const fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Last primary scroll position seen.
    #[must_use]
    pub const fn scroll_position(&self) -> f64 {
        self.scroll_position
    }

    /// The materialized range under `geometry`.
    #[must_use]
    pub fn window(&self, geometry: &Geometry) -> Window {
        let len = geometry.data_size();
        if len == 0 || geometry.is_degenerate() {
            return Window::empty();
        }
        let first_index = self.first_index.min(geometry.max_first_index()).min(len - 1);
        Window {
            first_index,
            num_of_items: geometry.num_of_items().min(len - first_index),
        }
    }

    /// Reacts to a new primary scroll position.
    ///
    /// The first index moves only when `direction` is established and
    /// `position` has left the band on that side. Returns `true` if the first
    /// index changed.
    pub fn set_primary_scroll_position(
        &mut self,
        geometry: &mut Geometry,
        position: f64,
        direction: ScrollDirection,
    ) -> bool {
        self.scroll_position = position;
        if geometry.data_size() == 0 || geometry.is_degenerate() {
            return false;
        }

        let previous = self.first_index;
        let exited = match direction {
            ScrollDirection::Forward => position > self.threshold.max,
            ScrollDirection::Backward => position < self.threshold.min,
            ScrollDirection::Still => false,
        };
        if !exited {
            return false;
        }

        if matches!(geometry.strategy(), GeometryStrategy::Fixed(_)) {
            self.advance_by_lines(geometry, position, direction);
        } else {
            self.reanchor(geometry, position);
        }

        let changed = previous != self.first_index;
        if changed {
            tracing::trace!(
                from = previous,
                to = self.first_index,
                position,
                min = self.threshold.min,
                max = self.threshold.max,
                "window moved"
            );
        }
        changed
    }

    fn advance_by_lines(&mut self, geometry: &mut Geometry, position: f64, direction: ScrollDirection) {
        let grid = geometry.primary().grid_size;
        let dte = geometry.dimension_to_extent();
        let mut line = self.first_index / dte;
        match direction {
            ScrollDirection::Forward => {
                let lines = ceil_to_usize((position - self.threshold.max) / grid);
                line = line.saturating_add(lines).min(geometry.max_first_line());
            }
            ScrollDirection::Backward => {
                let lines = ceil_to_usize((self.threshold.min - position) / grid);
                line = line.saturating_sub(lines);
            }
            ScrollDirection::Still => return,
        }
        self.first_index = line * dte;
        self.threshold = Self::band_for_line(geometry, line);
    }

    /// Picks the window for `position` from scratch.
    fn reanchor(&mut self, geometry: &mut Geometry, position: f64) {
        let visible = geometry.strategy_mut().line_at_offset(position.max(0.0));
        let line = visible
            .saturating_sub(geometry.lines_before() - 1)
            .min(geometry.max_first_line());
        self.first_index = line * geometry.dimension_to_extent();
        self.threshold = Self::band_for_line(geometry, line);
    }

    /// Band of positions for which a window starting at `line` still covers
    /// the viewport, synced against the scrollable range.
    fn band_for_line(geometry: &mut Geometry, line: usize) -> Threshold {
        let base = geometry.threshold_base();
        let anchor = line + geometry.lines_before();
        let strategy = geometry.strategy_mut();
        let mut max = strategy.line_offset(anchor);
        let mut min = if line == 0 {
            f64::NEG_INFINITY
        } else {
            strategy.line_offset(anchor - 1)
        };

        let max_scroll = geometry.max_scroll();
        if line >= geometry.max_first_line() || max >= max_scroll {
            max = f64::INFINITY;
        }
        if min > max_scroll {
            min = max_scroll;
        }
        Threshold { min, max, base }
    }

    /// Re-validates the window after a geometry or data-size change.
    ///
    /// `position` is the (already clamped) primary scroll position. The first
    /// index is kept if its band still holds `position`; otherwise the window
    /// is re-anchored there. Returns `true` if the first index changed.
    pub fn reconcile(&mut self, geometry: &mut Geometry, position: f64) -> bool {
        self.scroll_position = position;
        let previous = self.first_index;
        if geometry.data_size() == 0 || geometry.is_degenerate() {
            self.first_index = 0;
            self.threshold = geometry.initial_threshold();
            return previous != 0;
        }

        let line = self.first_index / geometry.dimension_to_extent();
        let band = Self::band_for_line(geometry, line);
        if line <= geometry.max_first_line() && band.contains(position) {
            self.first_index = line * geometry.dimension_to_extent();
            self.threshold = band;
        } else {
            self.reanchor(geometry, position);
        }

        if previous != self.first_index {
            tracing::debug!(from = previous, to = self.first_index, position, "window re-anchored");
        }
        previous != self.first_index
    }
}

/// Items that intersect the viewport at primary `position`.
pub fn visible_items(geometry: &mut Geometry, position: f64) -> Range<usize> {
    let len = geometry.data_size();
    if len == 0 || geometry.is_degenerate() {
        return 0..0;
    }
    let dte = geometry.dimension_to_extent();
    let view_end = position + geometry.primary().client_size;
    let strategy = geometry.strategy_mut();
    let first_line = strategy.line_at_offset(position.max(0.0));
    let mut last_line = strategy.line_at_offset(view_end);
    while last_line > first_line && strategy.line_offset(last_line) >= view_end {
        last_line -= 1;
    }
    let start = (first_line * dte).min(len - 1);
    let end = ((last_line + 1) * dte).min(len);
    start..end
}

/// Returns `true` if `index` lies completely inside the viewport at `position`.
pub fn is_fully_visible(geometry: &mut Geometry, position: f64, index: usize) -> bool {
    if index >= geometry.data_size() {
        return false;
    }
    let client = geometry.primary().client_size;
    let start = geometry.strategy_mut().offset_of(index);
    let end = start + geometry.strategy_mut().extent_of(index);
    start >= position && end <= position + client
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GeometryConfig, ItemSize, ViewportSize, calculate};
    use alloc::vec;

    fn list(len: usize) -> Geometry {
        calculate(
            &GeometryConfig::new(ItemSize::Fixed(30.0)),
            ViewportSize::new(200.0, 300.0),
            len,
        )
    }

    #[test]
    fn jump_advances_by_whole_lines() {
        let mut geometry = list(100);
        let mut manager = WindowManager::new(&mut geometry);
        assert!(manager.set_primary_scroll_position(&mut geometry, 900.0, ScrollDirection::Forward));
        assert_eq!(manager.first_index(), 28);
        let threshold = manager.threshold();
        assert_eq!((threshold.min, threshold.max), (870.0, 900.0));
        assert_eq!(
            manager.window(&geometry),
            Window {
                first_index: 28,
                num_of_items: 13
            }
        );
        assert_eq!(visible_items(&mut geometry, 900.0), 30..40);
    }

    #[test]
    fn positions_inside_the_band_do_not_move_the_window() {
        let mut geometry = list(100);
        let mut manager = WindowManager::new(&mut geometry);
        for position in 0..=60 {
            let moved = manager.set_primary_scroll_position(
                &mut geometry,
                f64::from(position),
                ScrollDirection::Forward,
            );
            assert!(!moved, "moved at {position}");
        }
        assert!(manager.set_primary_scroll_position(&mut geometry, 61.0, ScrollDirection::Forward));
        assert_eq!(manager.first_index(), 1);
    }

    #[test]
    fn still_direction_never_moves() {
        let mut geometry = list(100);
        let mut manager = WindowManager::new(&mut geometry);
        assert!(!manager.set_primary_scroll_position(&mut geometry, 900.0, ScrollDirection::Still));
        assert_eq!(manager.first_index(), 0);
    }

    #[test]
    fn backward_movement_mirrors_forward() {
        let mut geometry = list(100);
        let mut manager = WindowManager::new(&mut geometry);
        manager.set_primary_scroll_position(&mut geometry, 900.0, ScrollDirection::Forward);
        assert!(manager.set_primary_scroll_position(&mut geometry, 860.0, ScrollDirection::Backward));
        assert_eq!(manager.first_index(), 27);
        assert!(manager.set_primary_scroll_position(&mut geometry, 0.0, ScrollDirection::Backward));
        assert_eq!(manager.first_index(), 0);
        assert_eq!(manager.threshold().min, f64::NEG_INFINITY);
    }

    #[test]
    fn end_of_content_clamps_and_opens_the_band() {
        let mut geometry = list(100);
        let mut manager = WindowManager::new(&mut geometry);
        let max = geometry.max_scroll();
        assert_eq!(max, 2_700.0);
        manager.set_primary_scroll_position(&mut geometry, max, ScrollDirection::Forward);
        assert_eq!(manager.first_index(), 87);
        assert_eq!(manager.threshold().max, f64::INFINITY);
        assert_eq!(manager.window(&geometry).end(), 100);
    }

    #[test]
    fn shrinking_data_pulls_the_window_back() {
        let mut geometry = list(100);
        let mut manager = WindowManager::new(&mut geometry);
        manager.set_primary_scroll_position(&mut geometry, 2_700.0, ScrollDirection::Forward);

        let mut smaller = list(40);
        let position = 2_700.0_f64.min(smaller.max_scroll());
        assert!(manager.reconcile(&mut smaller, position));
        assert_eq!(manager.first_index(), 27);
        assert_eq!(manager.window(&smaller).end(), 40);
    }

    #[test]
    fn empty_data_has_an_empty_window() {
        let mut geometry = list(0);
        let mut manager = WindowManager::new(&mut geometry);
        assert!(!manager.set_primary_scroll_position(&mut geometry, 50.0, ScrollDirection::Forward));
        assert!(manager.window(&geometry).is_empty());
    }

    #[test]
    fn per_item_windows_follow_the_visible_item() {
        let sizes = vec![100.0, 20.0, 20.0, 20.0, 20.0, 20.0, 20.0, 20.0, 20.0, 20.0, 20.0, 20.0];
        let mut geometry = calculate(
            &GeometryConfig::new(ItemSize::PerItem(sizes)),
            ViewportSize::new(100.0, 40.0),
            30,
        );
        // ceil(40 / 20) + 3 = 5 items.
        assert_eq!(geometry.num_of_items(), 5);
        let mut manager = WindowManager::new(&mut geometry);
        assert!(!manager.set_primary_scroll_position(&mut geometry, 90.0, ScrollDirection::Forward));
        // Item 4 starts at 160; one line is kept before it.
        assert!(manager.set_primary_scroll_position(&mut geometry, 165.0, ScrollDirection::Forward));
        assert_eq!(manager.first_index(), 3);
        assert!(manager.threshold().contains(165.0));
        assert!(manager.window(&geometry).contains(4));
    }
}
