// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll controller: bounded, optionally animated scroll positions.
//!
//! Positions are always clamped to `[0, max]` for their axis. Animations run
//! on caller-supplied millisecond timestamps: [`ScrollController::advance`]
//! moves every in-flight animation to the given time, so hosts drive it from
//! their frame callback and tests from a virtual clock.

use crate::{ExtentModel, Geometry, ScrollDirection};

/// Scroll axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The direction lines stack in.
    Primary,
    /// Across lines.
    Secondary,
}

/// Which edge of an item lines up with the viewport.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum StickTo {
    /// The item's start meets the viewport's start.
    #[default]
    Start,
    /// The item's end meets the viewport's end.
    End,
}

/// What a scroll request targets.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ScrollTarget {
    /// A data index; out-of-range indices are clamped.
    Index(usize),
    /// A primary scroll position.
    Position(f64),
}

/// An explicit request to scroll.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScrollRequest {
    /// Where to go.
    pub target: ScrollTarget,
    /// Edge alignment for index targets.
    pub stick_to: StickTo,
    /// Whether to animate the move.
    pub animate: bool,
}

impl ScrollRequest {
    /// Jump so `index` starts at the top of the viewport.
    #[must_use]
    pub const fn index(index: usize) -> Self {
        Self {
            target: ScrollTarget::Index(index),
            stick_to: StickTo::Start,
            animate: false,
        }
    }

    /// Jump to a primary position.
    #[must_use]
    pub const fn position(position: f64) -> Self {
        Self {
            target: ScrollTarget::Position(position),
            stick_to: StickTo::Start,
            animate: false,
        }
    }

    /// Same request with edge alignment `stick_to`.
    #[must_use]
    pub const fn stick_to(mut self, stick_to: StickTo) -> Self {
        self.stick_to = stick_to;
        self
    }

    /// Same request, animated or not.
    #[must_use]
    pub const fn animated(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }
}

/// A single ease-out cubic movement between two positions.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScrollAnimation {
    from: f64,
    to: f64,
    start_ms: u64,
    duration_ms: u64,
}

impl ScrollAnimation {
    /// Animation from `from` to `to` starting at `start_ms`.
    #[must_use]
    pub const fn new(from: f64, to: f64, start_ms: u64, duration_ms: u64) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms,
        }
    }

    /// Final position.
    #[must_use]
    pub const fn target(&self) -> f64 {
        self.to
    }

    /// Returns `true` once `now_ms` has reached the end.
    #[must_use]
    pub fn is_finished(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.start_ms) >= self.duration_ms
    }

    /// Position at `now_ms`.
    #[must_use]
    pub fn value_at(&self, now_ms: u64) -> f64 {
        if self.is_finished(now_ms) {
            return self.to;
        }
        #[allow(clippy::cast_precision_loss, reason = "Durations are a few seconds at most")]
        let t = now_ms.saturating_sub(self.start_ms) as f64 / self.duration_ms as f64;
        let remaining = 1.0 - t;
        let eased = 1.0 - remaining * remaining * remaining;
        self.from + (self.to - self.from) * eased
    }
}

#[derive(Copy, Clone, Debug, Default)]
struct AxisState {
    position: f64,
    max: f64,
    /// Target of the in-flight wheel accumulation.
    accumulated: Option<f64>,
    last_delta_positive: Option<bool>,
    animation: Option<ScrollAnimation>,
}

impl AxisState {
    fn clamp(&self, position: f64) -> f64 {
        if position.is_nan() {
            return self.position;
        }
        position.clamp(0.0, self.max)
    }

    fn target(&self) -> f64 {
        self.animation.map_or(self.position, |a| a.target())
    }
}

/// Per-list scroll state for both axes.
#[derive(Clone, Debug)]
pub struct ScrollController {
    axes: [AxisState; 2],
    now_ms: u64,
    animation_ms: u64,
    page_multiplier: f64,
}

/// Share of the viewport moved by one page.
pub const DEFAULT_PAGE_MULTIPLIER: f64 = 0.8;

/// Length of animated scrolls unless configured otherwise.
pub const DEFAULT_ANIMATION_MS: u64 = 500;

impl Default for ScrollController {
    fn default() -> Self {
        Self::new(DEFAULT_ANIMATION_MS, DEFAULT_PAGE_MULTIPLIER)
    }
}

const fn slot(axis: Axis) -> usize {
    match axis {
        Axis::Primary => 0,
        Axis::Secondary => 1,
    }
}

impl ScrollController {
    /// A controller at the origin with no scrollable range.
    #[must_use]
    pub fn new(animation_ms: u64, page_multiplier: f64) -> Self {
        Self {
            axes: [AxisState::default(); 2],
            now_ms: 0,
            animation_ms,
            page_multiplier,
        }
    }

    /// Current position on `axis`.
    #[must_use]
    pub fn position(&self, axis: Axis) -> f64 {
        self.axes[slot(axis)].position
    }

    /// Largest position on `axis`.
    #[must_use]
    pub fn max(&self, axis: Axis) -> f64 {
        self.axes[slot(axis)].max
    }

    /// Where `axis` is headed: the animation target, or the position.
    #[must_use]
    pub fn target(&self, axis: Axis) -> f64 {
        self.axes[slot(axis)].target()
    }

    /// Returns `true` while any axis is animating.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.axes.iter().any(|a| a.animation.is_some())
    }

    /// Latest timestamp seen by [`advance`](Self::advance).
    #[must_use]
    pub const fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Length of a page for a viewport `client_size` long.
    #[must_use]
    pub fn page_distance(&self, client_size: f64) -> f64 {
        client_size * self.page_multiplier
    }

    /// Updates the scrollable range and re-clamps positions and targets.
    ///
    /// Returns `true` if the primary position moved.
    pub fn set_bounds(&mut self, max_primary: f64, max_secondary: f64) -> bool {
        let before = self.axes[0].position;
        for (axis, max) in self.axes.iter_mut().zip([max_primary, max_secondary]) {
            axis.max = if max.is_finite() { max.max(0.0) } else { 0.0 };
            axis.position = axis.clamp(axis.position);
            if let Some(animation) = axis.animation {
                let to = axis.clamp(animation.target());
                axis.animation = Some(ScrollAnimation { to, ..animation });
            }
            axis.accumulated = axis.accumulated.map(|t| axis.clamp(t));
        }
        before != self.axes[0].position
    }

    /// Moves `axis` to `position` at once, cancelling animation and
    /// accumulation on that axis.
    pub fn jump_to(&mut self, axis: Axis, position: f64) -> ScrollDirection {
        let state = &mut self.axes[slot(axis)];
        let from = state.position;
        state.position = state.clamp(position);
        state.animation = None;
        state.accumulated = None;
        state.last_delta_positive = None;
        ScrollDirection::between(from, state.position)
    }

    /// Moves `axis` toward `position`, animated when an animation length is
    /// configured. Replaces any animation in flight.
    ///
    /// Returns the clamped target.
    pub fn animate_to(&mut self, axis: Axis, position: f64) -> f64 {
        let state = &mut self.axes[slot(axis)];
        state.accumulated = None;
        state.last_delta_positive = None;
        Self::start_motion(state, position, self.now_ms, self.animation_ms)
    }

    fn start_motion(state: &mut AxisState, position: f64, now_ms: u64, animation_ms: u64) -> f64 {
        let to = state.clamp(position);
        if animation_ms == 0 || to == state.position {
            state.position = to;
            state.animation = None;
        } else {
            state.animation = Some(ScrollAnimation::new(
                state.position,
                to,
                now_ms,
                animation_ms,
            ));
        }
        to
    }

    /// Adds `delta` to the in-flight target of `axis` rather than to its
    /// current position, so repeated wheel ticks in one direction compound.
    ///
    /// A change of sign starts over from the current position. Returns the
    /// new (clamped) target.
    pub fn scroll_to_accumulated_target(&mut self, delta: f64, axis: Axis, animate: bool) -> f64 {
        let now_ms = self.now_ms;
        let animation_ms = if animate { self.animation_ms } else { 0 };
        let state = &mut self.axes[slot(axis)];
        if delta == 0.0 || !delta.is_finite() {
            return state.target();
        }
        let positive = delta > 0.0;
        let base = match (state.accumulated, state.last_delta_positive) {
            (Some(target), Some(previous)) if previous == positive => target,
            _ => state.position,
        };
        state.last_delta_positive = Some(positive);
        let target = Self::start_motion(state, base + delta, now_ms, animation_ms);
        state.accumulated = state.animation.is_some().then_some(target);
        target
    }

    /// Steps animations to `now_ms`.
    ///
    /// Returns `true` if any position changed. Timestamps earlier than the
    /// last one seen are treated as the last one.
    pub fn advance(&mut self, now_ms: u64) -> bool {
        self.now_ms = self.now_ms.max(now_ms);
        let now_ms = self.now_ms;
        let mut moved = false;
        for state in &mut self.axes {
            let Some(animation) = state.animation else {
                continue;
            };
            let next = state.clamp(animation.value_at(now_ms));
            moved |= next != state.position;
            state.position = next;
            if animation.is_finished(now_ms) {
                state.animation = None;
                state.accumulated = None;
            }
        }
        moved
    }

    /// Primary position that aligns `index` as `stick_to` asks.
    ///
    /// Out-of-range indices are clamped. Returns `None` when there is
    /// nothing to scroll to.
    pub fn position_for_index(
        &self,
        geometry: &mut Geometry,
        index: usize,
        stick_to: StickTo,
    ) -> Option<f64> {
        let len = geometry.data_size();
        let client = geometry.primary().client_size;
        if len == 0 || client <= 0.0 || geometry.is_degenerate() {
            return None;
        }
        let index = index.min(len - 1);
        let start = geometry.strategy_mut().offset_of(index);
        let extent = geometry.strategy_mut().extent_of(index);
        let position = match stick_to {
            StickTo::Start => start,
            StickTo::End => start + extent - client,
        };
        Some(position.clamp(0.0, self.axes[0].max))
    }

    /// Smallest move that brings `index` fully into view, or the current
    /// target when it already is.
    pub fn reveal_position(
        &self,
        geometry: &mut Geometry,
        index: usize,
        stick_to: StickTo,
    ) -> Option<f64> {
        let current = self.target(Axis::Primary);
        let client = geometry.primary().client_size;
        let aligned = self.position_for_index(geometry, index, stick_to)?;
        let index = index.min(geometry.data_size() - 1);
        let start = geometry.strategy_mut().offset_of(index);
        let end = start + geometry.strategy_mut().extent_of(index);
        if start >= current && end <= current + client {
            Some(current)
        } else {
            Some(aligned)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GeometryConfig, ItemSize, ViewportSize, calculate};

    fn list() -> (Geometry, ScrollController) {
        let mut geometry = calculate(
            &GeometryConfig::new(ItemSize::Fixed(30.0)),
            ViewportSize::new(200.0, 300.0),
            100,
        );
        let mut scroll = ScrollController::new(100, DEFAULT_PAGE_MULTIPLIER);
        scroll.set_bounds(geometry.max_scroll(), 0.0);
        (geometry, scroll)
    }

    #[test]
    fn positions_stay_in_bounds() {
        let (_, mut scroll) = list();
        assert_eq!(scroll.jump_to(Axis::Primary, -40.0), ScrollDirection::Still);
        assert_eq!(scroll.position(Axis::Primary), 0.0);
        assert_eq!(scroll.jump_to(Axis::Primary, 10_000.0), ScrollDirection::Forward);
        assert_eq!(scroll.position(Axis::Primary), 2_700.0);
        assert!(scroll.set_bounds(1_000.0, 0.0));
        assert_eq!(scroll.position(Axis::Primary), 1_000.0);
        assert_eq!(scroll.jump_to(Axis::Secondary, 50.0), ScrollDirection::Still);
    }

    #[test]
    fn animation_eases_out_toward_the_target() {
        let (_, mut scroll) = list();
        assert_eq!(scroll.animate_to(Axis::Primary, 800.0), 800.0);
        assert!(scroll.is_animating());
        assert_eq!(scroll.target(Axis::Primary), 800.0);
        assert!(scroll.advance(50));
        // 1 - 0.5^3 = 0.875 of the way.
        assert_eq!(scroll.position(Axis::Primary), 700.0);
        assert!(scroll.advance(100));
        assert_eq!(scroll.position(Axis::Primary), 800.0);
        assert!(!scroll.is_animating());
        assert!(!scroll.advance(150));
    }

    #[test]
    fn wheel_ticks_compound_until_the_sign_flips() {
        let (_, mut scroll) = list();
        assert_eq!(scroll.scroll_to_accumulated_target(100.0, Axis::Primary, true), 100.0);
        scroll.advance(10);
        assert_eq!(scroll.scroll_to_accumulated_target(100.0, Axis::Primary, true), 200.0);
        scroll.advance(20);
        let position = scroll.position(Axis::Primary);
        assert!(position > 0.0 && position < 200.0);
        // Reversing starts from where the list is now.
        let back = scroll.scroll_to_accumulated_target(-50.0, Axis::Primary, true);
        assert_eq!(back, position - 50.0);
    }

    #[test]
    fn unanimated_wheel_moves_at_once() {
        let (_, mut scroll) = list();
        scroll.scroll_to_accumulated_target(90.0, Axis::Primary, false);
        scroll.scroll_to_accumulated_target(90.0, Axis::Primary, false);
        assert_eq!(scroll.position(Axis::Primary), 180.0);
        assert!(!scroll.is_animating());
    }

    #[test]
    fn index_positions_respect_stick_to() {
        let (mut geometry, scroll) = list();
        assert_eq!(scroll.position_for_index(&mut geometry, 30, StickTo::Start), Some(900.0));
        assert_eq!(scroll.position_for_index(&mut geometry, 30, StickTo::End), Some(630.0));
        assert_eq!(scroll.position_for_index(&mut geometry, 500, StickTo::Start), Some(2_700.0));
        assert_eq!(scroll.position_for_index(&mut geometry, 0, StickTo::End), Some(0.0));
        assert_eq!(scroll.reveal_position(&mut geometry, 5, StickTo::End), Some(0.0));
        assert_eq!(scroll.reveal_position(&mut geometry, 10, StickTo::End), Some(30.0));
        assert_eq!(scroll.page_distance(300.0), 240.0);
    }

    #[test]
    fn empty_lists_have_nowhere_to_scroll() {
        let mut geometry = calculate(
            &GeometryConfig::new(ItemSize::Fixed(30.0)),
            ViewportSize::new(200.0, 300.0),
            0,
        );
        let scroll = ScrollController::default();
        assert_eq!(scroll.position_for_index(&mut geometry, 3, StickTo::Start), None);
    }
}
