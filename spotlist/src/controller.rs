// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-list controller.
//!
//! [`VirtualListController`] owns every piece of list state and is driven by
//! host events: scrolls, keys, data and viewport changes, and the passage of
//! (virtual) time. It reports back through the injected [`FocusSystem`], its
//! placements, and the return values of each call.

use alloc::vec::Vec;
use core::ops::Range;

use smallvec::SmallVec;
use spotlist_focus::{
    Advance, Direction, FocusRestoration, FocusState, FocusSystem, FocusTarget, GridShape,
    ItemCatalog, ItemFlags, KeyDisposition, Navigator, NextTarget, RestoreAction, RestoreActions,
    RestorePhase, Scheduler, search,
};
use spotlist_window::{
    Axis, Fragment, Geometry, ItemRenderer, ItemSize, Orientation, Placement, ScrollBounds,
    ScrollController, ScrollDirection, ScrollRequest, ScrollTarget, SecondaryLines, SlotPool,
    SlotRecycler, StickTo, ViewportSize, VisibleStrip, Window, WindowManager, calculate,
    is_fully_visible, split_at_viewport, visible_items,
};

use crate::{InputMode, ListConfig, ListStateStore, ListTask, PersistedListState};

/// Host container that can report its client size.
pub trait ViewportHost {
    /// Current client size of the scroll container.
    fn measure_viewport(&self) -> ViewportSize;
}

/// Outcome of a direction key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NavigationResult {
    /// Focus moved to a materialized item.
    Moved {
        /// Newly focused index.
        index: usize,
    },
    /// The target is being scrolled into the window; focus follows.
    Deferred {
        /// Pending focus index.
        index: usize,
    },
    /// The key is held until in-flight work finishes.
    Buffered,
    /// The key was dropped.
    Ignored,
    /// Nothing spottable lies that way inside the list.
    NoMovement {
        /// The host moved focus out of the list instead.
        propagated: bool,
    },
}

/// Outcome of a page key.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PageOutcome {
    /// Focus went to an item about a page away.
    Focused {
        /// Index that received (or is about to receive) focus.
        index: usize,
    },
    /// The content scrolled by a page.
    Scrolled {
        /// Primary target position.
        target: f64,
    },
    /// Already at the edge, or paging does not apply to that direction.
    NoMovement,
}

/// Outcome of [`VirtualListController::scroll_to`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ScrollOutcome {
    /// The list is at its new position.
    Jumped {
        /// Clamped primary position.
        position: f64,
    },
    /// An animation toward `target` is running.
    Animating {
        /// Clamped primary target.
        target: f64,
    },
    /// Nothing to do: already there, or nothing to scroll.
    Unchanged,
}

/// A virtualized list with 5-way focus navigation.
///
/// Every mutation that can move the window re-runs slot recycling, the
/// secondary line cache and the focus restoration protocol before it returns.
#[derive(Debug)]
pub struct VirtualListController<F> {
    config: ListConfig,
    viewport: ViewportSize,
    catalog: ItemCatalog,
    geometry: Geometry,
    window_manager: WindowManager,
    recycler: SlotRecycler,
    placements: Vec<Placement>,
    lines: SecondaryLines,
    scroll: ScrollController,
    navigator: Navigator,
    restoration: FocusRestoration,
    scheduler: Scheduler<ListTask>,
    input_mode: InputMode,
    focus: F,
}

/// Whole lines in `distance`, at least one.
fn lines_in(distance: f64, grid: f64) -> usize {
    if !(distance / grid).is_finite() || distance <= 0.0 {
        return 1;
    }
    #[allow(clippy::cast_possible_truncation, reason = "Finite and positive; truncation floors")]
    let lines = (distance / grid) as usize;
    lines.max(1)
}

impl<F: FocusSystem> VirtualListController<F> {
    /// A list of `data_size` enabled items in `viewport`, scrolled to the start.
    ///
    /// Configuration problems are logged and clamped.
    pub fn new(config: ListConfig, viewport: ViewportSize, data_size: usize, focus: F) -> Self {
        let config = config.sanitized();
        let mut geometry = calculate(&config.geometry(), viewport, data_size);
        let window_manager = WindowManager::new(&mut geometry);
        let mut controller = Self {
            viewport,
            catalog: ItemCatalog::new(data_size),
            geometry,
            window_manager,
            recycler: SlotRecycler::new(),
            placements: Vec::new(),
            lines: SecondaryLines::new(config.overhang.max(1)),
            scroll: ScrollController::new(config.scroll_animation_ms, config.page_multiplier),
            navigator: Navigator::new(config.wrap, config.accelerator.clone()),
            restoration: FocusRestoration::new(),
            scheduler: Scheduler::new(),
            input_mode: InputMode::Keyboard,
            focus,
            config,
        };
        controller.relayout();
        controller
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Configuration in effect, after clamping.
    #[must_use]
    pub const fn config(&self) -> &ListConfig {
        &self.config
    }

    /// Items and their flags.
    #[must_use]
    pub const fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    /// Current geometry.
    #[must_use]
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// The materialized range.
    #[must_use]
    pub fn window(&self) -> Window {
        self.window_manager.window(&self.geometry)
    }

    /// Layout of every materialized item, in index order.
    #[must_use]
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Scroll extents as a host container would report them.
    pub fn scroll_bounds(&mut self) -> ScrollBounds {
        self.geometry.scroll_bounds()
    }

    /// Current scroll position on `axis`.
    #[must_use]
    pub fn scroll_position(&self, axis: Axis) -> f64 {
        self.scroll.position(axis)
    }

    /// Where `axis` is headed.
    #[must_use]
    pub fn scroll_target(&self, axis: Axis) -> f64 {
        self.scroll.target(axis)
    }

    /// Returns `true` while a scroll animation runs.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.scroll.is_animating()
    }

    /// Latest virtual timestamp seen.
    #[must_use]
    pub const fn now_ms(&self) -> u64 {
        self.scroll.now_ms()
    }

    /// Number of timers waiting to fire.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    /// Kind of input seen last.
    #[must_use]
    pub const fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    /// Focus bookkeeping.
    #[must_use]
    pub const fn focus_state(&self) -> &FocusState {
        self.restoration.state()
    }

    /// Phase of the focus restoration protocol.
    #[must_use]
    pub const fn restore_phase(&self) -> RestorePhase {
        self.restoration.phase()
    }

    /// The injected focus system.
    #[must_use]
    pub const fn focus_system(&self) -> &F {
        &self.focus
    }

    /// The injected focus system, mutably.
    pub fn focus_system_mut(&mut self) -> &mut F {
        &mut self.focus
    }

    /// Items intersecting the viewport.
    pub fn visible_range(&mut self) -> Range<usize> {
        visible_items(&mut self.geometry, self.scroll.position(Axis::Primary))
    }

    /// Items lying completely inside the viewport.
    pub fn fully_visible_range(&mut self) -> Range<usize> {
        let position = self.scroll.position(Axis::Primary);
        let visible = visible_items(&mut self.geometry, position);
        let geometry = &mut self.geometry;
        let Some(start) = visible
            .clone()
            .find(|&i| is_fully_visible(geometry, position, i))
        else {
            return visible.end..visible.end;
        };
        let end = (start..visible.end)
            .rev()
            .find(|&i| is_fully_visible(geometry, position, i))
            .map_or(start, |i| i + 1);
        start..end
    }

    /// Pieces of the materialized item `index` on each side of the viewport edges.
    #[must_use]
    pub fn fragments_of(&self, index: usize) -> Option<SmallVec<[Fragment; 3]>> {
        let placement = self.placements.iter().find(|p| p.index == index)?;
        Some(split_at_viewport(
            placement,
            self.scroll.position(Axis::Primary),
            self.geometry.primary().client_size,
        ))
    }

    /// Cached secondary window of `line`.
    #[must_use]
    pub fn line_strip(&self, line: usize) -> Option<&VisibleStrip<f64>> {
        self.lines.strip(line)
    }

    /// Secondary offset and extent of item `column` on `line`, for lines
    /// given individual extents with [`set_line_extents`](Self::set_line_extents).
    pub fn line_item_span(&mut self, line: usize, column: usize) -> Option<(f64, f64)> {
        self.lines.item_span(line, column)
    }

    /// Renders every slot whose index changed since the last call.
    ///
    /// Returns how many items were rendered.
    pub fn realize<R: ItemRenderer>(&self, pool: &mut SlotPool<R::Handle>, renderer: &mut R) -> usize {
        pool.sync(&self.placements, self.recycler.capacity(), renderer)
    }

    // ── Scrolling ───────────────────────────────────────────────────────

    /// Handles a wheel or touch scroll of `delta` along `axis`.
    ///
    /// Deltas in one direction compound onto the in-flight target. A deferred
    /// focus resolution is abandoned.
    pub fn on_scroll(&mut self, delta: f64, axis: Axis) {
        self.on_pointer_activity();
        self.cancel_deferred();
        let before = self.scroll.position(Axis::Primary);
        self.scroll.scroll_to_accumulated_target(delta, axis, true);
        match axis {
            Axis::Primary => {
                let after = self.scroll.position(Axis::Primary);
                self.refresh(ScrollDirection::between(before, after));
            }
            Axis::Secondary => self.update_lines(),
        }
    }

    /// Scrolls to an index or a position.
    ///
    /// Cancels any deferred focus resolution and any scroll in flight.
    pub fn scroll_to(&mut self, request: ScrollRequest) -> ScrollOutcome {
        self.cancel_deferred();
        let position = match request.target {
            ScrollTarget::Index(index) => {
                self.scroll
                    .position_for_index(&mut self.geometry, index, request.stick_to)
            }
            ScrollTarget::Position(position) => position.is_finite().then_some(position),
        };
        let Some(position) = position else {
            return ScrollOutcome::Unchanged;
        };
        let before = self.scroll.position(Axis::Primary);
        let target = self.move_primary(position, request.animate);
        if self.scroll.is_animating() {
            ScrollOutcome::Animating { target }
        } else if target != before {
            ScrollOutcome::Jumped { position: target }
        } else {
            ScrollOutcome::Unchanged
        }
    }

    /// Handles a page key: focus moves about a page toward `direction`, or
    /// the content scrolls by a page when nothing in the list has focus.
    pub fn scroll_by_page(&mut self, direction: Direction) -> PageOutcome {
        let shape = GridShape::of(&self.geometry);
        let movement = shape.movement(direction);
        let client = self.geometry.primary().client_size;
        let grid = self.geometry.primary().grid_size;
        if !movement.primary
            || self.catalog.is_empty()
            || self.geometry.is_degenerate()
            || client <= 0.0
            || grid <= 0.0
        {
            return PageOutcome::NoMovement;
        }
        let distance = self.scroll.page_distance(client);

        let focused = self
            .focus
            .get_current()
            .map(|target| target.index())
            .filter(|&index| index < self.catalog.len());
        if let (InputMode::Keyboard, Some(current)) = (self.input_mode, focused) {
            let page_rows = lines_in(distance, grid);
            if let Some(found) =
                search::find_page_target(&self.catalog, &shape, current, movement.forward, page_rows)
            {
                self.cancel_deferred();
                let next = NextTarget {
                    next_index: found.index,
                    is_wrapped: false,
                    is_forward: movement.forward,
                };
                let window = self.window();
                let actions = self
                    .restoration
                    .resolve(next, direction, window, self.config.wrap, false);
                self.apply(actions);
                return PageOutcome::Focused { index: found.index };
            }
        }

        self.cancel_deferred();
        let from = self.scroll.target(Axis::Primary);
        let to = if movement.forward {
            from + distance
        } else {
            from - distance
        };
        let target = self.move_primary(to, true);
        if target == from {
            PageOutcome::NoMovement
        } else {
            PageOutcome::Scrolled { target }
        }
    }

    // ── Keys and focus ──────────────────────────────────────────────────

    /// Handles a direction key press (`repeat == false`) or auto-repeat.
    pub fn on_direction_key(&mut self, direction: Direction, repeat: bool) -> NavigationResult {
        if self.input_mode == InputMode::Pointer {
            if self.config.input_settle_ms == 0 {
                self.input_mode = InputMode::Keyboard;
            } else {
                self.scheduler
                    .cancel_where(|task| matches!(task, ListTask::InputModeSettle { .. }));
                self.scheduler.schedule(
                    self.scroll.now_ms(),
                    self.config.input_settle_ms,
                    ListTask::InputModeSettle { direction },
                );
                tracing::trace!(?direction, "key held until input mode settles");
                return NavigationResult::Buffered;
            }
        }

        match self.restoration.on_key(direction, repeat) {
            Some(KeyDisposition::Buffered) => return NavigationResult::Buffered,
            Some(KeyDisposition::Ignored) => return NavigationResult::Ignored,
            Some(KeyDisposition::Restart) => self.cancel_deferred(),
            None => {}
        }

        let Some(current) = self.current_index() else {
            return match self.first_visible_spottable() {
                Some(index) => self.focus_on_index(index),
                None => NavigationResult::NoMovement { propagated: false },
            };
        };

        let shape = GridShape::of(&self.geometry);
        let page_rows = self.geometry.page_lines();
        match self
            .navigator
            .navigate(&self.catalog, &shape, current, direction, repeat, page_rows)
        {
            Advance::To(next) => self.resolve(next, direction),
            Advance::Skipped => NavigationResult::Ignored,
            Advance::Blocked => {
                let propagated = self.focus.move_focus(direction);
                tracing::trace!(?direction, current, propagated, "no target inside the list");
                NavigationResult::NoMovement { propagated }
            }
        }
    }

    /// Handles the direction key being released.
    pub fn on_direction_key_up(&mut self) {
        self.navigator.on_key_up();
    }

    /// Records pointer input; the next direction key waits for the input
    /// mode to settle.
    pub fn on_pointer_activity(&mut self) {
        if self.input_mode != InputMode::Pointer {
            tracing::trace!("pointer input");
        }
        self.input_mode = InputMode::Pointer;
        self.scheduler
            .cancel_where(|task| matches!(task, ListTask::InputModeSettle { .. }));
    }

    /// Moves focus to `index` (clamped), scrolling it into the window first
    /// if needed.
    pub fn focus_on_index(&mut self, index: usize) -> NavigationResult {
        let len = self.catalog.len();
        if len == 0 {
            return NavigationResult::NoMovement { propagated: false };
        }
        let index = index.min(len - 1);
        if !self.catalog.is_spottable(index) {
            return NavigationResult::NoMovement { propagated: false };
        }
        self.cancel_deferred();
        let is_forward = self.current_index().is_none_or(|current| index >= current);
        let next = NextTarget {
            next_index: index,
            is_wrapped: false,
            is_forward,
        };
        let direction = self.primary_direction(is_forward);
        self.resolve(next, direction)
    }

    // ── Data, viewport and time ─────────────────────────────────────────

    /// Reacts to the number of items changing.
    ///
    /// Any deferred focus is cancelled, remembered focus is clamped and the
    /// window is re-validated against the new bounds.
    pub fn on_data_size_changed(&mut self, data_size: usize) {
        if data_size == self.catalog.len() {
            return;
        }
        tracing::debug!(from = self.catalog.len(), to = data_size, "data size changed");
        self.cancel_deferred();
        self.catalog.set_len(data_size);
        self.data_changed();
    }

    /// Replaces the item catalog, flags included.
    pub fn set_catalog(&mut self, catalog: ItemCatalog) {
        let resized = catalog.len() != self.catalog.len();
        if resized {
            self.cancel_deferred();
        }
        self.catalog = catalog;
        if resized {
            self.data_changed();
        } else {
            self.retarget_unspottable();
        }
    }

    /// Changes the flags of one item.
    ///
    /// A deferred move toward an item that can no longer take focus moves on
    /// to the next spottable item in the same direction.
    pub fn set_item_flags(&mut self, index: usize, flags: ItemFlags) {
        self.catalog.set_flags(index, flags);
        self.retarget_unspottable();
    }

    /// Records the measured primary extent of `index` for per-item sizing.
    ///
    /// Negative extents count as zero. Returns `false` (and does nothing) for
    /// other sizing modes, indices past the data and non-finite extents.
    pub fn set_item_extent(&mut self, index: usize, extent: f64) -> bool {
        if index >= self.catalog.len() || !extent.is_finite() {
            return false;
        }
        let extent = extent.max(0.0);
        let ItemSize::PerItem(sizes) = &mut self.config.item_size else {
            return false;
        };
        if index >= sizes.len() {
            let fill = sizes
                .iter()
                .copied()
                .filter(|s| s.is_finite() && *s > 0.0)
                .reduce(f64::min)
                .unwrap_or(extent);
            sizes.resize(index + 1, fill);
        }
        sizes[index] = extent;
        self.relayout();
        true
    }

    /// Records the secondary extents of the items on `line`.
    pub fn set_line_extents(&mut self, line: usize, extents: &[f64]) {
        self.lines
            .set_line_extents(line, extents, self.geometry.spacing());
        let widest = self.lines.max_content_extent();
        self.geometry.set_secondary_content_extent(widest);
        self.apply_bounds();
        self.update_lines();
    }

    /// Reacts to a new client size.
    pub fn on_viewport_resized(&mut self, viewport: ViewportSize) {
        if viewport == self.viewport {
            return;
        }
        tracing::debug!(width = viewport.width, height = viewport.height, "viewport resized");
        self.viewport = viewport;
        self.relayout();
    }

    /// Asks `host` for its client size and adopts it.
    pub fn remeasure(&mut self, host: &impl ViewportHost) {
        self.on_viewport_resized(host.measure_viewport());
    }

    /// Steps animations and fires due timers at virtual time `now_ms`.
    pub fn advance_time(&mut self, now_ms: u64) {
        let before = self.scroll.position(Axis::Primary);
        if self.scroll.advance(now_ms) {
            let after = self.scroll.position(Axis::Primary);
            self.refresh(ScrollDirection::between(before, after));
        }
        for (_, task) in self.scheduler.take_due(self.scroll.now_ms()) {
            match task {
                ListTask::FocusSettle { index } => {
                    let window = self.window();
                    let actions = self.restoration.settle(index, window);
                    self.apply(actions);
                }
                ListTask::InputModeSettle { direction } => {
                    self.input_mode = InputMode::Keyboard;
                    self.on_direction_key(direction, false);
                }
            }
        }
    }

    // ── Persistence ─────────────────────────────────────────────────────

    /// Scroll and focus worth restoring on the next mount.
    #[must_use]
    pub fn persisted_state(&self) -> PersistedListState {
        PersistedListState {
            last_focused_index: self.current_index(),
            scroll_position: self.scroll.target(Axis::Primary),
        }
    }

    /// Adopts a saved state, clamped to the current data and bounds.
    ///
    /// Focus is not moved; the remembered index is where the next direction
    /// key starts from.
    pub fn restore_state(&mut self, state: &PersistedListState) {
        self.cancel_deferred();
        let last = self.catalog.len().checked_sub(1);
        let index = state
            .last_focused_index
            .and_then(|i| last.map(|last| i.min(last)));
        self.restoration.set_last_focused(index);
        let position = if state.scroll_position.is_finite() {
            state.scroll_position
        } else {
            0.0
        };
        self.move_primary(position, false);
        tracing::debug!(?index, position, "list state restored");
    }

    /// Saves this list's state under its id. Returns `false` without an id.
    pub fn save_state(&self, store: &mut ListStateStore) -> bool {
        let Some(list_id) = self.config.list_id.as_deref() else {
            return false;
        };
        store.save(list_id, self.persisted_state());
        true
    }

    /// Takes this list's state out of `store` and restores it.
    ///
    /// Returns `false` if there was nothing saved under its id.
    pub fn restore_saved(&mut self, store: &mut ListStateStore) -> bool {
        let Some(state) = self
            .config
            .list_id
            .as_deref()
            .and_then(|list_id| store.take(list_id))
        else {
            return false;
        };
        self.restore_state(&state);
        true
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn current_index(&self) -> Option<usize> {
        let len = self.catalog.len();
        self.focus
            .get_current()
            .map(|target| target.index())
            .filter(|&index| index < len)
            .or_else(|| {
                self.restoration
                    .state()
                    .last_focused_index
                    .filter(|&index| index < len)
            })
    }

    fn first_visible_spottable(&mut self) -> Option<usize> {
        let visible = self.visible_range();
        let window = self.window();
        visible
            .chain(window.indices())
            .find(|&i| self.catalog.is_spottable(i))
    }

    fn primary_direction(&self, forward: bool) -> Direction {
        match self.geometry.orientation() {
            Orientation::Vertical if forward => Direction::Down,
            Orientation::Vertical => Direction::Up,
            Orientation::Horizontal if forward != self.geometry.rtl() => Direction::Right,
            Orientation::Horizontal => Direction::Left,
        }
    }

    fn resolve(&mut self, next: NextTarget, direction: Direction) -> NavigationResult {
        let window = self.window();
        let actions = self.restoration.resolve(
            next,
            direction,
            window,
            self.config.wrap,
            self.config.animate_focus_scroll,
        );
        self.apply(actions);
        let index = next.next_index;
        if self.restoration.is_deferred() {
            NavigationResult::Deferred { index }
        } else {
            NavigationResult::Moved { index }
        }
    }

    fn cancel_deferred(&mut self) {
        if !self.restoration.is_deferred() {
            return;
        }
        self.scheduler
            .cancel_where(|task| matches!(task, ListTask::FocusSettle { .. }));
        let actions = self.restoration.cancel();
        self.apply(actions);
        self.navigator.reset();
    }

    fn retarget_unspottable(&mut self) {
        let Some(index) = self.restoration.state().pending_focus_index else {
            return;
        };
        if self.catalog.is_spottable(index) {
            return;
        }
        let direction = self.restoration.pending_direction();
        tracing::debug!(index, ?direction, "deferred target can no longer take focus");
        self.cancel_deferred();
        if let Some(direction) = direction {
            self.on_direction_key(direction, false);
        }
    }

    fn apply(&mut self, actions: RestoreActions) {
        for action in actions {
            match action {
                RestoreAction::Focus { index } => self.focus_materialized(index),
                RestoreAction::Reveal { index, stick_to } => self.reveal(index, stick_to),
                RestoreAction::Pause => self.focus.pause(),
                RestoreAction::Resume => self.focus.resume(),
                RestoreAction::ScrollTo {
                    index,
                    stick_to,
                    animate,
                } => {
                    match self
                        .scroll
                        .position_for_index(&mut self.geometry, index, stick_to)
                    {
                        Some(position) => {
                            self.move_primary(position, animate);
                        }
                        None => self.cancel_deferred(),
                    }
                }
                RestoreAction::ShowPlaceholder { index } => {
                    self.focus.focus(FocusTarget::Placeholder { index });
                }
                RestoreAction::ScheduleSettle { index } => self.schedule_settle(index),
                RestoreAction::Replay { direction } => {
                    self.on_direction_key(direction, false);
                }
            }
        }
    }

    fn focus_materialized(&mut self, index: usize) {
        let target = match self.recycler.slot_of(index) {
            Some(slot) => FocusTarget::Item { index, slot },
            None => FocusTarget::Placeholder { index },
        };
        if !self.focus.focus(target) {
            tracing::debug!(index, "host refused focus");
        }
    }

    fn reveal(&mut self, index: usize, stick_to: StickTo) {
        let Some(position) = self
            .scroll
            .reveal_position(&mut self.geometry, index, stick_to)
        else {
            return;
        };
        if position != self.scroll.target(Axis::Primary) {
            self.move_primary(position, self.config.animate_focus_scroll);
        }
    }

    fn schedule_settle(&mut self, index: usize) {
        if self.config.focus_settle_ms == 0 {
            let window = self.window();
            let actions = self.restoration.settle(index, window);
            self.apply(actions);
            return;
        }
        self.scheduler
            .cancel_where(|task| matches!(task, ListTask::FocusSettle { .. }));
        self.scheduler.schedule(
            self.scroll.now_ms(),
            self.config.focus_settle_ms,
            ListTask::FocusSettle { index },
        );
    }

    /// Starts moving the primary axis to `position` and brings the window
    /// along. Returns the clamped target.
    fn move_primary(&mut self, position: f64, animate: bool) -> f64 {
        let before = self.scroll.position(Axis::Primary);
        let target = if animate {
            self.scroll.animate_to(Axis::Primary, position)
        } else {
            self.scroll.jump_to(Axis::Primary, position);
            self.scroll.position(Axis::Primary)
        };
        let after = self.scroll.position(Axis::Primary);
        self.refresh(ScrollDirection::between(before, after));
        target
    }

    /// Moves the window for the current primary position.
    fn refresh(&mut self, direction: ScrollDirection) {
        let position = self.scroll.position(Axis::Primary);
        if self
            .window_manager
            .set_primary_scroll_position(&mut self.geometry, position, direction)
        {
            self.recycle();
        }
        self.window_changed();
    }

    fn recycle(&mut self) {
        let window = self.window();
        self.placements = self.recycler.recycle(window, &mut self.geometry).placements;
    }

    /// Runs everything that depends on the window.
    fn window_changed(&mut self) {
        self.update_lines();
        self.keep_focus_materialized();
        let window = self.window();
        let actions = self.restoration.on_window_updated(window);
        self.apply(actions);
    }

    fn update_lines(&mut self) {
        let window = self.window();
        if window.is_empty() {
            return;
        }
        let first = self.geometry.line_of(window.first_index);
        let last = self.geometry.line_of(window.end() - 1);
        self.lines
            .update(first..last + 1, self.scroll.position(Axis::Secondary));
    }

    /// Moves host focus between a focused item and its placeholder as the
    /// item leaves and re-enters the window.
    fn keep_focus_materialized(&mut self) {
        if self.restoration.is_deferred() {
            return;
        }
        match self.focus.get_current() {
            Some(FocusTarget::Item { index, slot })
                if index < self.catalog.len() && self.recycler.slot_of(index) != Some(slot) =>
            {
                tracing::debug!(index, "focused item left the window");
                self.focus.focus(FocusTarget::Placeholder { index });
            }
            Some(FocusTarget::Placeholder { index }) => {
                if let Some(slot) = self.recycler.slot_of(index) {
                    self.focus.focus(FocusTarget::Item { index, slot });
                }
            }
            _ => {}
        }
    }

    fn apply_bounds(&mut self) {
        let orientation = self.geometry.orientation();
        let (max_primary, max_secondary) = self.geometry.scroll_bounds().max_for(orientation);
        self.scroll.set_bounds(max_primary, max_secondary);
    }

    /// Recomputes geometry from configuration, viewport and data size, then
    /// re-validates bounds, window, slots and focus.
    fn relayout(&mut self) {
        self.geometry = calculate(&self.config.geometry(), self.viewport, self.catalog.len());
        self.lines.set_line_count(self.geometry.line_count());
        self.lines
            .set_client_size(self.geometry.secondary().client_size);
        let widest = self.lines.max_content_extent();
        self.geometry.set_secondary_content_extent(widest);
        self.apply_bounds();
        let position = self.scroll.position(Axis::Primary);
        self.window_manager.reconcile(&mut self.geometry, position);
        self.recycle();
        self.window_changed();
    }

    fn data_changed(&mut self) {
        let len = self.catalog.len();
        self.restoration.clamp_to(len);
        self.relayout();
        let lost = self
            .focus
            .get_current()
            .is_some_and(|target| target.index() >= len);
        if !lost {
            return;
        }
        let last_spottable = (0..len).rev().find(|&i| self.catalog.is_spottable(i));
        if let Some(index) = last_spottable {
            self.focus_on_index(index);
        }
    }
}
