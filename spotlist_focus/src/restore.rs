// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus restoration: getting focus onto items that are not materialized yet.
//!
//! ```text
//! Idle ──resolve──▶ Resolving ──in window──▶ Direct ──▶ Idle
//!                        │
//!                        └──outside window──▶ Deferred ──settled──▶ Idle
//!                                                 │
//!                                                 └──cancel──▶ Idle
//! ```
//!
//! The machine only decides; it hands back [`RestoreAction`]s for the owner
//! to carry out against the scroll controller, the slot recycler, the focus
//! system and the scheduler.

use smallvec::SmallVec;
use spotlist_window::{StickTo, Window};

use crate::{Direction, NextTarget, WrapMode};

/// Phase of the restoration protocol.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RestorePhase {
    /// No focus target pending.
    #[default]
    Idle,
    /// A target was computed and is being classified.
    Resolving,
    /// The target is materialized and gets focus at once.
    Direct,
    /// The target is being scrolled into the window.
    Deferred,
}

/// Focus bookkeeping of one list.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FocusState {
    /// Index that last received focus.
    pub last_focused_index: Option<usize>,
    /// Target of the in-flight deferred resolution.
    pub pending_focus_index: Option<usize>,
    /// Navigation is paused while a deferred resolution is in flight.
    pub paused: bool,
    /// The most recent move wrapped around the data.
    pub wrapped: bool,
}

/// Something the owner of the protocol must do.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RestoreAction {
    /// Focus the materialized item at `index`.
    Focus {
        /// Data index.
        index: usize,
    },
    /// Scroll just far enough that `index` is fully visible.
    Reveal {
        /// Data index.
        index: usize,
        /// Edge to align if a scroll is needed.
        stick_to: StickTo,
    },
    /// Pause the host focus system.
    Pause,
    /// Resume the host focus system.
    Resume,
    /// Scroll `index` into the window.
    ScrollTo {
        /// Data index.
        index: usize,
        /// Edge to align.
        stick_to: StickTo,
        /// Whether the scroll may animate.
        animate: bool,
    },
    /// Focus a stand-in for `index` until it is materialized.
    ShowPlaceholder {
        /// Data index.
        index: usize,
    },
    /// Start the settle timer for `index`.
    ScheduleSettle {
        /// Data index.
        index: usize,
    },
    /// Handle a key that was held back during the resolution.
    Replay {
        /// Direction of the buffered key.
        direction: Direction,
    },
}

/// Actions returned by one protocol step.
pub type RestoreActions = SmallVec<[RestoreAction; 4]>;

/// What happened to a key that arrived mid-resolution.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyDisposition {
    /// Kept, to be replayed once the resolution finishes.
    Buffered,
    /// Dropped (held keys).
    Ignored,
    /// The key goes elsewhere; the owner should cancel and start over.
    Restart,
}

/// The focus restoration state machine.
#[derive(Clone, Debug, Default)]
pub struct FocusRestoration {
    state: FocusState,
    phase: RestorePhase,
    direction: Option<Direction>,
    buffered: Option<Direction>,
    settle_scheduled: bool,
    placeholder_shown: bool,
}

fn stick_to_for(forward: bool) -> StickTo {
    if forward { StickTo::End } else { StickTo::Start }
}

impl FocusRestoration {
    /// An idle protocol with nothing focused.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current bookkeeping.
    #[must_use]
    pub const fn state(&self) -> &FocusState {
        &self.state
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> RestorePhase {
        self.phase
    }

    /// Returns `true` while a deferred resolution is in flight.
    #[must_use]
    pub const fn is_deferred(&self) -> bool {
        matches!(self.phase, RestorePhase::Deferred)
    }

    /// Direction of the key that started the in-flight resolution.
    #[must_use]
    pub const fn pending_direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Records focus that arrived without navigation (pointer, host, restore).
    pub fn set_last_focused(&mut self, index: Option<usize>) {
        self.state.last_focused_index = index;
    }

    fn enter(&mut self, phase: RestorePhase) {
        tracing::trace!(from = ?self.phase, to = ?phase, "focus restoration phase");
        self.phase = phase;
    }

    /// Starts resolving `next`, reached by pressing `direction`.
    ///
    /// Targets inside `window` are focused directly; others are scrolled to
    /// with navigation paused.
    pub fn resolve(
        &mut self,
        next: NextTarget,
        direction: Direction,
        window: Window,
        wrap: WrapMode,
        animate: bool,
    ) -> RestoreActions {
        let mut actions = RestoreActions::new();
        self.enter(RestorePhase::Resolving);
        self.state.wrapped = next.is_wrapped;
        let index = next.next_index;
        let stick_to = stick_to_for(next.is_forward);

        if window.contains(index) {
            self.enter(RestorePhase::Direct);
            self.state.last_focused_index = Some(index);
            actions.push(RestoreAction::Focus { index });
            actions.push(RestoreAction::Reveal { index, stick_to });
            self.enter(RestorePhase::Idle);
            return actions;
        }

        self.enter(RestorePhase::Deferred);
        self.state.pending_focus_index = Some(index);
        self.state.paused = true;
        self.direction = Some(direction);
        self.buffered = None;
        self.settle_scheduled = false;
        self.placeholder_shown = false;
        let animate = animate && !(next.is_wrapped && wrap == WrapMode::NoAnimation);
        actions.push(RestoreAction::Pause);
        actions.push(RestoreAction::ScrollTo {
            index,
            stick_to,
            animate,
        });
        tracing::debug!(index, ?direction, animate, "focus deferred");
        actions
    }

    /// Reacts to the window after a scroll step.
    ///
    /// Once the pending target is materialized the settle timer is
    /// requested; until then a placeholder holds focus.
    pub fn on_window_updated(&mut self, window: Window) -> RestoreActions {
        let mut actions = RestoreActions::new();
        let (RestorePhase::Deferred, Some(index)) = (self.phase, self.state.pending_focus_index) else {
            return actions;
        };
        if window.contains(index) {
            if !self.settle_scheduled {
                self.settle_scheduled = true;
                actions.push(RestoreAction::ScheduleSettle { index });
            }
        } else if !self.placeholder_shown {
            self.placeholder_shown = true;
            actions.push(RestoreAction::ShowPlaceholder { index });
        }
        actions
    }

    /// Finishes the resolution once the settle timer for `index` fires.
    ///
    /// Stale timers and targets that left the window again are ignored.
    pub fn settle(&mut self, index: usize, window: Window) -> RestoreActions {
        let mut actions = RestoreActions::new();
        if !self.is_deferred() || self.state.pending_focus_index != Some(index) {
            return actions;
        }
        if !window.contains(index) {
            self.settle_scheduled = false;
            return actions;
        }
        self.state.pending_focus_index = None;
        self.state.last_focused_index = Some(index);
        self.state.paused = false;
        self.direction = None;
        self.enter(RestorePhase::Idle);
        actions.push(RestoreAction::Focus { index });
        actions.push(RestoreAction::Resume);
        if let Some(direction) = self.buffered.take() {
            actions.push(RestoreAction::Replay { direction });
        }
        tracing::debug!(index, "deferred focus resolved");
        actions
    }

    /// Classifies a key arriving while a resolution is in flight.
    ///
    /// Returns `None` when nothing is in flight.
    pub fn on_key(&mut self, direction: Direction, repeat: bool) -> Option<KeyDisposition> {
        if !self.is_deferred() {
            return None;
        }
        if self.direction != Some(direction) {
            return Some(KeyDisposition::Restart);
        }
        if repeat {
            return Some(KeyDisposition::Ignored);
        }
        self.buffered = Some(direction);
        Some(KeyDisposition::Buffered)
    }

    /// Abandons the in-flight resolution without focusing anything.
    pub fn cancel(&mut self) -> RestoreActions {
        let mut actions = RestoreActions::new();
        if !self.is_deferred() {
            return actions;
        }
        tracing::warn!(
            pending = ?self.state.pending_focus_index,
            "deferred focus cancelled"
        );
        self.state.pending_focus_index = None;
        self.state.paused = false;
        self.direction = None;
        self.buffered = None;
        self.settle_scheduled = false;
        self.placeholder_shown = false;
        self.enter(RestorePhase::Idle);
        actions.push(RestoreAction::Resume);
        actions
    }

    /// Drops a remembered focus index that no longer exists.
    pub fn clamp_to(&mut self, data_size: usize) {
        if self.state.last_focused_index.is_some_and(|i| i >= data_size) {
            self.state.last_focused_index = data_size.checked_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(first_index: usize, num_of_items: usize) -> Window {
        Window {
            first_index,
            num_of_items,
        }
    }

    fn down(next_index: usize) -> NextTarget {
        NextTarget {
            next_index,
            is_wrapped: false,
            is_forward: true,
        }
    }

    #[test]
    fn targets_in_the_window_focus_directly() {
        let mut restore = FocusRestoration::new();
        let actions = restore.resolve(down(5), Direction::Down, window(0, 13), WrapMode::Never, true);
        assert_eq!(
            actions.as_slice(),
            &[
                RestoreAction::Focus { index: 5 },
                RestoreAction::Reveal {
                    index: 5,
                    stick_to: StickTo::End
                }
            ]
        );
        assert_eq!(restore.phase(), RestorePhase::Idle);
        assert_eq!(restore.state().last_focused_index, Some(5));
        assert!(!restore.state().paused);
    }

    #[test]
    fn targets_outside_the_window_are_deferred_until_materialized() {
        let mut restore = FocusRestoration::new();
        let actions = restore.resolve(down(40), Direction::Down, window(0, 13), WrapMode::Never, false);
        assert_eq!(
            actions.as_slice(),
            &[
                RestoreAction::Pause,
                RestoreAction::ScrollTo {
                    index: 40,
                    stick_to: StickTo::End,
                    animate: false
                }
            ]
        );
        assert!(restore.is_deferred());
        assert_eq!(restore.state().pending_focus_index, Some(40));
        assert!(restore.state().paused);

        // Still scrolling: a placeholder holds focus, shown once.
        let actions = restore.on_window_updated(window(10, 13));
        assert_eq!(actions.as_slice(), &[RestoreAction::ShowPlaceholder { index: 40 }]);
        assert!(restore.on_window_updated(window(20, 13)).is_empty());

        let landed = window(30, 13);
        let actions = restore.on_window_updated(landed);
        assert_eq!(actions.as_slice(), &[RestoreAction::ScheduleSettle { index: 40 }]);
        assert!(restore.on_window_updated(landed).is_empty());

        assert!(restore.settle(39, landed).is_empty());
        let actions = restore.settle(40, landed);
        assert_eq!(
            actions.as_slice(),
            &[RestoreAction::Focus { index: 40 }, RestoreAction::Resume]
        );
        assert_eq!(restore.phase(), RestorePhase::Idle);
        assert_eq!(restore.state().pending_focus_index, None);
        assert!(!restore.state().paused);
        assert_eq!(restore.state().last_focused_index, Some(40));
    }

    #[test]
    fn keys_during_a_resolution_are_buffered_ignored_or_restart() {
        let mut restore = FocusRestoration::new();
        assert_eq!(restore.on_key(Direction::Down, false), None);
        restore.resolve(down(40), Direction::Down, window(0, 13), WrapMode::Never, false);
        assert_eq!(restore.on_key(Direction::Down, true), Some(KeyDisposition::Ignored));
        assert_eq!(restore.on_key(Direction::Down, false), Some(KeyDisposition::Buffered));
        assert_eq!(restore.on_key(Direction::Up, false), Some(KeyDisposition::Restart));

        let landed = window(30, 13);
        restore.on_window_updated(landed);
        let actions = restore.settle(40, landed);
        assert_eq!(
            actions.last(),
            Some(&RestoreAction::Replay {
                direction: Direction::Down
            })
        );
    }

    #[test]
    fn cancelling_returns_to_idle_without_focus() {
        let mut restore = FocusRestoration::new();
        assert!(restore.cancel().is_empty());
        restore.resolve(down(40), Direction::Down, window(0, 13), WrapMode::Never, false);
        assert_eq!(restore.cancel().as_slice(), &[RestoreAction::Resume]);
        assert_eq!(restore.phase(), RestorePhase::Idle);
        assert_eq!(restore.state().pending_focus_index, None);
        assert!(restore.settle(40, window(30, 13)).is_empty());
    }

    #[test]
    fn wrapped_moves_skip_animation_when_asked() {
        let mut restore = FocusRestoration::new();
        let wrapped = NextTarget {
            next_index: 1,
            is_wrapped: true,
            is_forward: true,
        };
        let actions = restore.resolve(wrapped, Direction::Down, window(87, 13), WrapMode::NoAnimation, true);
        assert!(actions.contains(&RestoreAction::ScrollTo {
            index: 1,
            stick_to: StickTo::End,
            animate: false
        }));
        assert!(restore.state().wrapped);
    }

    #[test]
    fn remembered_focus_follows_shrinking_data() {
        let mut restore = FocusRestoration::new();
        restore.set_last_focused(Some(50));
        restore.clamp_to(20);
        assert_eq!(restore.state().last_focused_index, Some(19));
        restore.clamp_to(0);
        assert_eq!(restore.state().last_focused_index, None);
    }
}
