// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host focus manager, as a capability the list is handed.

use alloc::vec::Vec;

use spotlist_window::SlotId;

use crate::Direction;

/// Something the list can put focus on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    /// A materialized item.
    Item {
        /// Data index.
        index: usize,
        /// Slot rendering it.
        slot: SlotId,
    },
    /// A transient stand-in for an item that is not materialized yet.
    Placeholder {
        /// Data index the placeholder stands for.
        index: usize,
    },
}

impl FocusTarget {
    /// Data index the target represents.
    #[must_use]
    pub const fn index(&self) -> usize {
        match *self {
            Self::Item { index, .. } | Self::Placeholder { index } => index,
        }
    }

    /// Returns `true` for [`FocusTarget::Placeholder`].
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }
}

/// Host focus manager.
///
/// The list never reaches for a global focus singleton; it is given one of
/// these and drives it through this interface only.
pub trait FocusSystem {
    /// Currently focused target of this list, if any.
    fn get_current(&self) -> Option<FocusTarget>;

    /// Moves focus to `target`. Returns `false` if the host refused.
    fn focus(&mut self, target: FocusTarget) -> bool;

    /// Stops the host from reacting to navigation on its own.
    fn pause(&mut self);

    /// Undoes [`pause`](Self::pause).
    fn resume(&mut self);

    /// Lets the host move focus out of the list toward `direction`.
    ///
    /// Returns `true` if focus went somewhere.
    fn move_focus(&mut self, direction: Direction) -> bool;
}

/// In-memory [`FocusSystem`] that records what it was asked to do.
#[derive(Clone, Debug, Default)]
pub struct HeadlessFocus {
    current: Option<FocusTarget>,
    paused: bool,
    /// Every target focused, in order.
    pub history: Vec<FocusTarget>,
    /// Directions handed to [`FocusSystem::move_focus`].
    pub moved_out: Vec<Direction>,
    /// Answer to give from [`FocusSystem::move_focus`].
    pub accept_moves: bool,
}

impl HeadlessFocus {
    /// A focus manager with nothing focused.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` between [`FocusSystem::pause`] and [`FocusSystem::resume`].
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Drops focus, as when the user clicks elsewhere.
    pub fn blur(&mut self) {
        self.current = None;
    }
}

impl FocusSystem for HeadlessFocus {
    fn get_current(&self) -> Option<FocusTarget> {
        self.current
    }

    fn focus(&mut self, target: FocusTarget) -> bool {
        self.current = Some(target);
        self.history.push(target);
        true
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn move_focus(&mut self, direction: Direction) -> bool {
        self.moved_out.push(direction);
        if self.accept_moves {
            self.current = None;
        }
        self.accept_moves
    }
}
