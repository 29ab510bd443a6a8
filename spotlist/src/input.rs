// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input mode and the timers a list schedules.

use spotlist_focus::Direction;

/// Which kind of input the user drove the list with last.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum InputMode {
    /// Direction keys.
    #[default]
    Keyboard,
    /// Wheel, touch or pointer.
    Pointer,
}

/// Single-shot work a list defers to its scheduler.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ListTask {
    /// Focus `index` once it has stayed materialized for the settle delay.
    FocusSettle {
        /// Pending focus target.
        index: usize,
    },
    /// Finish switching to keyboard input, then handle the key that caused it.
    InputModeSettle {
        /// Key pressed while in pointer mode.
        direction: Direction,
    },
}
