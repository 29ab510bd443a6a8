// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directional focus navigator.
//!
//! Maps `(current index, direction)` onto the next spottable index using the
//! row/column view of a [`GridShape`]:
//!
//! - moves along the scroll axis go to the nearest spottable item on the
//!   closest following line (skipping lines of disabled items),
//! - moves across it stay on the current line and stop at its edge,
//! - a blocked move along the scroll axis may wrap to the opposite extreme,
//! - held keys go through the [`Accelerator`].

use crate::search::{find_across_lines, find_in_line, find_page_target, wrap_target};
use crate::{Accelerator, AcceleratorConfig, Direction, GridShape, ItemCatalog, Stride};

/// What happens when a move runs off the end of the data.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WrapMode {
    /// Stop at the edge.
    #[default]
    Never,
    /// Wrap to the opposite extreme, scrolling there as usual.
    Wrap,
    /// Wrap to the opposite extreme and jump there without animation.
    NoAnimation,
}

impl WrapMode {
    /// Returns `true` unless wrapping is off.
    #[must_use]
    pub const fn wraps(self) -> bool {
        !matches!(self, Self::Never)
    }
}

/// A resolved navigation target.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NextTarget {
    /// Index to focus.
    pub next_index: usize,
    /// The move wrapped around the data.
    pub is_wrapped: bool,
    /// The key pointed toward higher indices.
    pub is_forward: bool,
}

/// Outcome of one key event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Advance {
    /// Move focus here.
    To(NextTarget),
    /// The accelerator swallowed the event.
    Skipped,
    /// Nothing spottable lies that way.
    Blocked,
}

/// Next spottable index from `current` toward `direction`.
///
/// `page_rows` bounds the first search tier and sizes [`Stride::Page`]
/// jumps. Wrapping is attempted only when `allow_wrap` is set and `wrap`
/// is not [`WrapMode::Never`].
#[must_use]
pub fn get_next_index(
    catalog: &ItemCatalog,
    shape: &GridShape,
    current: usize,
    direction: Direction,
    stride: Stride,
    wrap: WrapMode,
    allow_wrap: bool,
    page_rows: usize,
) -> Option<NextTarget> {
    if current >= shape.data_size || catalog.is_empty() || stride == Stride::Skip {
        return None;
    }
    let movement = shape.movement(direction);
    let is_forward = movement.forward;
    let target = |next_index, is_wrapped| NextTarget {
        next_index,
        is_wrapped,
        is_forward,
    };

    if !movement.primary {
        return find_in_line(catalog, shape, current, is_forward).map(|i| target(i, false));
    }

    let found = match stride {
        Stride::Page => find_page_target(catalog, shape, current, is_forward, page_rows),
        _ => find_across_lines(catalog, shape, current, is_forward, page_rows),
    };
    if let Some(found) = found {
        return Some(target(found.index, false));
    }
    if wrap.wraps() && allow_wrap {
        let wrapped = wrap_target(catalog, shape, current, is_forward)?;
        tracing::debug!(from = current, to = wrapped, ?direction, "navigation wrapped");
        return Some(target(wrapped, true));
    }
    None
}

/// Per-list navigation state.
#[derive(Clone, Debug, Default)]
pub struct Navigator {
    wrap: WrapMode,
    accelerator: Accelerator,
}

impl Navigator {
    /// A navigator with the given wrap behaviour and accelerator tuning.
    #[must_use]
    pub fn new(wrap: WrapMode, accelerator: AcceleratorConfig) -> Self {
        Self {
            wrap,
            accelerator: Accelerator::new(accelerator),
        }
    }

    /// Configured wrap behaviour.
    #[must_use]
    pub const fn wrap_mode(&self) -> WrapMode {
        self.wrap
    }

    /// Handles a direction key press or repeat.
    ///
    /// Held keys never wrap.
    pub fn navigate(
        &mut self,
        catalog: &ItemCatalog,
        shape: &GridShape,
        current: usize,
        direction: Direction,
        repeat: bool,
        page_rows: usize,
    ) -> Advance {
        let stride = self.accelerator.on_key(direction, repeat);
        if stride == Stride::Skip {
            return Advance::Skipped;
        }
        match get_next_index(
            catalog, shape, current, direction, stride, self.wrap, !repeat, page_rows,
        ) {
            Some(next) => Advance::To(next),
            None => Advance::Blocked,
        }
    }

    /// Handles the key being released.
    pub fn on_key_up(&mut self) {
        self.accelerator.reset();
    }

    /// Forgets any held key, as after a cancelled move.
    pub fn reset(&mut self) {
        self.accelerator.reset();
    }
}
