// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stateless visible-range query over an [`ExtentModel`].
//!
//! The window manager keeps its own hysteresis state for the primary axis;
//! this helper answers the same question from scratch and is used for the
//! per-line secondary windows, where each line is small and recomputing is
//! cheaper than tracking thresholds.

use crate::{ExtentModel, Scalar};

/// Items intersecting a viewport, plus spacer extents around them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleStrip<S: Scalar> {
    /// First materialized index (inclusive).
    pub start: usize,
    /// One past the last materialized index.
    pub end: usize,
    /// Offset of `start` from the beginning of the strip.
    pub before_extent: S,
    /// Space left after the last materialized item.
    pub after_extent: S,
    /// Extent of the whole strip.
    pub content_extent: S,
}

impl<S: Scalar> VisibleStrip<S> {
    /// A strip with nothing materialized.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            start: 0,
            end: 0,
            before_extent: S::zero(),
            after_extent: S::zero(),
            content_extent: S::zero(),
        }
    }

    /// Returns `true` if no items are materialized.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if `[from, to]` lies inside the materialized items.
    #[must_use]
    pub fn covers(&self, from: S, to: S) -> bool {
        !self.is_empty()
            && from >= self.before_extent
            && to <= self.content_extent - self.after_extent
    }
}

/// Compute which items of `model` intersect `[scroll_offset, scroll_offset + viewport_extent)`.
///
/// The range is then widened by `overhang_before` items before and
/// `overhang_after` items after, clamped to the strip.
pub fn compute_visible_strip<M>(
    model: &mut M,
    scroll_offset: M::Scalar,
    viewport_extent: M::Scalar,
    overhang_before: usize,
    overhang_after: usize,
) -> VisibleStrip<M::Scalar>
where
    M: ExtentModel,
{
    let zero = <M::Scalar as Scalar>::zero();
    let len = model.len();
    let content_extent = model.total_extent().max(zero);
    if len == 0 || content_extent <= zero {
        return VisibleStrip::empty();
    }

    let view_start = scroll_offset.max(zero).min(content_extent);
    let view_end = (view_start + viewport_extent.max(zero)).min(content_extent);

    let first = model.index_at_offset(view_start).min(len - 1);
    let mut end = first + 1;
    while end < len && model.offset_of(end) < view_end {
        end += 1;
    }

    let start = first.saturating_sub(overhang_before);
    let end = end.saturating_add(overhang_after).min(len);

    let before_extent = model.offset_of(start);
    let after_extent = if end < len {
        let last = end - 1;
        (content_extent - (model.offset_of(last) + model.extent_of(last))).max(zero)
    } else {
        zero
    };

    VisibleStrip {
        start,
        end,
        before_extent,
        after_extent,
        content_extent,
    }
}
