// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-item extents with a lazily repaired prefix-sum cache.

use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::{ExtentModel, ResizableExtentModel, Scalar};

/// An [`ExtentModel`] for items of individual size.
///
/// Item starts are cached as prefix sums. Edits only mark the cache dirty from
/// the first touched index; the cache is repaired on demand up to the index a
/// query needs, so updating one row near the end of a long list stays cheap.
///
/// Items are separated by a constant `spacing`, matching
/// [`FixedExtentModel`](crate::FixedExtentModel).
#[derive(Clone, Default, Debug)]
pub struct PrefixSumExtentModel<S: Scalar> {
    extents: Vec<S>,
    starts: Vec<S>,
    spacing: S,
    /// Lowest index whose cached start may be stale.
    stale_from: Option<usize>,
}

fn sanitize<S: Scalar>(extent: S) -> S {
    debug_assert!(
        extent.is_finite(),
        "PrefixSumExtentModel extents must be finite; got {extent:?}"
    );
    if extent.is_sign_negative() {
        S::zero()
    } else {
        extent
    }
}

impl<S: Scalar> PrefixSumExtentModel<S> {
    /// Creates an empty model without spacing.
    #[must_use]
    pub fn new() -> Self {
        Self {
            extents: Vec::new(),
            starts: Vec::new(),
            spacing: S::zero(),
            stale_from: None,
        }
    }

    /// Creates a model from explicit extents separated by `spacing`.
    #[must_use]
    pub fn from_extents(extents: &[S], spacing: S) -> Self {
        let mut model = Self::new();
        model.spacing = sanitize(spacing);
        model.replace_all(extents.iter().copied());
        model
    }

    /// Replaces every extent at once.
    pub fn replace_all<I>(&mut self, extents: I)
    where
        I: IntoIterator<Item = S>,
    {
        self.extents.clear();
        self.extents.extend(extents.into_iter().map(sanitize));
        self.starts.resize(self.extents.len(), S::zero());
        self.stale_from = Some(0);
    }

    /// Resizes the model; new items get `fill` as their extent.
    pub fn resize(&mut self, len: usize, fill: S) {
        let old = self.extents.len();
        self.extents.resize(len, sanitize(fill));
        self.starts.resize(len, S::zero());
        self.mark_stale(old.min(len));
    }

    /// Updates the extent of a single item, growing the model if needed.
    pub fn set_extent(&mut self, index: usize, extent: S) {
        if index >= self.extents.len() {
            self.resize(index + 1, S::zero());
        }
        self.extents[index] = sanitize(extent);
        self.mark_stale(index);
    }

    /// Sets the gap between neighbouring items.
    pub fn set_spacing(&mut self, spacing: S) {
        self.spacing = sanitize(spacing);
        self.mark_stale(0);
    }

    /// Returns the gap between neighbouring items.
    #[must_use]
    pub const fn spacing(&self) -> S {
        self.spacing
    }

    /// Returns the smallest non-zero extent, if any.
    #[must_use]
    pub fn min_positive_extent(&self) -> Option<S> {
        self.extents
            .iter()
            .copied()
            .filter(|e| *e > S::zero())
            .fold(None, |acc: Option<S>, e| {
                Some(acc.map_or(e, |a| a.min(e)))
            })
    }

    /// Returns the extent of `index`, or zero when out of range.
    #[must_use]
    pub fn extent_at(&self, index: usize) -> S {
        self.extents.get(index).copied().unwrap_or_else(S::zero)
    }

    fn mark_stale(&mut self, from: usize) {
        self.stale_from = Some(self.stale_from.map_or(from, |s| s.min(from)));
    }

    fn repair_through(&mut self, through: usize) {
        let len = self.extents.len();
        if len == 0 {
            self.stale_from = None;
            return;
        }
        let through = through.min(len - 1);
        let from = match self.stale_from {
            Some(from) if from <= through => from,
            _ => return,
        };

        let mut pos = if from == 0 {
            S::zero()
        } else {
            self.starts[from - 1] + self.extents[from - 1] + self.spacing
        };
        for i in from..=through {
            self.starts[i] = pos;
            pos = pos + self.extents[i] + self.spacing;
        }

        self.stale_from = (through + 1 < len).then_some(through + 1);
    }
}

impl<S: Scalar> ExtentModel for PrefixSumExtentModel<S> {
    type Scalar = S;

    fn len(&self) -> usize {
        self.extents.len()
    }

    fn total_extent(&mut self) -> S {
        let Some(last) = self.extents.len().checked_sub(1) else {
            return S::zero();
        };
        self.repair_through(last);
        self.starts[last] + self.extents[last]
    }

    fn extent_of(&mut self, index: usize) -> S {
        self.extent_at(index)
    }

    fn offset_of(&mut self, index: usize) -> S {
        let len = self.extents.len();
        if index == 0 || len == 0 {
            return S::zero();
        }
        if index >= len {
            // One past the end starts after the trailing gap.
            return self.total_extent() + self.spacing;
        }
        self.repair_through(index);
        self.starts[index]
    }

    fn index_at_offset(&mut self, offset: S) -> usize {
        let len = self.extents.len();
        if len == 0 {
            return 0;
        }
        self.repair_through(len - 1);
        let target = offset.max(S::zero());
        match self
            .starts
            .binary_search_by(|start| start.partial_cmp(&target).unwrap_or(Ordering::Equal))
        {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        }
    }
}

impl<S: Scalar> ResizableExtentModel for PrefixSumExtentModel<S> {
    fn set_len(&mut self, len: usize) {
        self.resize(len, S::zero());
    }
}

#[cfg(test)]
mod tests {
    use super::{ExtentModel, PrefixSumExtentModel};

    #[test]
    fn offsets_include_spacing() {
        let mut model = PrefixSumExtentModel::from_extents(&[10.0_f64, 20.0, 30.0], 5.0);
        assert_eq!(model.offset_of(0), 0.0);
        assert_eq!(model.offset_of(1), 15.0);
        assert_eq!(model.offset_of(2), 40.0);
        assert_eq!(model.total_extent(), 70.0);
        assert_eq!(model.offset_of(3), 75.0);
    }

    #[test]
    fn edits_repair_only_the_suffix() {
        let mut model = PrefixSumExtentModel::from_extents(&[10.0_f32; 4], 0.0);
        assert_eq!(model.total_extent(), 40.0);

        model.set_extent(2, 25.0);
        assert_eq!(model.offset_of(2), 20.0);
        assert_eq!(model.offset_of(3), 45.0);
        assert_eq!(model.total_extent(), 55.0);
    }

    #[test]
    fn index_lookup_is_a_binary_search() {
        let mut model = PrefixSumExtentModel::from_extents(&[10.0_f64, 50.0, 10.0], 0.0);
        assert_eq!(model.index_at_offset(0.0), 0);
        assert_eq!(model.index_at_offset(9.9), 0);
        assert_eq!(model.index_at_offset(10.0), 1);
        assert_eq!(model.index_at_offset(59.0), 1);
        assert_eq!(model.index_at_offset(60.0), 2);
        assert_eq!(model.index_at_offset(1_000.0), 2);
    }

    #[test]
    fn growing_fills_new_items_and_tracks_minimum() {
        let mut model = PrefixSumExtentModel::from_extents(&[40.0_f64, 0.0], 0.0);
        model.resize(4, 25.0);
        assert_eq!(model.len(), 4);
        assert_eq!(model.extent_at(3), 25.0);
        assert_eq!(model.min_positive_extent(), Some(25.0));
        assert_eq!(model.total_extent(), 90.0);
    }
}
