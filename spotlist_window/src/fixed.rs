// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform extents with a fixed gap between neighbours.

use crate::{ExtentModel, ResizableExtentModel, Scalar};

/// An [`ExtentModel`] where every item has the same extent and neighbours are
/// separated by a constant `spacing`.
///
/// The distance between the starts of two consecutive items (the *grid size*)
/// is `extent + spacing`. The strip ends at the trailing edge of the last item,
/// so the final gap is not counted in [`ExtentModel::total_extent`].
#[derive(Debug, Clone, Copy)]
pub struct FixedExtentModel<S: Scalar> {
    len: usize,
    extent: S,
    spacing: S,
}

fn non_negative<S: Scalar>(value: S, what: &str) -> S {
    debug_assert!(value.is_finite(), "{what} must be finite; got {value:?}");
    if value.is_sign_negative() {
        S::zero()
    } else {
        value
    }
}

impl<S: Scalar> FixedExtentModel<S> {
    /// Creates a model with `len` items of uniform `extent` and no spacing.
    #[must_use]
    pub fn new(len: usize, extent: S) -> Self {
        Self::with_spacing(len, extent, S::zero())
    }

    /// Creates a model with `len` items of uniform `extent` separated by `spacing`.
    ///
    /// Negative values are clamped to zero.
    #[must_use]
    pub fn with_spacing(len: usize, extent: S, spacing: S) -> Self {
        Self {
            len,
            extent: non_negative(extent, "FixedExtentModel extent"),
            spacing: non_negative(spacing, "FixedExtentModel spacing"),
        }
    }

    /// Sets the number of items.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
    }

    /// Sets the uniform extent.
    pub fn set_extent(&mut self, extent: S) {
        self.extent = non_negative(extent, "FixedExtentModel extent");
    }

    /// Sets the gap between neighbouring items.
    pub fn set_spacing(&mut self, spacing: S) {
        self.spacing = non_negative(spacing, "FixedExtentModel spacing");
    }

    /// Returns the uniform extent.
    #[must_use]
    pub const fn extent(&self) -> S {
        self.extent
    }

    /// Returns the gap between neighbouring items.
    #[must_use]
    pub const fn spacing(&self) -> S {
        self.spacing
    }

    /// Returns the distance between the starts of consecutive items.
    #[must_use]
    pub fn grid_size(&self) -> S {
        self.extent + self.spacing
    }
}

impl<S: Scalar> ExtentModel for FixedExtentModel<S> {
    type Scalar = S;

    fn len(&self) -> usize {
        self.len
    }

    fn total_extent(&mut self) -> S {
        if self.len == 0 {
            return S::zero();
        }
        self.grid_size() * S::from_usize(self.len) - self.spacing
    }

    fn extent_of(&mut self, _index: usize) -> S {
        self.extent
    }

    fn offset_of(&mut self, index: usize) -> S {
        S::from_usize(index) * self.grid_size()
    }

    fn index_at_offset(&mut self, offset: S) -> usize {
        let grid = self.grid_size();
        if self.len == 0 || grid <= S::zero() {
            return 0;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Index is clamped to bounds immediately after the cast"
        )]
        let line = (offset / grid).floor_to_isize();
        line.clamp(0, self.len as isize - 1).unsigned_abs()
    }
}

impl<S: Scalar> ResizableExtentModel for FixedExtentModel<S> {
    fn set_len(&mut self, len: usize) {
        self.set_len(len);
    }
}
