// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Extent model traits shared by the geometry strategies.

use crate::Scalar;

/// A dense strip of items indexed `0..len` along one axis.
///
/// Extents and offsets share the coordinate space of the scroll position
/// (typically logical pixels). Queries take `&mut self` so implementations can
/// repair internal caches lazily.
pub trait ExtentModel {
    /// Scalar type used for extents and offsets.
    type Scalar: Scalar;

    /// Number of items in the strip.
    fn len(&self) -> usize;

    /// Returns `true` if the strip has no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distance from the start of the first item to the end of the last one.
    fn total_extent(&mut self) -> Self::Scalar;

    /// Size of a single item along the strip. Never negative.
    fn extent_of(&mut self, index: usize) -> Self::Scalar;

    /// Start of `index` measured from the start of the strip.
    ///
    /// `offset_of(0) == 0` and offsets never decrease with the index.
    fn offset_of(&mut self, index: usize) -> Self::Scalar;

    /// Index of the item whose start is at or before `offset`, clamped to
    /// `0..len` (or `0` for an empty strip).
    fn index_at_offset(&mut self, offset: Self::Scalar) -> usize;
}

/// An [`ExtentModel`] whose item count can change after construction.
///
/// Uniform models give new items the shared extent; per-item models give them
/// zero extent until the owner measures them.
pub trait ResizableExtentModel: ExtentModel {
    /// Makes the model represent exactly `len` items.
    fn set_len(&mut self, len: usize);
}
