// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat item indices laid out on primary-axis lines.
//!
//! A grid scrolls by *lines* (rows of a vertical grid, columns of a horizontal
//! one) while data is addressed by a flat item index. [`GridLineModel`] wraps
//! a per-line [`ExtentModel`] and presents it per item:
//!
//! - line `= index / dimension_to_extent`, column `= index % dimension_to_extent`,
//! - an item's offset and extent are those of its line,
//! - [`ExtentModel::index_at_offset`] returns the first item of the line at
//!   that offset.
//!
//! A simple list is the degenerate case of one item per line.

use core::num::NonZeroUsize;

use crate::{ExtentModel, ResizableExtentModel, Scalar};

/// Adapts a per-line [`ExtentModel`] into a per-item one.
#[derive(Debug, Clone)]
pub struct GridLineModel<M: ResizableExtentModel> {
    lines: M,
    dimension_to_extent: NonZeroUsize,
    len: usize,
}

impl<M: ResizableExtentModel> GridLineModel<M> {
    /// Lays `len` items out on `lines`, `dimension_to_extent` per line.
    ///
    /// The line model is resized to `ceil(len / dimension_to_extent)` lines; a
    /// trailing partial line shares the extent of a full one.
    #[must_use]
    pub fn new(lines: M, dimension_to_extent: NonZeroUsize, len: usize) -> Self {
        let mut model = Self {
            lines,
            dimension_to_extent,
            len,
        };
        model.sync_line_count();
        model
    }

    fn sync_line_count(&mut self) {
        let count = self.line_count();
        self.lines.set_len(count);
    }

    /// Returns the per-line model.
    #[must_use]
    pub fn lines(&self) -> &M {
        &self.lines
    }

    /// Returns the per-line model mutably.
    pub fn lines_mut(&mut self) -> &mut M {
        &mut self.lines
    }

    /// Number of items per line.
    #[must_use]
    pub const fn dimension_to_extent(&self) -> usize {
        self.dimension_to_extent.get()
    }

    /// Number of items.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if there are no items.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Changes the number of items, resizing the line model to match.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.sync_line_count();
    }

    /// Line containing `index`.
    #[must_use]
    pub const fn line_of(&self, index: usize) -> usize {
        index / self.dimension_to_extent.get()
    }

    /// Position of `index` within its line.
    #[must_use]
    pub const fn column_of(&self, index: usize) -> usize {
        index % self.dimension_to_extent.get()
    }

    /// First item index of `line`.
    #[must_use]
    pub const fn first_index_of_line(&self, line: usize) -> usize {
        line.saturating_mul(self.dimension_to_extent.get())
    }

    /// Number of lines needed for all items.
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.len.div_ceil(self.dimension_to_extent.get())
    }
}

impl<M: ResizableExtentModel> ExtentModel for GridLineModel<M> {
    type Scalar = M::Scalar;

    fn len(&self) -> usize {
        self.len
    }

    fn total_extent(&mut self) -> Self::Scalar {
        self.lines.total_extent()
    }

    fn extent_of(&mut self, index: usize) -> Self::Scalar {
        if self.len == 0 {
            return M::Scalar::zero();
        }
        let line = self.line_of(index.min(self.len - 1));
        self.lines.extent_of(line)
    }

    fn offset_of(&mut self, index: usize) -> Self::Scalar {
        if self.len == 0 {
            return M::Scalar::zero();
        }
        let line = self.line_of(index.min(self.len - 1));
        self.lines.offset_of(line)
    }

    fn index_at_offset(&mut self, offset: Self::Scalar) -> usize {
        if self.len == 0 {
            return 0;
        }
        let line = self.lines.index_at_offset(offset);
        self.first_index_of_line(line).min(self.len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::GridLineModel;
    use crate::{ExtentModel, FixedExtentModel};
    use core::num::NonZeroUsize;

    fn four_wide(len: usize) -> GridLineModel<FixedExtentModel<f64>> {
        let lines = FixedExtentModel::with_spacing(0, 30.0, 10.0);
        GridLineModel::new(lines, NonZeroUsize::new(4).unwrap(), len)
    }

    #[test]
    fn items_map_onto_lines_and_columns() {
        let grid = four_wide(10);
        assert_eq!(grid.line_count(), 3);
        assert_eq!(grid.lines().len(), 3);
        assert_eq!(grid.line_of(5), 1);
        assert_eq!(grid.column_of(5), 1);
        assert_eq!(grid.first_index_of_line(2), 8);
    }

    #[test]
    fn item_geometry_comes_from_its_line() {
        let mut grid = four_wide(10);
        assert_eq!(grid.offset_of(3), 0.0);
        assert_eq!(grid.offset_of(4), 40.0);
        assert_eq!(grid.offset_of(9), 80.0);
        assert_eq!(grid.extent_of(9), 30.0);
        assert_eq!(grid.total_extent(), 110.0);
    }

    #[test]
    fn offsets_resolve_to_the_first_item_of_a_line() {
        let mut grid = four_wide(10);
        assert_eq!(grid.index_at_offset(0.0), 0);
        assert_eq!(grid.index_at_offset(45.0), 4);
        assert_eq!(grid.index_at_offset(500.0), 8);

        grid.set_len(13);
        assert_eq!(grid.lines().len(), 4);
        assert_eq!(grid.index_at_offset(500.0), 12);
    }
}
