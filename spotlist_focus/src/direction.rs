// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directions and the row/column view of a flat index space.

use spotlist_window::{Geometry, Orientation};

/// A 5-way direction key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Toward the top of the screen.
    Up,
    /// Toward the bottom of the screen.
    Down,
    /// Toward the left of the screen.
    Left,
    /// Toward the right of the screen.
    Right,
}

impl Direction {
    /// The direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns `true` for [`Direction::Up`] and [`Direction::Down`].
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

/// Which axis a key moves along, and which way.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Movement {
    /// `true` when moving across lines (along the scroll axis).
    pub primary: bool,
    /// `true` toward higher indices.
    pub forward: bool,
}

/// The row/column decomposition of `0..data_size`.
///
/// A "row" here is a primary-axis line: `column = index % dimension_to_extent`
/// and `row = index / dimension_to_extent`, whatever the orientation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GridShape {
    /// Number of items.
    pub data_size: usize,
    /// Items per line (at least one).
    pub dimension_to_extent: usize,
    /// Scroll axis.
    pub orientation: Orientation,
    /// Mirrors left and right.
    pub rtl: bool,
}

impl GridShape {
    /// A shape with `dimension_to_extent` clamped to at least one.
    #[must_use]
    pub fn new(data_size: usize, dimension_to_extent: usize, orientation: Orientation, rtl: bool) -> Self {
        Self {
            data_size,
            dimension_to_extent: dimension_to_extent.max(1),
            orientation,
            rtl,
        }
    }

    /// The shape a [`Geometry`] lays items out in.
    #[must_use]
    pub fn of(geometry: &Geometry) -> Self {
        Self::new(
            geometry.data_size(),
            geometry.dimension_to_extent(),
            geometry.orientation(),
            geometry.rtl(),
        )
    }

    /// Line containing `index`.
    #[must_use]
    pub const fn row_of(&self, index: usize) -> usize {
        index / self.dimension_to_extent
    }

    /// Position of `index` within its line.
    #[must_use]
    pub const fn column_of(&self, index: usize) -> usize {
        index % self.dimension_to_extent
    }

    /// Number of lines.
    #[must_use]
    pub const fn row_count(&self) -> usize {
        self.data_size.div_ceil(self.dimension_to_extent)
    }

    /// Indices on `row`, clamped to the data.
    #[must_use]
    pub fn row_range(&self, row: usize) -> core::ops::Range<usize> {
        let start = row.saturating_mul(self.dimension_to_extent).min(self.data_size);
        let end = start.saturating_add(self.dimension_to_extent).min(self.data_size);
        start..end
    }

    /// How `direction` moves under this shape's orientation and text direction.
    #[must_use]
    pub const fn movement(&self, direction: Direction) -> Movement {
        let forward = match direction {
            Direction::Down => true,
            Direction::Up => false,
            Direction::Right => !self.rtl,
            Direction::Left => self.rtl,
        };
        let primary = direction.is_vertical() == self.orientation.is_vertical();
        Movement { primary, forward }
    }
}
