// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry calculator: per-axis metrics derived from configuration and data size.
//!
//! [`calculate`] is a pure function of a [`GeometryConfig`], the measured
//! [`ViewportSize`], and the item count. It must run again whenever any of
//! those change, before the window manager looks at the result.

use alloc::vec::Vec;
use core::num::NonZeroUsize;

use crate::scalar::{ceil_to_usize, floor_to_usize};
use crate::{ExtentModel, FixedExtentModel, GridLineModel, PrefixSumExtentModel};

/// Number of extra items materialized beyond the viewport unless configured otherwise.
pub const DEFAULT_OVERHANG: usize = 3;

/// Direction in which the list scrolls.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Lines stack top to bottom; the primary axis is vertical.
    #[default]
    Vertical,
    /// Lines stack left to right; the primary axis is horizontal.
    Horizontal,
}

impl Orientation {
    /// Returns `true` for [`Orientation::Vertical`].
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Vertical)
    }
}

/// How item sizes are specified.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemSize {
    /// Every item has this extent along the primary axis; one item per line.
    Fixed(f64),
    /// Grid cells at least this large. As many columns as fit are laid out
    /// and cells are stretched to fill the line, keeping their aspect ratio.
    Grid {
        /// Minimum cell width.
        min_width: f64,
        /// Minimum cell height.
        min_height: f64,
    },
    /// One primary-axis extent per item; one item per line. Items past the
    /// end of the vector use the smallest positive extent given.
    PerItem(Vec<f64>),
}

/// Client size reported by the host container.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportSize {
    /// Visible width.
    pub width: f64,
    /// Visible height.
    pub height: f64,
}

impl ViewportSize {
    /// Creates a viewport size, clamping negative or non-finite values to zero.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: clamp_size(width),
            height: clamp_size(height),
        }
    }

    /// Returns `(primary, secondary)` client sizes for `orientation`.
    #[must_use]
    pub fn split(self, orientation: Orientation) -> (f64, f64) {
        match orientation {
            Orientation::Vertical => (self.height, self.width),
            Orientation::Horizontal => (self.width, self.height),
        }
    }
}

fn clamp_size(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn floor(value: f64) -> f64 {
    #[allow(clippy::cast_precision_loss, reason = "Pixel sizes are far below 2^53")]
    let floored = floor_to_usize(value) as f64;
    floored
}

/// Metrics of one axis.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AxisMetrics {
    /// Visible extent of the viewport along this axis.
    pub client_size: f64,
    /// Extent of one item along this axis (the smallest one for per-item sizing).
    pub item_size: f64,
    /// `item_size + spacing`.
    pub grid_size: f64,
    /// Number of items in the catalog.
    pub data_size: usize,
    /// Largest first index a window may start at.
    pub max_first_index: usize,
}

/// Hysteresis band bounding the current first index, in scroll-position units.
///
/// The window is recomputed only once the position leaves `[min, max]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Threshold {
    /// Lower edge; `-inf` when the window already starts at the first line.
    pub min: f64,
    /// Upper edge; `+inf` when the window cannot move further forward.
    pub max: f64,
    /// Distance from the window start to the initial upper edge.
    pub base: f64,
}

impl Threshold {
    /// Returns `true` if `position` lies inside the band.
    #[must_use]
    pub fn contains(&self, position: f64) -> bool {
        position >= self.min && position <= self.max
    }
}

/// Scrollable extents of the content, as a host scroll container would report them.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ScrollBounds {
    /// Visible width.
    pub client_width: f64,
    /// Visible height.
    pub client_height: f64,
    /// Width of the content.
    pub scroll_width: f64,
    /// Height of the content.
    pub scroll_height: f64,
    /// `max(0, scroll_width - client_width)`.
    pub max_left: f64,
    /// `max(0, scroll_height - client_height)`.
    pub max_top: f64,
}

impl ScrollBounds {
    /// Builds bounds and derives the maxima.
    #[must_use]
    pub fn new(client: ViewportSize, scroll_width: f64, scroll_height: f64) -> Self {
        Self {
            client_width: client.width,
            client_height: client.height,
            scroll_width,
            scroll_height,
            max_left: (scroll_width - client.width).max(0.0),
            max_top: (scroll_height - client.height).max(0.0),
        }
    }

    /// Returns `(max_primary, max_secondary)` for `orientation`.
    #[must_use]
    pub fn max_for(&self, orientation: Orientation) -> (f64, f64) {
        match orientation {
            Orientation::Vertical => (self.max_top, self.max_left),
            Orientation::Horizontal => (self.max_left, self.max_top),
        }
    }
}

/// Inputs to [`calculate`] that come from configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeometryConfig {
    /// Item sizing.
    pub item_size: ItemSize,
    /// Gap between neighbouring items on both axes.
    pub spacing: f64,
    /// Extra items materialized beyond the viewport.
    pub overhang: usize,
    /// Primary axis.
    pub orientation: Orientation,
    /// Right-to-left layout; mirrors the horizontal axis.
    pub rtl: bool,
}

impl GeometryConfig {
    /// Vertical, left-to-right configuration with the default overhang and no spacing.
    #[must_use]
    pub fn new(item_size: ItemSize) -> Self {
        Self {
            item_size,
            spacing: 0.0,
            overhang: DEFAULT_OVERHANG,
            orientation: Orientation::Vertical,
            rtl: false,
        }
    }
}

/// The two ways item extents can be laid out along the primary axis.
#[derive(Clone, Debug)]
pub enum GeometryStrategy {
    /// Uniform line extent; items are grouped `dimension_to_extent` per line.
    Fixed(GridLineModel<FixedExtentModel<f64>>),
    /// Individual extents; one item per line.
    PerItem(PrefixSumExtentModel<f64>),
}

impl GeometryStrategy {
    /// Items per line.
    #[must_use]
    pub fn dimension_to_extent(&self) -> usize {
        match self {
            Self::Fixed(grid) => grid.dimension_to_extent(),
            Self::PerItem(_) => 1,
        }
    }

    /// Number of primary-axis lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        match self {
            Self::Fixed(grid) => grid.line_count(),
            Self::PerItem(items) => items.len(),
        }
    }

    /// Line containing `index`.
    #[must_use]
    pub fn line_of(&self, index: usize) -> usize {
        index / self.dimension_to_extent()
    }

    /// Position of `index` within its line.
    #[must_use]
    pub fn column_of(&self, index: usize) -> usize {
        index % self.dimension_to_extent()
    }

    /// Start of `line` along the primary axis.
    pub fn line_offset(&mut self, line: usize) -> f64 {
        match self {
            Self::Fixed(grid) => grid.lines_mut().offset_of(line),
            Self::PerItem(items) => items.offset_of(line),
        }
    }

    /// Extent of `line` along the primary axis.
    pub fn line_extent(&mut self, line: usize) -> f64 {
        match self {
            Self::Fixed(grid) => grid.lines_mut().extent_of(line),
            Self::PerItem(items) => items.extent_of(line),
        }
    }

    /// Line whose start is at or before `offset`.
    pub fn line_at_offset(&mut self, offset: f64) -> usize {
        match self {
            Self::Fixed(grid) => grid.lines_mut().index_at_offset(offset),
            Self::PerItem(items) => items.index_at_offset(offset),
        }
    }
}

impl ExtentModel for GeometryStrategy {
    type Scalar = f64;

    fn len(&self) -> usize {
        match self {
            Self::Fixed(grid) => grid.len(),
            Self::PerItem(items) => items.len(),
        }
    }

    fn total_extent(&mut self) -> f64 {
        match self {
            Self::Fixed(grid) => grid.total_extent(),
            Self::PerItem(items) => items.total_extent(),
        }
    }

    fn extent_of(&mut self, index: usize) -> f64 {
        match self {
            Self::Fixed(grid) => grid.extent_of(index),
            Self::PerItem(items) => items.extent_of(index),
        }
    }

    fn offset_of(&mut self, index: usize) -> f64 {
        match self {
            Self::Fixed(grid) => grid.offset_of(index),
            Self::PerItem(items) => items.offset_of(index),
        }
    }

    fn index_at_offset(&mut self, offset: f64) -> usize {
        match self {
            Self::Fixed(grid) => grid.index_at_offset(offset),
            Self::PerItem(items) => items.index_at_offset(offset),
        }
    }
}

/// Output of [`calculate`].
#[derive(Clone, Debug)]
pub struct Geometry {
    primary: AxisMetrics,
    secondary: AxisMetrics,
    dimension_to_extent: usize,
    num_of_items: usize,
    overhang: usize,
    lines_before: usize,
    orientation: Orientation,
    rtl: bool,
    spacing: f64,
    viewport: ViewportSize,
    secondary_content: Option<f64>,
    strategy: GeometryStrategy,
}

/// Derive metrics for `data_size` items shown in `viewport` under `config`.
///
/// Negative or non-finite sizes are treated as zero. A zero primary item size
/// yields a geometry that materializes nothing.
#[must_use]
pub fn calculate(config: &GeometryConfig, viewport: ViewportSize, data_size: usize) -> Geometry {
    let orientation = config.orientation;
    let viewport = ViewportSize::new(viewport.width, viewport.height);
    let (client_primary, client_secondary) = viewport.split(orientation);
    let spacing = clamp_size(config.spacing);
    // At least one line of overhang keeps a partially visible trailing line materialized.
    let overhang = config.overhang.max(1);
    let lines_before = overhang.div_ceil(2);

    let mut dimension_to_extent = 1;
    let (item_primary, item_secondary, strategy) = match &config.item_size {
        ItemSize::Fixed(size) => {
            let size = clamp_size(*size);
            (size, client_secondary, None)
        }
        ItemSize::Grid {
            min_width,
            min_height,
        } => {
            let (min_primary, min_secondary) = ViewportSize::new(*min_width, *min_height).split(orientation);
            if min_secondary > 0.0 && client_secondary > 0.0 {
                dimension_to_extent =
                    floor_to_usize((client_secondary + spacing) / (min_secondary + spacing)).max(1);
                #[allow(clippy::cast_precision_loss, reason = "Column counts are small")]
                let columns = dimension_to_extent as f64;
                let stretched = floor((client_secondary - spacing * (columns - 1.0)) / columns)
                    .max(min_secondary.min(client_secondary));
                let scaled = floor(min_primary * (stretched / min_secondary));
                (scaled, stretched, None)
            } else {
                (min_primary, min_secondary, None)
            }
        }
        ItemSize::PerItem(sizes) => {
            let sizes: Vec<f64> = sizes
                .iter()
                .take(data_size)
                .map(|&size| clamp_size(size))
                .collect();
            let mut items = PrefixSumExtentModel::from_extents(&sizes, spacing);
            let smallest = items.min_positive_extent().unwrap_or(0.0);
            items.resize(data_size, smallest);
            (smallest, client_secondary, Some(GeometryStrategy::PerItem(items)))
        }
    };

    let strategy = strategy.unwrap_or_else(|| {
        let lines = FixedExtentModel::with_spacing(0, item_primary, spacing);
        let dte = NonZeroUsize::new(dimension_to_extent).unwrap_or(NonZeroUsize::MIN);
        GeometryStrategy::Fixed(GridLineModel::new(lines, dte, data_size))
    });

    let grid_primary = item_primary + spacing;
    let num_of_items = if item_primary <= 0.0 {
        0
    } else {
        let lines = ceil_to_usize(client_primary / grid_primary) + overhang;
        data_size.min(dimension_to_extent.saturating_mul(lines))
    };
    let max_first_index = if data_size > num_of_items {
        (data_size - num_of_items).div_ceil(dimension_to_extent) * dimension_to_extent
    } else {
        0
    };

    let secondary_grid = if dimension_to_extent > 1 {
        item_secondary + spacing
    } else {
        item_secondary
    };

    Geometry {
        primary: AxisMetrics {
            client_size: client_primary,
            item_size: item_primary,
            grid_size: grid_primary,
            data_size,
            max_first_index,
        },
        secondary: AxisMetrics {
            client_size: client_secondary,
            item_size: item_secondary,
            grid_size: secondary_grid,
            data_size,
            max_first_index: dimension_to_extent - 1,
        },
        dimension_to_extent,
        num_of_items,
        overhang,
        lines_before,
        orientation,
        rtl: config.rtl,
        spacing,
        viewport,
        secondary_content: None,
        strategy,
    }
}

impl Geometry {
    /// Metrics of the scroll axis.
    #[must_use]
    pub const fn primary(&self) -> &AxisMetrics {
        &self.primary
    }

    /// Metrics of the cross axis.
    #[must_use]
    pub const fn secondary(&self) -> &AxisMetrics {
        &self.secondary
    }

    /// Items per primary-axis line.
    #[must_use]
    pub const fn dimension_to_extent(&self) -> usize {
        self.dimension_to_extent
    }

    /// Capacity of the window (and of the slot pool).
    #[must_use]
    pub const fn num_of_items(&self) -> usize {
        self.num_of_items
    }

    /// Number of items in the catalog.
    #[must_use]
    pub const fn data_size(&self) -> usize {
        self.primary.data_size
    }

    /// Largest first index a window may start at; always a line start.
    #[must_use]
    pub const fn max_first_index(&self) -> usize {
        self.primary.max_first_index
    }

    /// Effective overhang (at least one).
    #[must_use]
    pub const fn overhang(&self) -> usize {
        self.overhang
    }

    /// Lines kept materialized before the first visible line.
    #[must_use]
    pub const fn lines_before(&self) -> usize {
        self.lines_before
    }

    /// Primary axis.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Right-to-left layout.
    #[must_use]
    pub const fn rtl(&self) -> bool {
        self.rtl
    }

    /// Gap between neighbouring items.
    #[must_use]
    pub const fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Viewport the geometry was computed for.
    #[must_use]
    pub const fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    /// Returns `true` if the geometry cannot materialize anything.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.num_of_items == 0
    }

    /// Layout strategy.
    #[must_use]
    pub const fn strategy(&self) -> &GeometryStrategy {
        &self.strategy
    }

    /// Layout strategy, mutably. Callers that change extents through this
    /// must re-run the window manager afterwards.
    pub fn strategy_mut(&mut self) -> &mut GeometryStrategy {
        &mut self.strategy
    }

    /// Number of primary-axis lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.strategy.line_count()
    }

    /// Line containing `index`.
    #[must_use]
    pub const fn line_of(&self, index: usize) -> usize {
        index / self.dimension_to_extent
    }

    /// Position of `index` within its line.
    #[must_use]
    pub const fn column_of(&self, index: usize) -> usize {
        index % self.dimension_to_extent
    }

    /// Largest first line a window may start at.
    #[must_use]
    pub const fn max_first_line(&self) -> usize {
        self.primary.max_first_index / self.dimension_to_extent
    }

    /// Whole lines that fit in the viewport (at least one).
    #[must_use]
    pub fn page_lines(&self) -> usize {
        if self.primary.grid_size <= 0.0 {
            return 1;
        }
        floor_to_usize(self.primary.client_size / self.primary.grid_size).max(1)
    }

    /// Threshold before any scrolling: `{min: -inf, max: base, base}`.
    #[must_use]
    pub fn initial_threshold(&self) -> Threshold {
        let base = self.threshold_base();
        Threshold {
            min: f64::NEG_INFINITY,
            max: base,
            base,
        }
    }

    /// Distance covered by the lines kept before the first visible line.
    #[must_use]
    pub fn threshold_base(&self) -> f64 {
        #[allow(clippy::cast_precision_loss, reason = "Small line counts")]
        let lines = self.lines_before as f64;
        self.primary.grid_size * lines
    }

    /// Extent of all items along the primary axis.
    pub fn content_extent(&mut self) -> f64 {
        self.strategy.total_extent()
    }

    /// Extent of the content along the secondary axis.
    #[must_use]
    pub fn secondary_content_extent(&self) -> f64 {
        if let Some(extent) = self.secondary_content {
            return extent.max(self.secondary.client_size);
        }
        #[allow(clippy::cast_precision_loss, reason = "Column counts are small")]
        let columns = self.dimension_to_extent as f64;
        let laid_out = if self.dimension_to_extent > 1 {
            self.secondary.grid_size * columns - self.spacing
        } else {
            self.secondary.item_size
        };
        laid_out.max(self.secondary.client_size)
    }

    /// Overrides the secondary content extent, for lines whose items have
    /// individual secondary extents.
    pub fn set_secondary_content_extent(&mut self, extent: Option<f64>) {
        self.secondary_content = extent.map(clamp_size);
    }

    /// Largest valid primary scroll position.
    pub fn max_scroll(&mut self) -> f64 {
        (self.content_extent() - self.primary.client_size).max(0.0)
    }

    /// Scroll bounds in physical (width/height) terms.
    pub fn scroll_bounds(&mut self) -> ScrollBounds {
        let primary = self.content_extent();
        let secondary = self.secondary_content_extent();
        let (width, height) = match self.orientation {
            Orientation::Vertical => (secondary, primary),
            Orientation::Horizontal => (primary, secondary),
        };
        ScrollBounds::new(self.viewport, width, height)
    }

    /// Primary and secondary offset of `index` inside the content.
    pub fn item_offset(&mut self, index: usize) -> (f64, f64) {
        #[allow(clippy::cast_precision_loss, reason = "Column counts are small")]
        let column = self.column_of(index) as f64;
        (self.strategy.offset_of(index), column * self.secondary.grid_size)
    }

    /// Primary and secondary extent of `index`.
    pub fn item_extent(&mut self, index: usize) -> (f64, f64) {
        (self.strategy.extent_of(index), self.secondary.item_size)
    }
}
