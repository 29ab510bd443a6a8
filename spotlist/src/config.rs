// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-list configuration.

use alloc::string::String;
use alloc::vec::Vec;

use spotlist_focus::{AcceleratorConfig, WrapMode};
use spotlist_window::{
    DEFAULT_ANIMATION_MS, DEFAULT_OVERHANG, DEFAULT_PAGE_MULTIPLIER, GeometryConfig, ItemSize,
    Orientation,
};

/// Item extent used by [`ListConfig::default`].
pub const DEFAULT_ITEM_SIZE: f64 = 48.0;

/// Delay between a deferred target entering the window and it receiving focus.
pub const DEFAULT_FOCUS_SETTLE_MS: u64 = 30;

/// Delay between a pointer-to-keyboard switch and the first key taking effect.
pub const DEFAULT_INPUT_SETTLE_MS: u64 = 30;

/// Everything a list needs to know up front.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListConfig {
    /// Item sizing.
    pub item_size: ItemSize,
    /// Gap between neighbouring items.
    pub spacing: f64,
    /// Extra items materialized beyond the viewport.
    pub overhang: usize,
    /// Primary axis.
    pub orientation: Orientation,
    /// Right-to-left layout.
    pub rtl: bool,
    /// What happens at the ends of the data.
    pub wrap: WrapMode,
    /// Share of the viewport moved by one page.
    pub page_multiplier: f64,
    /// Length of animated scrolls; zero disables animation.
    pub scroll_animation_ms: u64,
    /// See [`DEFAULT_FOCUS_SETTLE_MS`].
    pub focus_settle_ms: u64,
    /// See [`DEFAULT_INPUT_SETTLE_MS`].
    pub input_settle_ms: u64,
    /// Key-repeat tuning.
    pub accelerator: AcceleratorConfig,
    /// Whether scrolls caused by focus moves animate.
    pub animate_focus_scroll: bool,
    /// Key under which scroll and focus are persisted.
    pub list_id: Option<String>,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self::new(ItemSize::Fixed(DEFAULT_ITEM_SIZE))
    }
}

/// A configuration value the list cannot use as given.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A fixed item size that is zero, negative or not a number.
    #[error("item size {0} is not a positive number")]
    ItemSize(f64),
    /// A grid cell minimum that is zero, negative or not a number.
    #[error("grid cell minimum {min_width}x{min_height} is not positive")]
    GridCell {
        /// Configured minimum width.
        min_width: f64,
        /// Configured minimum height.
        min_height: f64,
    },
    /// Per-item sizing without a single positive extent.
    #[error("per-item sizes contain no positive extent")]
    PerItemSizes,
    /// A per-item size that is negative or not finite.
    #[error("per-item size {size} at index {index} is not a finite, non-negative number")]
    PerItemSize {
        /// Position in the size list.
        index: usize,
        /// Configured size.
        size: f64,
    },
    /// Spacing that is negative or not finite.
    #[error("spacing {0} is not a finite, non-negative number")]
    Spacing(f64),
    /// A page multiplier outside `(0, 1]`.
    #[error("page multiplier {0} is outside (0, 1]")]
    PageMultiplier(f64),
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl ListConfig {
    /// Defaults for everything but the item size.
    #[must_use]
    pub fn new(item_size: ItemSize) -> Self {
        Self {
            item_size,
            spacing: 0.0,
            overhang: DEFAULT_OVERHANG,
            orientation: Orientation::Vertical,
            rtl: false,
            wrap: WrapMode::Never,
            page_multiplier: DEFAULT_PAGE_MULTIPLIER,
            scroll_animation_ms: DEFAULT_ANIMATION_MS,
            focus_settle_ms: DEFAULT_FOCUS_SETTLE_MS,
            input_settle_ms: DEFAULT_INPUT_SETTLE_MS,
            accelerator: AcceleratorConfig::default(),
            animate_focus_scroll: false,
            list_id: None,
        }
    }

    /// Sets [`spacing`](Self::spacing).
    #[must_use]
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Sets [`overhang`](Self::overhang).
    #[must_use]
    pub fn with_overhang(mut self, overhang: usize) -> Self {
        self.overhang = overhang;
        self
    }

    /// Sets [`orientation`](Self::orientation).
    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Sets [`rtl`](Self::rtl).
    #[must_use]
    pub fn with_rtl(mut self, rtl: bool) -> Self {
        self.rtl = rtl;
        self
    }

    /// Sets [`wrap`](Self::wrap).
    #[must_use]
    pub fn with_wrap(mut self, wrap: WrapMode) -> Self {
        self.wrap = wrap;
        self
    }

    /// Sets [`page_multiplier`](Self::page_multiplier).
    #[must_use]
    pub fn with_page_multiplier(mut self, page_multiplier: f64) -> Self {
        self.page_multiplier = page_multiplier;
        self
    }

    /// Sets [`scroll_animation_ms`](Self::scroll_animation_ms).
    #[must_use]
    pub fn with_scroll_animation_ms(mut self, ms: u64) -> Self {
        self.scroll_animation_ms = ms;
        self
    }

    /// Sets [`focus_settle_ms`](Self::focus_settle_ms).
    #[must_use]
    pub fn with_focus_settle_ms(mut self, ms: u64) -> Self {
        self.focus_settle_ms = ms;
        self
    }

    /// Sets [`input_settle_ms`](Self::input_settle_ms).
    #[must_use]
    pub fn with_input_settle_ms(mut self, ms: u64) -> Self {
        self.input_settle_ms = ms;
        self
    }

    /// Sets [`accelerator`](Self::accelerator).
    #[must_use]
    pub fn with_accelerator(mut self, accelerator: AcceleratorConfig) -> Self {
        self.accelerator = accelerator;
        self
    }

    /// Sets [`animate_focus_scroll`](Self::animate_focus_scroll).
    #[must_use]
    pub fn with_animate_focus_scroll(mut self, animate: bool) -> Self {
        self.animate_focus_scroll = animate;
        self
    }

    /// Sets [`list_id`](Self::list_id).
    #[must_use]
    pub fn with_list_id(mut self, list_id: impl Into<String>) -> Self {
        self.list_id = Some(list_id.into());
        self
    }

    /// Every problem with this configuration, in field order.
    #[must_use]
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        match &self.item_size {
            ItemSize::Fixed(size) if !positive(*size) => errors.push(ConfigError::ItemSize(*size)),
            ItemSize::Grid {
                min_width,
                min_height,
            } if !positive(*min_width) || !positive(*min_height) => {
                errors.push(ConfigError::GridCell {
                    min_width: *min_width,
                    min_height: *min_height,
                });
            }
            ItemSize::PerItem(sizes) if !sizes.iter().any(|s| positive(*s)) => {
                errors.push(ConfigError::PerItemSizes);
            }
            ItemSize::PerItem(sizes) => {
                errors.extend(
                    sizes
                        .iter()
                        .enumerate()
                        .filter(|(_, size)| !size.is_finite() || **size < 0.0)
                        .map(|(index, &size)| ConfigError::PerItemSize { index, size }),
                );
            }
            _ => {}
        }
        if !self.spacing.is_finite() || self.spacing < 0.0 {
            errors.push(ConfigError::Spacing(self.spacing));
        }
        if !positive(self.page_multiplier) || self.page_multiplier > 1.0 {
            errors.push(ConfigError::PageMultiplier(self.page_multiplier));
        }
        errors
    }

    /// Logs every problem and replaces unusable values with safe ones.
    ///
    /// Bad per-item sizes take the smallest positive size. Other bad item
    /// sizes are left alone; geometry treats them as zero and the list
    /// materializes nothing.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        for error in self.validate() {
            tracing::warn!(%error, "invalid list configuration");
            match error {
                ConfigError::Spacing(_) => self.spacing = 0.0,
                ConfigError::PageMultiplier(_) => self.page_multiplier = DEFAULT_PAGE_MULTIPLIER,
                ConfigError::PerItemSize { index, .. } => {
                    if let ItemSize::PerItem(sizes) = &mut self.item_size {
                        let smallest = sizes
                            .iter()
                            .copied()
                            .filter(|s| positive(*s))
                            .reduce(f64::min)
                            .unwrap_or(0.0);
                        sizes[index] = smallest;
                    }
                }
                ConfigError::ItemSize(_) | ConfigError::GridCell { .. } | ConfigError::PerItemSizes => {}
            }
        }
        self
    }

    /// The part of this configuration that shapes geometry.
    #[must_use]
    pub fn geometry(&self) -> GeometryConfig {
        GeometryConfig {
            item_size: self.item_size.clone(),
            spacing: self.spacing,
            overhang: self.overhang,
            orientation: self.orientation,
            rtl: self.rtl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn builder_sets_fields() {
        let config = ListConfig::new(ItemSize::Fixed(30.0))
            .with_spacing(4.0)
            .with_overhang(5)
            .with_orientation(Orientation::Horizontal)
            .with_rtl(true)
            .with_wrap(WrapMode::NoAnimation)
            .with_scroll_animation_ms(0)
            .with_list_id("inbox");
        assert_eq!(config.spacing, 4.0);
        assert_eq!(config.overhang, 5);
        assert_eq!(config.orientation, Orientation::Horizontal);
        assert!(config.rtl);
        assert_eq!(config.wrap, WrapMode::NoAnimation);
        assert_eq!(config.scroll_animation_ms, 0);
        assert_eq!(config.list_id.as_deref(), Some("inbox"));

        let geometry = config.geometry();
        assert_eq!(geometry.item_size, ItemSize::Fixed(30.0));
        assert_eq!(geometry.overhang, 5);
        assert!(geometry.rtl);
    }

    #[test]
    fn defaults_are_valid() {
        let config = ListConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.page_multiplier, 0.8);
        assert_eq!(config.focus_settle_ms, 30);
        assert!(!config.animate_focus_scroll);
    }

    #[test]
    fn problems_are_reported_and_clamped() {
        let config = ListConfig::new(ItemSize::Fixed(0.0))
            .with_spacing(f64::NAN)
            .with_page_multiplier(0.0);
        let errors = config.validate();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0], ConfigError::ItemSize(0.0));
        assert!(matches!(errors[1], ConfigError::Spacing(s) if s.is_nan()));
        assert_eq!(errors[2], ConfigError::PageMultiplier(0.0));

        let clamped = config.sanitized();
        assert_eq!(clamped.spacing, 0.0);
        assert_eq!(clamped.page_multiplier, 0.8);
        assert_eq!(clamped.validate(), vec![ConfigError::ItemSize(0.0)]);
    }

    #[test]
    fn per_item_and_grid_sizes_are_checked() {
        let per_item = ListConfig::new(ItemSize::PerItem(vec![0.0, -1.0]));
        assert_eq!(per_item.validate(), vec![ConfigError::PerItemSizes]);
        let grid = ListConfig::new(ItemSize::Grid {
            min_width: 100.0,
            min_height: 0.0,
        });
        assert_eq!(
            grid.validate(),
            vec![ConfigError::GridCell {
                min_width: 100.0,
                min_height: 0.0
            }]
        );
    }

    #[test]
    fn non_finite_per_item_sizes_take_the_smallest_size() {
        let config = ListConfig::new(ItemSize::PerItem(vec![30.0, f64::NAN, 20.0, -4.0]));
        let errors = config.validate();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], ConfigError::PerItemSize { index: 1, size } if size.is_nan()));
        assert_eq!(errors[1], ConfigError::PerItemSize { index: 3, size: -4.0 });

        let clamped = config.sanitized();
        assert_eq!(clamped.item_size, ItemSize::PerItem(vec![30.0, 20.0, 20.0, 20.0]));
        assert!(clamped.validate().is_empty());
    }

    #[test]
    fn errors_read_well() {
        use alloc::string::ToString;
        assert_eq!(
            ConfigError::PageMultiplier(1.5).to_string(),
            "page multiplier 1.5 is outside (0, 1]"
        );
    }
}
