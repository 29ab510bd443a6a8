// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=spotlist_window --heading-base-level=0

//! Spotlist Window: the windowing half of a headless virtualized list.
//!
//! A virtualized list renders only a small window of its `N` items and moves
//! that window as the user scrolls. This crate owns the arithmetic:
//!
//! - [`Scalar`], [`ExtentModel`] and its implementations ([`FixedExtentModel`],
//!   [`PrefixSumExtentModel`], [`GridLineModel`]) describe item extents along
//!   one axis. [`compute_visible_strip`] answers "which items intersect this
//!   viewport" for any of them.
//! - [`calculate`] turns a [`GeometryConfig`], a [`ViewportSize`] and the data
//!   size into a [`Geometry`]: per-axis [`AxisMetrics`], items per line, window
//!   capacity and the tagged [`GeometryStrategy`] (uniform lines or per-item
//!   extents).
//! - [`WindowManager`] owns the window's first index. It keeps a hysteresis
//!   [`Threshold`] band around the scroll position and moves the window only
//!   when the position leaves the band in the direction of travel.
//! - [`SecondaryLines`] caches a secondary-axis window per primary line for
//!   rows whose items scroll sideways.
//! - [`SlotRecycler`] assigns materialized indices to a fixed pool of slots
//!   and reports which slots changed hands; [`SlotPool`] keeps host handles
//!   and calls the [`ItemRenderer`] only for those.
//! - [`ScrollController`] clamps, animates, pages and accumulates wheel input.
//!
//! This crate does not know about focus, input devices, or any UI framework.
//!
//! ## Minimal example
//!
//! ```rust
//! use spotlist_window::{
//!     GeometryConfig, ItemSize, ScrollDirection, SlotRecycler, ViewportSize, WindowManager,
//!     calculate,
//! };
//!
//! // 100 rows, 30 logical pixels each, in a 300 pixel viewport.
//! let config = GeometryConfig::new(ItemSize::Fixed(30.0));
//! let mut geometry = calculate(&config, ViewportSize::new(200.0, 300.0), 100);
//! assert_eq!(geometry.num_of_items(), 13);
//!
//! let mut window = WindowManager::new(&mut geometry);
//! let mut slots = SlotRecycler::new();
//!
//! // Small scrolls stay inside the threshold band.
//! assert!(!window.set_primary_scroll_position(&mut geometry, 45.0, ScrollDirection::Forward));
//!
//! // A jump moves the window by whole lines.
//! assert!(window.set_primary_scroll_position(&mut geometry, 900.0, ScrollDirection::Forward));
//! let current = window.window(&geometry);
//! assert!(current.contains(30));
//!
//! let recycled = slots.recycle(current, &mut geometry);
//! assert_eq!(recycled.placements.len(), 13);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod fixed;
mod geometry;
mod grid_line;
mod lines;
mod model;
mod prefix_sum;
mod scalar;
mod scroll;
mod slots;
mod strip;
mod window;

pub use fixed::FixedExtentModel;
pub use geometry::{
    AxisMetrics, DEFAULT_OVERHANG, Geometry, GeometryConfig, GeometryStrategy, ItemSize,
    Orientation, ScrollBounds, Threshold, ViewportSize, calculate,
};
pub use grid_line::GridLineModel;
pub use lines::SecondaryLines;
pub use model::{ExtentModel, ResizableExtentModel};
pub use prefix_sum::PrefixSumExtentModel;
pub use scalar::Scalar;
pub use scroll::{
    Axis, DEFAULT_ANIMATION_MS, DEFAULT_PAGE_MULTIPLIER, ScrollAnimation, ScrollController,
    ScrollRequest, ScrollTarget, StickTo,
};
pub use slots::{
    Fragment, FragmentKind, ItemRenderer, Placement, Recycled, SlotId, SlotPool, SlotRecycler,
    split_at_viewport,
};
pub use strip::{VisibleStrip, compute_visible_strip};
pub use window::{ScrollDirection, Window, WindowManager, is_fully_visible, visible_items};
