// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for the windowing engine.
//!
//! For arbitrary list shapes and scroll sequences:
//!
//! 1. The window never starts past `max_first_index` nor runs past the data.
//! 2. Every item intersecting the viewport is materialized.
//! 3. Positions inside the threshold band never move the window.
//! 4. Slots and indices are in bijection over the window.
//! 5. Scrolling to an index materializes it.

use std::collections::HashSet;

use proptest::prelude::*;
use spotlist_window::{
    Axis, Geometry, GeometryConfig, ItemSize, ScrollController, ScrollDirection, SlotRecycler,
    StickTo, ViewportSize, WindowManager, calculate, visible_items,
};

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Shape {
    item_size: ItemSize,
    spacing: f64,
    overhang: usize,
    viewport: ViewportSize,
    len: usize,
}

impl Shape {
    fn geometry(&self) -> Geometry {
        let mut config = GeometryConfig::new(self.item_size.clone());
        config.spacing = self.spacing;
        config.overhang = self.overhang;
        calculate(&config, self.viewport, self.len)
    }
}

fn fixed_or_grid() -> impl Strategy<Value = ItemSize> {
    prop_oneof![
        (1_u32..=80).prop_map(|size| ItemSize::Fixed(f64::from(size))),
        (20_u32..=120, 10_u32..=80).prop_map(|(w, h)| ItemSize::Grid {
            min_width: f64::from(w),
            min_height: f64::from(h),
        }),
    ]
}

fn shape(item_size: impl Strategy<Value = ItemSize>) -> impl Strategy<Value = Shape> {
    (
        item_size,
        0_u32..=8,
        0_usize..=6,
        (50_u32..=600, 50_u32..=600),
        0_usize..=400,
    )
        .prop_map(|(item_size, spacing, overhang, (w, h), len)| Shape {
            item_size,
            spacing: f64::from(spacing),
            overhang,
            viewport: ViewportSize::new(f64::from(w), f64::from(h)),
            len,
        })
}

fn per_item() -> impl Strategy<Value = ItemSize> {
    prop::collection::vec(1_u32..=90, 0..60)
        .prop_map(|sizes| ItemSize::PerItem(sizes.into_iter().map(f64::from).collect()))
}

/// Scroll positions as fractions of the scrollable range.
fn positions() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0_u32..=1_000, 1..24)
}

fn scroll_through(
    geometry: &mut Geometry,
    manager: &mut WindowManager,
    previous: &mut f64,
    fraction: u32,
) -> f64 {
    let max = geometry.max_scroll();
    let position = (max * f64::from(fraction) / 1_000.0).floor();
    let direction = ScrollDirection::between(*previous, position);
    manager.set_primary_scroll_position(geometry, position, direction);
    *previous = position;
    position
}

// ═════════════════════════════════════════════════════════════════════════
// 1–2. Window bounds and viewport coverage
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn window_stays_in_bounds_and_covers_the_viewport(
        shape in shape(fixed_or_grid()),
        fractions in positions(),
    ) {
        let mut geometry = shape.geometry();
        let mut manager = WindowManager::new(&mut geometry);
        let mut previous = 0.0;
        for fraction in fractions {
            let position = scroll_through(&mut geometry, &mut manager, &mut previous, fraction);
            let window = manager.window(&geometry);
            prop_assert!(window.first_index <= geometry.max_first_index());
            prop_assert!(window.end() <= geometry.data_size());
            let visible = visible_items(&mut geometry, position);
            prop_assert!(
                visible.is_empty() || (window.contains(visible.start) && window.contains(visible.end - 1)),
                "window {:?} misses visible {:?} at {}",
                window, visible, position
            );
        }
    }

    #[test]
    fn per_item_windows_stay_in_bounds(
        shape in shape(per_item()),
        fractions in positions(),
    ) {
        let mut geometry = shape.geometry();
        let mut manager = WindowManager::new(&mut geometry);
        let mut previous = 0.0;
        for fraction in fractions {
            let position = scroll_through(&mut geometry, &mut manager, &mut previous, fraction);
            let window = manager.window(&geometry);
            prop_assert!(window.first_index <= geometry.max_first_index());
            prop_assert!(window.end() <= geometry.data_size());
            let visible = visible_items(&mut geometry, position);
            prop_assert!(visible.is_empty() || window.contains(visible.start));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Threshold idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn positions_inside_the_band_are_idempotent(
        shape in shape(fixed_or_grid()),
        fraction in 0_u32..=1_000,
        probes in prop::collection::vec(0_u32..=1_000, 1..16),
    ) {
        let mut geometry = shape.geometry();
        let mut manager = WindowManager::new(&mut geometry);
        let mut previous = 0.0;
        scroll_through(&mut geometry, &mut manager, &mut previous, fraction);
        let first = manager.first_index();
        let band = manager.threshold();
        let max_scroll = geometry.max_scroll();
        let low = band.min.max(0.0);
        let high = band.max.min(max_scroll);
        prop_assume!(low <= high);
        for probe in probes {
            let position = low + (high - low) * f64::from(probe) / 1_000.0;
            for direction in [ScrollDirection::Forward, ScrollDirection::Backward, ScrollDirection::Still] {
                prop_assert!(!manager.set_primary_scroll_position(&mut geometry, position, direction));
                prop_assert_eq!(manager.first_index(), first);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Slot bijection
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn slots_map_one_to_one(
        shape in shape(fixed_or_grid()),
        fractions in positions(),
    ) {
        let mut geometry = shape.geometry();
        let mut manager = WindowManager::new(&mut geometry);
        let mut recycler = SlotRecycler::new();
        let mut previous = 0.0;
        for fraction in fractions {
            scroll_through(&mut geometry, &mut manager, &mut previous, fraction);
            let window = manager.window(&geometry);
            let out = recycler.recycle(window, &mut geometry);
            prop_assert_eq!(out.placements.len(), window.num_of_items);
            let slots: HashSet<_> = out.placements.iter().map(|p| p.slot).collect();
            prop_assert_eq!(slots.len(), out.placements.len());
            for placement in &out.placements {
                prop_assert_eq!(recycler.slot_of(placement.index), Some(placement.slot));
                prop_assert_eq!(recycler.index_of(placement.slot), Some(placement.index));
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Scroll-to round trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn scrolling_to_an_index_materializes_it(
        shape in shape(fixed_or_grid()),
        targets in prop::collection::vec(any::<prop::sample::Index>(), 1..12),
        stick_to_end in any::<bool>(),
    ) {
        let mut geometry = shape.geometry();
        prop_assume!(geometry.data_size() > 0 && !geometry.is_degenerate());
        let mut manager = WindowManager::new(&mut geometry);
        let mut scroll = ScrollController::new(0, 0.8);
        scroll.set_bounds(geometry.max_scroll(), 0.0);
        let stick_to = if stick_to_end { StickTo::End } else { StickTo::Start };
        for target in targets {
            let index = target.index(geometry.data_size());
            let position = scroll.position_for_index(&mut geometry, index, stick_to);
            prop_assert!(position.is_some());
            let direction = scroll.jump_to(Axis::Primary, position.unwrap_or_default());
            let now = scroll.position(Axis::Primary);
            manager.set_primary_scroll_position(&mut geometry, now, direction);
            prop_assert!(
                manager.window(&geometry).contains(index),
                "index {} not in {:?} at {}",
                index, manager.window(&geometry), now
            );
        }
    }
}
