// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for directional navigation.
//!
//! 1. Navigation never lands on a disabled or missing item.
//! 2. In a list, moving forward lands on the next enabled item, or reports
//!    no target when there is none.
//! 3. With wrap on, forward from the last enabled item reaches the first
//!    enabled item, and backward from the first reaches the last.
//! 4. Moves across lines change the line; moves along a line keep it.

use std::collections::BTreeSet;

use proptest::prelude::*;
use spotlist_focus::{Direction, GridShape, ItemCatalog, Stride, WrapMode, get_next_index};
use spotlist_window::Orientation;

// ── Helpers ─────────────────────────────────────────────────────────────

fn catalog_strategy() -> impl Strategy<Value = (usize, BTreeSet<usize>)> {
    (1_usize..=120)
        .prop_flat_map(|len| prop::collection::vec(prop::bool::weighted(0.4), len))
        .prop_map(|mask| {
            let disabled: BTreeSet<usize> = mask.iter().enumerate().filter(|(_, d)| **d).map(|(i, _)| i).collect();
            (mask.len(), disabled)
        })
}

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

fn wrap_strategy() -> impl Strategy<Value = WrapMode> {
    prop_oneof![Just(WrapMode::Never), Just(WrapMode::Wrap), Just(WrapMode::NoAnimation)]
}

fn list(len: usize) -> GridShape {
    GridShape::new(len, 1, Orientation::Vertical, false)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Targets are always spottable
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn targets_are_spottable(
        (len, disabled) in catalog_strategy(),
        columns in 1_usize..=6,
        origin in any::<prop::sample::Index>(),
        direction in direction_strategy(),
        wrap in wrap_strategy(),
        rtl in any::<bool>(),
        page in any::<bool>(),
    ) {
        let catalog = ItemCatalog::with_disabled(len, disabled.iter().copied());
        let shape = GridShape::new(len, columns, Orientation::Vertical, rtl);
        let origin = origin.index(len);
        let stride = if page { Stride::Page } else { Stride::Step };
        if let Some(next) = get_next_index(&catalog, &shape, origin, direction, stride, wrap, true, 4) {
            prop_assert!(next.next_index < len);
            prop_assert!(!disabled.contains(&next.next_index));
            prop_assert_ne!(next.next_index, origin);
            prop_assert!(!next.is_wrapped || wrap != WrapMode::Never);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Disabled-skip in a list
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn forward_lands_on_the_next_enabled_item(
        (len, disabled) in catalog_strategy(),
        origin in any::<prop::sample::Index>(),
    ) {
        let catalog = ItemCatalog::with_disabled(len, disabled.iter().copied());
        let origin = origin.index(len);
        let expected = (origin + 1..len).find(|i| !disabled.contains(i));
        let next = get_next_index(&catalog, &list(len), origin, Direction::Down, Stride::Step, WrapMode::Never, true, 5)
            .map(|next| next.next_index);
        prop_assert_eq!(next, expected);

        let expected_back = (0..origin).rev().find(|i| !disabled.contains(i));
        let back = get_next_index(&catalog, &list(len), origin, Direction::Up, Stride::Step, WrapMode::Never, true, 5)
            .map(|next| next.next_index);
        prop_assert_eq!(back, expected_back);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Wrap correctness
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn wrapping_connects_the_enabled_extremes((len, disabled) in catalog_strategy()) {
        let enabled: Vec<usize> = (0..len).filter(|i| !disabled.contains(i)).collect();
        prop_assume!(enabled.len() >= 2);
        let (first, last) = (enabled[0], enabled[enabled.len() - 1]);
        let catalog = ItemCatalog::with_disabled(len, disabled.iter().copied());
        let shape = list(len);

        let forward = get_next_index(&catalog, &shape, last, Direction::Down, Stride::Step, WrapMode::Wrap, true, 5);
        prop_assert_eq!(forward.map(|n| (n.next_index, n.is_wrapped)), Some((first, true)));

        let backward = get_next_index(&catalog, &shape, first, Direction::Up, Stride::Step, WrapMode::Wrap, true, 5);
        prop_assert_eq!(backward.map(|n| (n.next_index, n.is_wrapped)), Some((last, true)));

        // Held keys stop at the edge instead.
        let held = get_next_index(&catalog, &shape, last, Direction::Down, Stride::Step, WrapMode::Wrap, false, 5);
        prop_assert_eq!(held, None);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Line discipline in grids
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn grid_moves_respect_lines(
        (len, disabled) in catalog_strategy(),
        columns in 2_usize..=6,
        origin in any::<prop::sample::Index>(),
    ) {
        let catalog = ItemCatalog::with_disabled(len, disabled.iter().copied());
        let shape = GridShape::new(len, columns, Orientation::Vertical, false);
        let origin = origin.index(len);
        let row = shape.row_of(origin);

        if let Some(next) = get_next_index(&catalog, &shape, origin, Direction::Down, Stride::Step, WrapMode::Never, true, 3) {
            prop_assert!(shape.row_of(next.next_index) > row);
        }
        if let Some(next) = get_next_index(&catalog, &shape, origin, Direction::Up, Stride::Step, WrapMode::Never, true, 3) {
            prop_assert!(shape.row_of(next.next_index) < row);
        }
        for direction in [Direction::Left, Direction::Right] {
            if let Some(next) = get_next_index(&catalog, &shape, origin, direction, Stride::Step, WrapMode::Wrap, true, 3) {
                prop_assert_eq!(shape.row_of(next.next_index), row);
                prop_assert!(!next.is_wrapped);
            }
        }
    }
}
