// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A headless grid driven entirely from virtual time.
//!
//! This example shows how a host wires up a list:
//! - `spotlist_window` slots are rendered through an `ItemRenderer` and a `SlotPool`,
//! - `spotlist_focus` focus goes through `HeadlessFocus`, standing in for a UI toolkit,
//! - `spotlist::VirtualListController` receives keys, wheel deltas and clock ticks.
//!
//! Run:
//! - `cargo run -p spotlist_demos --example headless_grid`

use kurbo::Rect;
use spotlist::{ListConfig, NavigationResult, VirtualListController};
use spotlist_focus::{Direction, FocusSystem, FocusTarget, HeadlessFocus, ItemCatalog, WrapMode};
use spotlist_window::{Axis, ItemRenderer, ItemSize, SlotId, SlotPool, ViewportSize};
use tracing_subscriber::filter::LevelFilter;

/// Renders items as labels and counts how often it was asked to.
#[derive(Default)]
struct LabelRenderer {
    renders: usize,
}

impl ItemRenderer for LabelRenderer {
    type Handle = String;

    fn render_item(&mut self, index: usize, slot: SlotId) -> String {
        self.renders += 1;
        format!("item {index} @ slot {}", slot.0)
    }
}

fn describe(list: &VirtualListController<HeadlessFocus>) -> String {
    match list.focus_system().get_current() {
        Some(FocusTarget::Item { index, slot }) => format!("item {index} in slot {}", slot.0),
        Some(FocusTarget::Placeholder { index }) => format!("placeholder for {index}"),
        None => "nothing".to_owned(),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .with_target(false)
        .init();

    // A 4-column photo grid: 400x300 viewport, cells at least 100x100.
    let config = ListConfig::new(ItemSize::Grid {
        min_width: 100.0,
        min_height: 100.0,
    })
    .with_wrap(WrapMode::Wrap)
    .with_scroll_animation_ms(120)
    .with_animate_focus_scroll(true)
    .with_list_id("photos");
    let mut list =
        VirtualListController::new(config, ViewportSize::new(400.0, 300.0), 200, HeadlessFocus::new());

    // Rows 2 through 20 are still loading and cannot take focus.
    list.set_catalog(ItemCatalog::with_disabled(200, 8..84));

    let mut pool = SlotPool::new();
    let mut renderer = LabelRenderer::default();
    let rendered = list.realize(&mut pool, &mut renderer);
    let window = list.window();
    println!(
        "materialized {}..{} ({rendered} rendered)",
        window.first_index,
        window.end()
    );

    // The first key focuses the first visible item.
    list.on_direction_key(Direction::Down, false);
    println!("focus: {}", describe(&list));

    // Two rows down crosses the loading rows; the list scrolls first.
    list.on_direction_key(Direction::Down, false);
    match list.on_direction_key(Direction::Down, false) {
        NavigationResult::Deferred { index } => println!("deferred focus to {index}"),
        other => println!("key: {other:?}"),
    }

    // Drive a 60 Hz clock until focus lands.
    let mut now = 0;
    while list.focus_system().is_paused() || list.is_animating() {
        now += 16;
        list.advance_time(now);
    }
    println!(
        "focus: {} at t={now}ms, scrolled to {}",
        describe(&list),
        list.scroll_position(Axis::Primary)
    );

    // Only slots whose items changed are rendered again.
    let rendered = list.realize(&mut pool, &mut renderer);
    println!("{rendered} rendered after the jump, {} in total", renderer.renders);

    let content_width = list.scroll_bounds().scroll_width;
    let orientation = list.config().orientation;
    let rtl = list.config().rtl;
    let index = list
        .focus_system()
        .get_current()
        .map(|target| target.index())
        .unwrap_or_default();
    if let Some(placement) = list.placements().iter().find(|p| p.index == index) {
        let rect: Rect = placement.rect(orientation, rtl, content_width);
        println!("focused cell at {rect:?}");
        if let Some(label) = pool.handle_for_index(index) {
            println!("rendered as {label:?}");
        }
    }

    // Wheel deltas compound into one target; focus falls back to a placeholder.
    list.on_scroll(250.0, Axis::Primary);
    list.on_scroll(250.0, Axis::Primary);
    println!("wheel target {}", list.scroll_target(Axis::Primary));
    while list.is_animating() {
        now += 16;
        list.advance_time(now);
    }
    println!("focus after scrolling away: {}", describe(&list));
}
