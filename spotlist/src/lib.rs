// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=spotlist --heading-base-level=0

//! Spotlist: a headless virtualized list with 5-way focus navigation.
//!
//! A list materializes only a window of its items and recycles a fixed pool
//! of slots as the user scrolls. Direction keys move focus between items
//! even when the target is far outside the window: the list pauses the host
//! focus system, scrolls the target in, and focuses it once it exists.
//!
//! [`VirtualListController`] ties together:
//!
//! - geometry, hysteresis windows, slot recycling and scrolling from
//!   [`spotlist_window`];
//! - directional navigation, the focus restoration protocol and the
//!   virtual-time scheduler from [`spotlist_focus`];
//! - configuration ([`ListConfig`]), input-mode tracking ([`InputMode`]) and
//!   persistence of scroll and focus between mounts ([`ListStateStore`]).
//!
//! The host supplies a [`FocusSystem`](spotlist_focus::FocusSystem), reports
//! events (`on_scroll`, `on_direction_key`, `on_data_size_changed`, …) and
//! calls [`advance_time`](VirtualListController::advance_time) from its frame
//! or timer callback. Nothing runs on its own, so the whole list can be
//! driven from a test.
//!
//! ## Minimal example
//!
//! ```rust
//! use spotlist::{ListConfig, NavigationResult, VirtualListController};
//! use spotlist_focus::{Direction, FocusSystem, HeadlessFocus, ItemCatalog};
//! use spotlist_window::{ItemSize, ViewportSize};
//!
//! let config = ListConfig::new(ItemSize::Fixed(30.0));
//! let mut list =
//!     VirtualListController::new(config, ViewportSize::new(200.0, 300.0), 100, HeadlessFocus::new());
//! assert_eq!(list.window().num_of_items, 13);
//!
//! // Items 1 through 40 are disabled, so the next item down is far away.
//! list.set_catalog(ItemCatalog::with_disabled(100, 1..=40));
//! list.focus_on_index(0);
//! assert_eq!(
//!     list.on_direction_key(Direction::Down, false),
//!     NavigationResult::Deferred { index: 41 }
//! );
//! assert!(list.focus_system().is_paused());
//!
//! // Focus lands once the target has settled in the window.
//! list.advance_time(30);
//! assert_eq!(list.focus_system().get_current().map(|t| t.index()), Some(41));
//! assert!(!list.focus_system().is_paused());
//! ```
//!
//! ## Features
//!
//! - `serde`: derives `Serialize`/`Deserialize` for configuration and
//!   persisted state.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod controller;
mod input;
mod persist;

pub use config::{
    ConfigError, DEFAULT_FOCUS_SETTLE_MS, DEFAULT_INPUT_SETTLE_MS, DEFAULT_ITEM_SIZE, ListConfig,
};
pub use controller::{
    NavigationResult, PageOutcome, ScrollOutcome, ViewportHost, VirtualListController,
};
pub use input::{InputMode, ListTask};
pub use persist::{ListStateStore, PersistedListState};
