// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=spotlist_focus --heading-base-level=0

//! Spotlist Focus: 5-way focus navigation over a virtualized list.
//!
//! This crate models directional focus movement over a flat index space laid
//! out in lines, as a combination of:
//!
//! - **Directions and shape** ([`Direction`], [`GridShape`]): how a key maps
//!   onto lines and columns under the list's orientation and text direction.
//! - **An item catalog** ([`ItemCatalog`], [`ItemFlags`]): which items exist and
//!   which are disabled.
//! - **The navigator** ([`get_next_index`], [`Navigator`]): the next spottable
//!   index in a direction, with tiered search past disabled items, optional
//!   wrapping ([`WrapMode`]) and a key-repeat [`Accelerator`].
//! - **Focus restoration** ([`FocusRestoration`]): a small state machine for
//!   targets outside the materialized window. It pauses navigation, asks for
//!   a scroll, shows a placeholder and focuses the real item once it exists.
//! - **Capabilities** ([`FocusSystem`], [`Scheduler`]): the host focus
//!   manager and single-shot timers on a virtual clock, both injected so the
//!   whole protocol runs headless.
//!
//! ## Minimal example
//!
//! Moving down a four-column grid:
//!
//! ```rust
//! use spotlist_focus::{
//!     Advance, AcceleratorConfig, Direction, GridShape, ItemCatalog, Navigator, WrapMode,
//! };
//! use spotlist_window::Orientation;
//!
//! let catalog = ItemCatalog::new(20);
//! let shape = GridShape::new(20, 4, Orientation::Vertical, false);
//! let mut navigator = Navigator::new(WrapMode::Wrap, AcceleratorConfig::default());
//!
//! let Advance::To(next) = navigator.navigate(&catalog, &shape, 5, Direction::Down, false, 3) else {
//!     panic!("row below exists");
//! };
//! assert_eq!(next.next_index, 9);
//!
//! // The last row wraps back to the first, same column.
//! let Advance::To(next) = navigator.navigate(&catalog, &shape, 17, Direction::Down, false, 3) else {
//!     panic!("wrap is enabled");
//! };
//! assert_eq!((next.next_index, next.is_wrapped), (1, true));
//! ```
//!
//! ## Features
//!
//! - `serde`: derives `Serialize`/`Deserialize` for configuration and focus state.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod accelerator;
mod catalog;
mod direction;
mod navigator;
mod restore;
mod scheduler;
pub mod search;
mod system;

pub use accelerator::{Accelerator, AcceleratorConfig, DEFAULT_FREQUENCY, Stride};
pub use catalog::{ItemCatalog, ItemFlags};
pub use direction::{Direction, GridShape, Movement};
pub use navigator::{Advance, Navigator, NextTarget, WrapMode, get_next_index};
pub use restore::{
    FocusRestoration, FocusState, KeyDisposition, RestoreAction, RestoreActions, RestorePhase,
};
pub use scheduler::{Scheduler, TaskToken};
pub use system::{FocusSystem, FocusTarget, HeadlessFocus};
