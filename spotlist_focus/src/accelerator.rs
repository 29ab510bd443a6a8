// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key-repeat accelerator.
//!
//! While a direction key is held, repeats are throttled by a frequency table:
//! stage `k` lets one repeat through out of every `frequency[k]`. Once the
//! table is exhausted the accelerator asks for whole-page jumps. A fresh
//! press, a key-up or a change of direction starts over.

use alloc::vec::Vec;

use crate::Direction;

/// Repeats to swallow per stage before the default warm-up ends.
pub const DEFAULT_FREQUENCY: [u32; 7] = [3, 3, 3, 2, 2, 2, 1];

/// What to do with one key event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Stride {
    /// Move by one line or column.
    Step,
    /// Move by a page of lines.
    Page,
    /// Swallow the event.
    Skip,
}

/// Accelerator tuning.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcceleratorConfig {
    /// Warm-up stages; an empty table disables throttling.
    pub frequency: Vec<u32>,
    /// Whether repeats past the warm-up jump a page at a time.
    pub page_jump: bool,
}

impl Default for AcceleratorConfig {
    fn default() -> Self {
        Self {
            frequency: DEFAULT_FREQUENCY.to_vec(),
            page_jump: true,
        }
    }
}

/// Key-repeat state for one list.
#[derive(Clone, Debug, Default)]
pub struct Accelerator {
    config: AcceleratorConfig,
    direction: Option<Direction>,
    stage: usize,
    skipped: u32,
}

impl Accelerator {
    /// An idle accelerator.
    #[must_use]
    pub fn new(config: AcceleratorConfig) -> Self {
        Self {
            config,
            direction: None,
            stage: 0,
            skipped: 0,
        }
    }

    /// Decides how far a key event should move.
    pub fn on_key(&mut self, direction: Direction, repeat: bool) -> Stride {
        if !repeat || self.direction != Some(direction) {
            self.reset();
            self.direction = Some(direction);
            return Stride::Step;
        }
        let Some(&every) = self.config.frequency.get(self.stage) else {
            return if self.config.page_jump {
                Stride::Page
            } else {
                Stride::Step
            };
        };
        self.skipped += 1;
        if self.skipped < every {
            return Stride::Skip;
        }
        self.skipped = 0;
        self.stage += 1;
        if self.stage == self.config.frequency.len() {
            tracing::debug!(?direction, "accelerator warmed up");
        }
        Stride::Step
    }

    /// Forgets the held key.
    pub fn reset(&mut self) {
        self.direction = None;
        self.stage = 0;
        self.skipped = 0;
    }

    /// Direction of the held key, if any.
    #[must_use]
    pub const fn direction(&self) -> Option<Direction> {
        self.direction
    }
}
