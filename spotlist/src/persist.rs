// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Remembering where a list was between mounts.

use alloc::string::String;

use hashbrown::HashMap;

/// Scroll and focus of one list.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PersistedListState {
    /// Index that last had focus.
    pub last_focused_index: Option<usize>,
    /// Primary scroll position.
    pub scroll_position: f64,
}

/// Persisted states keyed by list id.
///
/// The store does not validate what it holds; restoring clamps against the
/// data the list has at that point.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListStateStore {
    states: HashMap<String, PersistedListState>,
}

impl ListStateStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `state` under `list_id`, replacing what was there.
    pub fn save(&mut self, list_id: &str, state: PersistedListState) {
        if let Some(slot) = self.states.get_mut(list_id) {
            *slot = state;
        } else {
            self.states.insert(String::from(list_id), state);
        }
    }

    /// State saved under `list_id`.
    #[must_use]
    pub fn get(&self, list_id: &str) -> Option<&PersistedListState> {
        self.states.get(list_id)
    }

    /// Removes and returns the state saved under `list_id`.
    pub fn take(&mut self, list_id: &str) -> Option<PersistedListState> {
        self.states.remove(list_id)
    }

    /// Number of lists with saved state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns `true` if nothing is saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
