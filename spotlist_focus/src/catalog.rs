// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Item catalog: the data size plus per-item focus flags.

use alloc::vec::Vec;

use bitflags::bitflags;

bitflags! {
    /// Per-item focus flags.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ItemFlags: u8 {
        /// The item can never receive focus.
        const DISABLED = 1 << 0;
    }
}

/// Ordered items `0..len` with optional flags.
///
/// Flags are stored densely only up to the highest flagged index; everything
/// past that is spottable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemCatalog {
    len: usize,
    flags: Vec<ItemFlags>,
}

impl ItemCatalog {
    /// A catalog of `len` enabled items.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            len,
            flags: Vec::new(),
        }
    }

    /// A catalog of `len` items with `disabled` ones flagged.
    ///
    /// Indices at or past `len` are ignored.
    #[must_use]
    pub fn with_disabled<I>(len: usize, disabled: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut catalog = Self::new(len);
        for index in disabled {
            catalog.set_flags(index, ItemFlags::DISABLED);
        }
        catalog
    }

    /// Number of items.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if there are no items.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Changes the number of items, dropping flags past the end.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.flags.truncate(len);
    }

    /// Replaces the flags of `index`. Out-of-range indices are ignored.
    pub fn set_flags(&mut self, index: usize, flags: ItemFlags) {
        if index >= self.len {
            return;
        }
        if index >= self.flags.len() {
            if flags.is_empty() {
                return;
            }
            self.flags.resize(index + 1, ItemFlags::empty());
        }
        self.flags[index] = flags;
    }

    /// Flags of `index`; empty for unflagged and out-of-range indices.
    #[must_use]
    pub fn flags(&self, index: usize) -> ItemFlags {
        self.flags.get(index).copied().unwrap_or_default()
    }

    /// Returns `true` if `index` exists and is disabled.
    #[must_use]
    pub fn is_disabled(&self, index: usize) -> bool {
        self.flags(index).contains(ItemFlags::DISABLED)
    }

    /// Returns `true` if `index` exists and may receive focus.
    #[must_use]
    pub fn is_spottable(&self, index: usize) -> bool {
        index < self.len && !self.is_disabled(index)
    }

    /// Number of disabled items.
    #[must_use]
    pub fn disabled_count(&self) -> usize {
        self.flags
            .iter()
            .filter(|flags| flags.contains(ItemFlags::DISABLED))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::{ItemCatalog, ItemFlags};

    #[test]
    fn disabled_items_are_not_spottable() {
        let catalog = ItemCatalog::with_disabled(10, [2, 3, 40]);
        assert!(catalog.is_spottable(1));
        assert!(!catalog.is_spottable(2));
        assert!(catalog.is_disabled(3));
        assert!(!catalog.is_spottable(10));
        assert_eq!(catalog.disabled_count(), 2);
        assert_eq!(catalog.flags(9), ItemFlags::empty());
    }

    #[test]
    fn shrinking_drops_flags() {
        let mut catalog = ItemCatalog::with_disabled(10, [8]);
        catalog.set_len(5);
        assert_eq!(catalog.disabled_count(), 0);
        catalog.set_len(10);
        assert!(catalog.is_spottable(8));
        catalog.set_flags(8, ItemFlags::DISABLED);
        catalog.set_flags(8, ItemFlags::empty());
        assert!(catalog.is_spottable(8));
    }
}
