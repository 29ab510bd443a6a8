// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-line secondary windows.
//!
//! When the items of a line have individual secondary extents (a vertical
//! list of horizontally scrolling rows, say), each materialized line gets its
//! own [`VisibleStrip`] along the secondary axis. Strips are cached and only
//! recomputed for lines that were newly materialized, whose extents changed,
//! or whose cached strip no longer covers the secondary viewport.

use alloc::vec::Vec;
use core::ops::Range;

use crate::{ExtentModel, PrefixSumExtentModel, VisibleStrip, compute_visible_strip};

#[derive(Clone, Debug)]
struct LineEntry {
    items: PrefixSumExtentModel<f64>,
    strip: Option<VisibleStrip<f64>>,
}

/// Cache of secondary-axis windows, one per primary line.
#[derive(Clone, Debug, Default)]
pub struct SecondaryLines {
    lines: Vec<Option<LineEntry>>,
    client_size: f64,
    overhang: usize,
}

impl SecondaryLines {
    /// An empty cache materializing `overhang` items on each side of the
    /// secondary viewport.
    #[must_use]
    pub fn new(overhang: usize) -> Self {
        Self {
            lines: Vec::new(),
            client_size: 0.0,
            overhang,
        }
    }

    /// Number of lines the cache tracks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if no line is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Tracks exactly `lines` primary lines, dropping entries past the end.
    pub fn set_line_count(&mut self, lines: usize) {
        self.lines.resize(lines, None);
    }

    /// Records the secondary extents of the items on `line`.
    ///
    /// Lines past [`len`](Self::len) are ignored; non-finite extents count
    /// as zero.
    pub fn set_line_extents(&mut self, line: usize, extents: &[f64], spacing: f64) {
        let Some(entry) = self.lines.get_mut(line) else {
            return;
        };
        let extents: Vec<f64> = extents
            .iter()
            .map(|&extent| if extent.is_finite() { extent } else { 0.0 })
            .collect();
        let spacing = if spacing.is_finite() { spacing } else { 0.0 };
        *entry = Some(LineEntry {
            items: PrefixSumExtentModel::from_extents(&extents, spacing),
            strip: None,
        });
    }

    /// Forgets the extents of `line`.
    pub fn clear_line(&mut self, line: usize) {
        if let Some(entry) = self.lines.get_mut(line) {
            *entry = None;
        }
    }

    /// Updates the secondary viewport extent. Cached strips are kept and
    /// re-validated on the next [`update`](Self::update).
    pub fn set_client_size(&mut self, client_size: f64) {
        self.client_size = if client_size.is_finite() {
            client_size.max(0.0)
        } else {
            0.0
        };
    }

    /// Brings the strips of `lines` up to date for secondary scroll `position`.
    ///
    /// Returns the number of lines whose strip was recomputed.
    pub fn update(&mut self, lines: Range<usize>, position: f64) -> usize {
        let client = self.client_size;
        let overhang = self.overhang;
        let end = lines.end.min(self.lines.len());
        let mut recomputed = 0;
        for slot in &mut self.lines[lines.start.min(end)..end] {
            let Some(entry) = slot.as_mut() else {
                continue;
            };
            if entry.items.is_empty() {
                continue;
            }
            let content = entry.items.total_extent();
            let from = position.max(0.0).min(content);
            let to = (position + client).min(content);
            let fresh = entry.strip.is_some_and(|strip| strip.covers(from, to));
            if !fresh {
                entry.strip = Some(compute_visible_strip(
                    &mut entry.items,
                    position,
                    client,
                    overhang,
                    overhang,
                ));
                recomputed += 1;
            }
        }
        if recomputed > 0 {
            tracing::trace!(recomputed, position, "secondary line windows updated");
        }
        recomputed
    }

    /// The cached strip of `line`, if it has been computed.
    #[must_use]
    pub fn strip(&self, line: usize) -> Option<&VisibleStrip<f64>> {
        self.lines.get(line)?.as_ref()?.strip.as_ref()
    }

    /// Secondary offset and extent of item `column` on `line`.
    pub fn item_span(&mut self, line: usize, column: usize) -> Option<(f64, f64)> {
        let entry = self.lines.get_mut(line)?.as_mut()?;
        if column >= entry.items.len() {
            return None;
        }
        Some((entry.items.offset_of(column), entry.items.extent_of(column)))
    }

    /// Widest line content among tracked lines.
    pub fn max_content_extent(&mut self) -> Option<f64> {
        self.lines
            .iter_mut()
            .flatten()
            .map(|entry| entry.items.total_extent())
            .fold(None, |acc: Option<f64>, extent| {
                Some(acc.map_or(extent, |a| a.max(extent)))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::SecondaryLines;

    fn ten_wide() -> SecondaryLines {
        let mut lines = SecondaryLines::new(1);
        lines.set_line_count(3);
        lines.set_client_size(120.0);
        lines.set_line_extents(0, &[50.0; 10], 0.0);
        lines.set_line_extents(2, &[30.0; 4], 0.0);
        lines
    }

    #[test]
    fn strips_are_computed_on_first_update() {
        let mut lines = ten_wide();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines.update(0..3, 0.0), 2);
        let strip = lines.strip(0).unwrap();
        // Items at 0, 50 and 100 are visible, plus one after.
        assert_eq!((strip.start, strip.end), (0, 4));
        assert!(lines.strip(1).is_none());
        let short = lines.strip(2).unwrap();
        assert_eq!((short.start, short.end), (0, 4));
    }

    #[test]
    fn lines_past_the_count_are_not_tracked() {
        let mut lines = ten_wide();
        lines.set_line_extents(3, &[50.0; 10], 0.0);
        lines.set_line_extents(usize::MAX, &[50.0], 0.0);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines.item_span(3, 0), None);

        lines.set_line_extents(1, &[f64::NAN, 40.0], 0.0);
        assert_eq!(lines.item_span(1, 0), Some((0.0, 0.0)));
        assert_eq!(lines.item_span(1, 1), Some((0.0, 40.0)));
    }

    #[test]
    fn covered_positions_reuse_the_cached_strip() {
        let mut lines = ten_wide();
        lines.update(0..3, 0.0);
        assert_eq!(lines.update(0..3, 30.0), 0);

        // 100..220 runs past item 3, which ends at 200.
        assert_eq!(lines.update(0..3, 100.0), 1);
        let strip = lines.strip(0).unwrap();
        assert_eq!((strip.start, strip.end), (1, 6));
    }

    #[test]
    fn changed_extents_invalidate_one_line() {
        let mut lines = ten_wide();
        lines.update(0..3, 0.0);
        lines.set_line_extents(2, &[80.0; 4], 0.0);
        assert_eq!(lines.update(0..3, 0.0), 1);
        assert_eq!(lines.item_span(2, 1), Some((80.0, 80.0)));
        assert_eq!(lines.item_span(2, 9), None);
        assert_eq!(lines.max_content_extent(), Some(500.0));
    }

    #[test]
    fn lines_outside_the_range_are_left_alone() {
        let mut lines = ten_wide();
        assert_eq!(lines.update(1..3, 0.0), 1);
        assert!(lines.strip(0).is_none());
        lines.set_line_count(1);
        assert_eq!(lines.update(0..5, 0.0), 1);
        lines.clear_line(0);
        assert!(lines.strip(0).is_none());
    }
}
