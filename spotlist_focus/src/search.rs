// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spottable-item search over an [`ItemCatalog`].
//!
//! Searches across lines are tiered: the current page first, then the next
//! page, then the rest of the data. Within a line the item nearest the
//! origin's column wins, lower index first on ties.

use crate::{GridShape, ItemCatalog};

/// How far a search had to look.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SearchTier {
    /// Within one page of the origin.
    Page,
    /// Within the page after that.
    NextPage,
    /// Anywhere further.
    Dataset,
}

/// A spottable item and the tier it was found in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Found {
    /// The spottable index.
    pub index: usize,
    /// Where it was found.
    pub tier: SearchTier,
}

fn tier_for(distance: usize, page_rows: usize) -> SearchTier {
    let page_rows = page_rows.max(1);
    if distance <= page_rows {
        SearchTier::Page
    } else if distance <= page_rows.saturating_mul(2) {
        SearchTier::NextPage
    } else {
        SearchTier::Dataset
    }
}

/// Spottable item on `row` closest to `column`.
#[must_use]
pub fn nearest_in_row(catalog: &ItemCatalog, shape: &GridShape, row: usize, column: usize) -> Option<usize> {
    shape
        .row_range(row)
        .filter(|&index| catalog.is_spottable(index))
        .min_by_key(|&index| (shape.column_of(index).abs_diff(column), index))
}

/// First line past `origin`'s line holding a spottable item, in the given
/// direction, and the item on it nearest `origin`'s column.
#[must_use]
pub fn find_across_lines(
    catalog: &ItemCatalog,
    shape: &GridShape,
    origin: usize,
    forward: bool,
    page_rows: usize,
) -> Option<Found> {
    let row = shape.row_of(origin);
    let column = shape.column_of(origin);
    let rows = shape.row_count();
    let found = if forward {
        (row + 1..rows).find_map(|r| nearest_in_row(catalog, shape, r, column).map(|i| (r - row, i)))
    } else {
        (0..row)
            .rev()
            .find_map(|r| nearest_in_row(catalog, shape, r, column).map(|i| (row - r, i)))
    };
    let (distance, index) = found?;
    let tier = tier_for(distance, page_rows);
    tracing::trace!(origin, index, ?tier, "spottable line found");
    Some(Found { index, tier })
}

/// Next spottable item on `origin`'s own line, in the given direction.
#[must_use]
pub fn find_in_line(catalog: &ItemCatalog, shape: &GridShape, origin: usize, forward: bool) -> Option<usize> {
    let line = shape.row_range(shape.row_of(origin));
    if forward {
        (origin + 1..line.end).find(|&i| catalog.is_spottable(i))
    } else {
        (line.start..origin).rev().find(|&i| catalog.is_spottable(i))
    }
}

/// Spottable item a page of lines away from `origin`.
///
/// The line `page_rows` away is tried first, then lines back toward the
/// origin, then the following page, then the rest of the data.
#[must_use]
pub fn find_page_target(
    catalog: &ItemCatalog,
    shape: &GridShape,
    origin: usize,
    forward: bool,
    page_rows: usize,
) -> Option<Found> {
    let page_rows = page_rows.max(1);
    let row = shape.row_of(origin);
    let column = shape.column_of(origin);
    let last = shape.row_count().checked_sub(1)?;
    let at = |r: usize| nearest_in_row(catalog, shape, r, column);

    let found = if forward {
        if row >= last {
            return None;
        }
        let boundary = row.saturating_add(page_rows).min(last);
        let next_end = boundary.saturating_add(page_rows).min(last);
        (row + 1..=boundary)
            .rev()
            .find_map(|r| at(r).map(|i| (SearchTier::Page, i)))
            .or_else(|| (boundary + 1..=next_end).find_map(|r| at(r).map(|i| (SearchTier::NextPage, i))))
            .or_else(|| (next_end + 1..=last).find_map(|r| at(r).map(|i| (SearchTier::Dataset, i))))
    } else {
        if row == 0 {
            return None;
        }
        let boundary = row.saturating_sub(page_rows);
        let next_start = boundary.saturating_sub(page_rows);
        (boundary..row)
            .find_map(|r| at(r).map(|i| (SearchTier::Page, i)))
            .or_else(|| (next_start..boundary).rev().find_map(|r| at(r).map(|i| (SearchTier::NextPage, i))))
            .or_else(|| (0..next_start).rev().find_map(|r| at(r).map(|i| (SearchTier::Dataset, i))))
    };
    let (tier, index) = found?;
    tracing::debug!(origin, index, ?tier, forward, "page target found");
    Some(Found { index, tier })
}

/// Spottable item at the opposite extreme of the data, in `origin`'s column
/// where possible.
///
/// Forward wraps read from the first line, backward wraps from the last.
/// Returns `None` if only `origin` itself is spottable.
#[must_use]
pub fn wrap_target(catalog: &ItemCatalog, shape: &GridShape, origin: usize, forward: bool) -> Option<usize> {
    let column = shape.column_of(origin);
    let rows = shape.row_count();
    let index = if forward {
        (0..rows).find_map(|r| nearest_in_row(catalog, shape, r, column))
    } else {
        (0..rows).rev().find_map(|r| nearest_in_row(catalog, shape, r, column))
    }?;
    (index != origin).then_some(index)
}
