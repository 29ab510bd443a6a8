// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slot recycler: reusable rendering slots for the materialized window.
//!
//! The pool holds [`Geometry::num_of_items`] slots. Index `i` always lives in
//! slot `i % capacity`, so a window that shifts by one line hands only that
//! line's slots to new indices while every other slot keeps its item.

use alloc::vec::Vec;

use kurbo::Rect;
use smallvec::SmallVec;

use crate::{ExtentModel, Geometry, Orientation, Window};

/// Identifier of a rendering slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub usize);

/// Where one materialized item is drawn.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    /// Slot rendering the item.
    pub slot: SlotId,
    /// Data index.
    pub index: usize,
    /// Primary-axis line of the item.
    pub line: usize,
    /// Position inside its line.
    pub column: usize,
    /// Start along the primary axis, in content coordinates.
    pub offset_primary: f64,
    /// Start along the secondary axis, in content coordinates.
    pub offset_secondary: f64,
    /// Extent along the primary axis.
    pub size_primary: f64,
    /// Extent along the secondary axis.
    pub size_secondary: f64,
}

impl Placement {
    /// The item's rectangle in content coordinates.
    ///
    /// With `rtl`, the horizontal axis is mirrored inside `content_width`.
    #[must_use]
    pub fn rect(&self, orientation: Orientation, rtl: bool, content_width: f64) -> Rect {
        let (x, y, width, height) = match orientation {
            Orientation::Vertical => (
                self.offset_secondary,
                self.offset_primary,
                self.size_secondary,
                self.size_primary,
            ),
            Orientation::Horizontal => (
                self.offset_primary,
                self.offset_secondary,
                self.size_primary,
                self.size_secondary,
            ),
        };
        let x = if rtl { content_width - x - width } else { x };
        Rect::new(x, y, x + width, y + height)
    }
}

/// Slot changes produced by one [`SlotRecycler::recycle`] call.
#[derive(Clone, Debug, Default)]
pub struct Recycled {
    /// One placement per materialized index, in increasing index order.
    pub placements: Vec<Placement>,
    /// Slots that now show a different index than before.
    pub reassigned: SmallVec<[SlotId; 8]>,
    /// Slots left without an index.
    pub released: SmallVec<[SlotId; 8]>,
}

/// Assignment of data indices to slots.
#[derive(Clone, Debug, Default)]
pub struct SlotRecycler {
    assigned: Vec<Option<usize>>,
}

impl SlotRecycler {
    /// An empty recycler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots in the pool.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.assigned.len()
    }

    /// Slot currently showing `index`.
    #[must_use]
    pub fn slot_of(&self, index: usize) -> Option<SlotId> {
        let capacity = self.assigned.len();
        if capacity == 0 {
            return None;
        }
        let slot = index % capacity;
        (self.assigned[slot] == Some(index)).then_some(SlotId(slot))
    }

    /// Index shown by `slot`.
    #[must_use]
    pub fn index_of(&self, slot: SlotId) -> Option<usize> {
        self.assigned.get(slot.0).copied().flatten()
    }

    /// Assigns the indices of `window` to slots and lays them out.
    ///
    /// A change of pool capacity reassigns every slot.
    pub fn recycle(&mut self, window: Window, geometry: &mut Geometry) -> Recycled {
        let capacity = geometry.num_of_items();
        let mut out = Recycled::default();
        if capacity != self.assigned.len() {
            for (slot, index) in self.assigned.iter().enumerate() {
                if index.is_some() && slot >= capacity {
                    out.released.push(SlotId(slot));
                }
            }
            self.assigned.clear();
            self.assigned.resize(capacity, None);
        }
        if capacity == 0 {
            return out;
        }

        let mut used = SmallVec::<[bool; 32]>::from_elem(false, capacity);
        out.placements.reserve(window.num_of_items);
        for index in window.indices() {
            let slot = index % capacity;
            used[slot] = true;
            if self.assigned[slot] != Some(index) {
                self.assigned[slot] = Some(index);
                out.reassigned.push(SlotId(slot));
            }
            let (offset_primary, offset_secondary) = geometry.item_offset(index);
            let (size_primary, size_secondary) = geometry.item_extent(index);
            out.placements.push(Placement {
                slot: SlotId(slot),
                index,
                line: geometry.line_of(index),
                column: geometry.column_of(index),
                offset_primary,
                offset_secondary,
                size_primary,
                size_secondary,
            });
        }
        for (slot, assigned) in self.assigned.iter_mut().enumerate() {
            if !used[slot] && assigned.take().is_some() {
                out.released.push(SlotId(slot));
            }
        }

        if !out.reassigned.is_empty() || !out.released.is_empty() {
            tracing::debug!(
                first = window.first_index,
                count = window.num_of_items,
                reassigned = out.reassigned.len(),
                released = out.released.len(),
                "slots recycled"
            );
        }
        out
    }
}

/// Which side of the viewport a fragment lies on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    /// Clipped off by the viewport's start edge.
    Before,
    /// Inside the viewport.
    InView,
    /// Clipped off by the viewport's end edge.
    After,
}

/// Part of an item along the primary axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Fragment {
    /// Position of the fragment among the item's fragments, starting at zero.
    pub partition: u8,
    /// Side of the viewport.
    pub kind: FragmentKind,
    /// Start along the primary axis, in content coordinates.
    pub start: f64,
    /// Extent along the primary axis.
    pub extent: f64,
}

/// Splits `placement` at the edges of the viewport `[position, position + client_size)`.
///
/// Items that straddle an edge come back as two or three fragments numbered
/// in primary-axis order; all others come back whole.
#[must_use]
pub fn split_at_viewport(
    placement: &Placement,
    position: f64,
    client_size: f64,
) -> SmallVec<[Fragment; 3]> {
    let start = placement.offset_primary;
    let end = start + placement.size_primary;
    let view_end = position + client_size.max(0.0);
    let mut cuts = SmallVec::<[(FragmentKind, f64, f64); 3]>::new();

    if start < position {
        cuts.push((FragmentKind::Before, start, end.min(position)));
    }
    let inner_start = start.max(position);
    let inner_end = end.min(view_end);
    if inner_end > inner_start {
        cuts.push((FragmentKind::InView, inner_start, inner_end));
    }
    if end > view_end {
        cuts.push((FragmentKind::After, start.max(view_end), end));
    }
    if cuts.is_empty() {
        cuts.push((FragmentKind::InView, start, end));
    }

    cuts.into_iter()
        .zip(0_u8..)
        .map(|((kind, from, to), partition)| Fragment {
            partition,
            kind,
            start: from,
            extent: to - from,
        })
        .collect()
}

/// Item-rendering collaborator.
pub trait ItemRenderer {
    /// Host-side handle to a rendered item.
    type Handle;

    /// Renders `index` into `slot`, replacing whatever the slot showed.
    fn render_item(&mut self, index: usize, slot: SlotId) -> Self::Handle;
}

/// Host handles kept per slot.
#[derive(Clone, Debug)]
pub struct SlotPool<H> {
    handles: Vec<Option<(usize, H)>>,
}

impl<H> Default for SlotPool<H> {
    fn default() -> Self {
        Self {
            handles: Vec::new(),
        }
    }
}

impl<H> SlotPool<H> {
    /// An empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle held by `slot` and the index it renders.
    #[must_use]
    pub fn get(&self, slot: SlotId) -> Option<(usize, &H)> {
        self.handles
            .get(slot.0)?
            .as_ref()
            .map(|(index, handle)| (*index, handle))
    }

    /// Handle rendering `index`, if any slot holds one.
    #[must_use]
    pub fn handle_for_index(&self, index: usize) -> Option<&H> {
        self.handles
            .iter()
            .flatten()
            .find_map(|(i, handle)| (*i == index).then_some(handle))
    }

    /// Calls `renderer` for every placement whose slot does not already
    /// render its index, and drops handles of slots absent from `placements`.
    ///
    /// Returns how many items were rendered.
    pub fn sync<R>(&mut self, placements: &[Placement], capacity: usize, renderer: &mut R) -> usize
    where
        R: ItemRenderer<Handle = H>,
    {
        self.handles.truncate(capacity);
        self.handles.resize_with(capacity, || None);
        let mut live = SmallVec::<[bool; 32]>::from_elem(false, capacity);
        let mut rendered = 0;
        for placement in placements {
            let Some(entry) = self.handles.get_mut(placement.slot.0) else {
                continue;
            };
            live[placement.slot.0] = true;
            if entry.as_ref().is_some_and(|(index, _)| *index == placement.index) {
                continue;
            }
            *entry = Some((
                placement.index,
                renderer.render_item(placement.index, placement.slot),
            ));
            rendered += 1;
        }
        for (entry, live) in self.handles.iter_mut().zip(live) {
            if !live {
                *entry = None;
            }
        }
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GeometryConfig, ItemSize, ViewportSize, calculate};
    use alloc::vec;

    fn window(first_index: usize, num_of_items: usize) -> Window {
        Window {
            first_index,
            num_of_items,
        }
    }

    #[test]
    fn one_line_shift_reassigns_one_slot() {
        let mut geometry = calculate(
            &GeometryConfig::new(ItemSize::Fixed(30.0)),
            ViewportSize::new(200.0, 300.0),
            100,
        );
        let mut recycler = SlotRecycler::new();
        let first = recycler.recycle(window(0, 13), &mut geometry);
        assert_eq!(first.reassigned.len(), 13);
        assert_eq!(first.placements[4].offset_primary, 120.0);

        let shifted = recycler.recycle(window(1, 13), &mut geometry);
        assert_eq!(shifted.reassigned.as_slice(), &[SlotId(0)]);
        assert_eq!(recycler.slot_of(13), Some(SlotId(0)));
        assert_eq!(recycler.slot_of(0), None);
        assert_eq!(recycler.slot_of(5), Some(SlotId(5)));
        assert_eq!(recycler.index_of(SlotId(0)), Some(13));
        let indices: Vec<_> = shifted.placements.iter().map(|p| p.index).collect();
        assert_eq!(indices, (1..14).collect::<Vec<_>>());
    }

    #[test]
    fn shorter_windows_release_slots() {
        let mut geometry = calculate(
            &GeometryConfig::new(ItemSize::Fixed(30.0)),
            ViewportSize::new(200.0, 300.0),
            100,
        );
        let mut recycler = SlotRecycler::new();
        recycler.recycle(window(0, 13), &mut geometry);
        let shrunk = recycler.recycle(window(0, 10), &mut geometry);
        assert!(shrunk.reassigned.is_empty());
        assert_eq!(shrunk.released.as_slice(), &[SlotId(10), SlotId(11), SlotId(12)]);
        assert!(recycler.recycle(Window::empty(), &mut geometry).placements.is_empty());
    }

    #[test]
    fn grid_placements_carry_columns() {
        let mut config = GeometryConfig::new(ItemSize::Grid {
            min_width: 90.0,
            min_height: 60.0,
        });
        config.spacing = 10.0;
        let mut geometry = calculate(&config, ViewportSize::new(400.0, 300.0), 20);
        let mut recycler = SlotRecycler::new();
        let out = recycler.recycle(window(0, 20), &mut geometry);
        let item = out.placements[6];
        assert_eq!((item.line, item.column), (1, 2));
        assert_eq!((item.offset_primary, item.offset_secondary), (71.0, 204.0));
        assert_eq!(
            item.rect(Orientation::Vertical, false, 400.0),
            Rect::new(204.0, 71.0, 296.0, 132.0)
        );
        assert_eq!(
            item.rect(Orientation::Vertical, true, 400.0),
            Rect::new(104.0, 71.0, 196.0, 132.0)
        );
    }

    fn placement(offset_primary: f64, size_primary: f64) -> Placement {
        Placement {
            slot: SlotId(0),
            index: 0,
            line: 0,
            column: 0,
            offset_primary,
            offset_secondary: 0.0,
            size_primary,
            size_secondary: 10.0,
        }
    }

    #[test]
    fn items_larger_than_the_viewport_split_in_three() {
        let fragments = split_at_viewport(&placement(0.0, 500.0), 100.0, 200.0);
        let kinds: Vec<_> = fragments.iter().map(|f| (f.partition, f.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                (0, FragmentKind::Before),
                (1, FragmentKind::InView),
                (2, FragmentKind::After)
            ]
        );
        assert_eq!(fragments[1].start, 100.0);
        assert_eq!(fragments[1].extent, 200.0);
        assert_eq!(fragments[2].extent, 200.0);
    }

    #[test]
    fn contained_and_outside_items_stay_whole() {
        let inside = split_at_viewport(&placement(120.0, 30.0), 100.0, 200.0);
        assert_eq!(inside.len(), 1);
        assert_eq!(inside[0].kind, FragmentKind::InView);

        let above = split_at_viewport(&placement(0.0, 30.0), 100.0, 200.0);
        assert_eq!(above.len(), 1);
        assert_eq!(above[0].kind, FragmentKind::Before);

        let straddling = split_at_viewport(&placement(280.0, 40.0), 100.0, 200.0);
        assert_eq!(straddling.len(), 2);
        assert_eq!(straddling[1].kind, FragmentKind::After);
        assert_eq!(straddling[1].start, 300.0);
    }

    struct Recorder(Vec<(usize, SlotId)>);

    impl ItemRenderer for Recorder {
        type Handle = usize;

        fn render_item(&mut self, index: usize, slot: SlotId) -> usize {
            self.0.push((index, slot));
            index * 10
        }
    }

    #[test]
    fn pool_renders_only_changed_slots() {
        let mut geometry = calculate(
            &GeometryConfig::new(ItemSize::Fixed(30.0)),
            ViewportSize::new(200.0, 300.0),
            100,
        );
        let mut recycler = SlotRecycler::new();
        let mut pool = SlotPool::new();
        let mut renderer = Recorder(Vec::new());

        let out = recycler.recycle(window(0, 13), &mut geometry);
        assert_eq!(pool.sync(&out.placements, recycler.capacity(), &mut renderer), 13);

        let out = recycler.recycle(window(2, 13), &mut geometry);
        renderer.0.clear();
        assert_eq!(pool.sync(&out.placements, recycler.capacity(), &mut renderer), 2);
        assert_eq!(renderer.0, vec![(13, SlotId(0)), (14, SlotId(1))]);
        assert_eq!(pool.get(SlotId(1)), Some((14, &140)));
        assert_eq!(pool.handle_for_index(7), Some(&70));
        assert_eq!(pool.handle_for_index(0), None);
    }
}
