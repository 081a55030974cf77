use alloc::vec;
use alloc::vec::Vec;

use crate::LayoutDirection;

const MIN_SIZE: usize = 10;

/// Records where a full-span item opened a gap in some spans.
///
/// `gap_per_span[i]` is the distance between span `i`'s boundary and the full-span item's edge
/// at the time it was first laid out. `gap_dir` is the side of the item the gap sits on.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FullSpanItem {
    pub position: usize,
    pub gap_dir: LayoutDirection,
    pub gap_per_span: Vec<i32>,
    /// Set when the item was re-laid out while the spans around it were uneven.
    pub has_unwanted_gap_after: bool,
}

impl FullSpanItem {
    pub fn gap_for_span(&self, span: usize) -> i32 {
        self.gap_per_span.get(span).copied().unwrap_or(0)
    }
}

/// Sparse position -> span table plus the full-span markers, ordered by position.
#[derive(Clone, Debug, Default)]
pub(crate) struct SpanLookup {
    data: Vec<Option<usize>>,
    full_span_items: Vec<FullSpanItem>,
}

impl SpanLookup {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn span(&self, position: usize) -> Option<usize> {
        self.data.get(position).copied().flatten()
    }

    pub(crate) fn set_span(&mut self, position: usize, span: usize) {
        self.ensure_size(position);
        self.data[position] = Some(span);
    }

    fn size_for_position(&self, position: usize) -> usize {
        let mut len = self.data.len();
        while len <= position {
            len *= 2;
        }
        len
    }

    fn ensure_size(&mut self, position: usize) {
        if self.data.is_empty() {
            self.data = vec![None; position.max(MIN_SIZE) + 1];
        } else if position >= self.data.len() {
            let len = self.size_for_position(position);
            self.data.resize(len, None);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn clear(&mut self) {
        self.data.fill(None);
        self.full_span_items.clear();
    }

    /// Clears assignments from `position` up to and including the next full-span marker.
    ///
    /// Returns the exclusive end of the cleared range, or `None` when nothing was tracked there.
    pub(crate) fn invalidate_after(&mut self, position: usize) -> Option<usize> {
        if position >= self.data.len() {
            return None;
        }
        let end = match self.invalidate_full_spans_after(position) {
            None => self.data.len(),
            Some(marker) => (marker + 1).min(self.data.len()),
        };
        self.data[position..end].fill(None);
        Some(end)
    }

    /// Like [`Self::invalidate_after`], but forgets every marker at or after `position` first.
    pub(crate) fn force_invalidate_after(&mut self, position: usize) -> Option<usize> {
        self.full_span_items.retain(|fsi| fsi.position < position);
        self.invalidate_after(position)
    }

    fn invalidate_full_spans_after(&mut self, position: usize) -> Option<usize> {
        if let Some(idx) = self
            .full_span_items
            .iter()
            .rposition(|fsi| fsi.position == position)
        {
            self.full_span_items.remove(idx);
        }
        let next = self
            .full_span_items
            .iter()
            .position(|fsi| fsi.position >= position)?;
        Some(self.full_span_items.remove(next).position)
    }

    pub(crate) fn offset_for_removal(&mut self, position_start: usize, item_count: usize) {
        if position_start >= self.data.len() {
            return;
        }
        self.ensure_size(position_start + item_count);
        let len = self.data.len();
        self.data.copy_within(position_start + item_count..len, position_start);
        self.data[len - item_count..].fill(None);

        let end = position_start + item_count;
        self.full_span_items.retain_mut(|fsi| {
            if fsi.position < position_start {
                return true;
            }
            if fsi.position < end {
                return false;
            }
            fsi.position -= item_count;
            true
        });
    }

    pub(crate) fn offset_for_addition(&mut self, position_start: usize, item_count: usize) {
        if position_start >= self.data.len() {
            return;
        }
        self.ensure_size(position_start + item_count);
        let len = self.data.len();
        self.data
            .copy_within(position_start..len - item_count, position_start + item_count);
        self.data[position_start..position_start + item_count].fill(None);

        for fsi in &mut self.full_span_items {
            if fsi.position >= position_start {
                fsi.position += item_count;
            }
        }
    }

    /// Inserts a marker in position order, replacing any marker already at that position.
    pub(crate) fn add_full_span_item(&mut self, item: FullSpanItem) {
        if let Some(idx) = self
            .full_span_items
            .iter()
            .position(|fsi| fsi.position == item.position)
        {
            gwarn!(position = item.position, "replacing duplicate full-span marker");
            self.full_span_items[idx] = item;
            return;
        }
        let at = self
            .full_span_items
            .partition_point(|fsi| fsi.position < item.position);
        self.full_span_items.insert(at, item);
    }

    pub(crate) fn full_span_item(&self, position: usize) -> Option<&FullSpanItem> {
        self.full_span_items
            .iter()
            .rev()
            .find(|fsi| fsi.position == position)
    }

    pub(crate) fn full_span_item_mut(&mut self, position: usize) -> Option<&mut FullSpanItem> {
        self.full_span_items
            .iter_mut()
            .rev()
            .find(|fsi| fsi.position == position)
    }

    /// First marker in `[min, max_exclusive)` whose gap points `gap_dir` (any when `None`), or
    /// that carries the unwanted-gap flag when `include_unwanted_gap` is set.
    pub(crate) fn first_full_span_item_in_range(
        &self,
        min: usize,
        max_exclusive: usize,
        gap_dir: Option<LayoutDirection>,
        include_unwanted_gap: bool,
    ) -> Option<&FullSpanItem> {
        for fsi in &self.full_span_items {
            if fsi.position >= max_exclusive {
                return None;
            }
            if fsi.position >= min
                && (gap_dir.is_none_or(|dir| fsi.gap_dir == dir)
                    || (include_unwanted_gap && fsi.has_unwanted_gap_after))
            {
                return Some(fsi);
            }
        }
        None
    }

    pub(crate) fn data(&self) -> &[Option<usize>] {
        &self.data
    }

    pub(crate) fn full_span_items(&self) -> &[FullSpanItem] {
        &self.full_span_items
    }

    pub(crate) fn restore(&mut self, data: Vec<Option<usize>>, full_span_items: Vec<FullSpanItem>) {
        self.data = data;
        self.full_span_items = full_span_items;
        self.full_span_items.sort_by_key(|fsi| fsi.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(position: usize, gap_dir: LayoutDirection) -> FullSpanItem {
        FullSpanItem {
            position,
            gap_dir,
            gap_per_span: vec![0, 10],
            has_unwanted_gap_after: false,
        }
    }

    #[test]
    fn grows_to_min_size_then_doubles() {
        let mut lookup = SpanLookup::new();
        lookup.set_span(3, 1);
        assert_eq!(lookup.len(), MIN_SIZE + 1);
        lookup.set_span(11, 0);
        assert_eq!(lookup.len(), 22);
        lookup.set_span(50, 0);
        assert_eq!(lookup.len(), 88);
        assert_eq!(lookup.span(3), Some(1));
        assert_eq!(lookup.span(4), None);
        assert_eq!(lookup.span(1000), None);
    }

    #[test]
    fn invalidate_after_stops_at_next_marker() {
        let mut lookup = SpanLookup::new();
        for p in 0..10 {
            lookup.set_span(p, p % 2);
        }
        lookup.add_full_span_item(marker(6, LayoutDirection::Start));

        assert_eq!(lookup.invalidate_after(2), Some(7));
        assert!((2..7).all(|p| lookup.span(p).is_none()));
        assert_eq!(lookup.span(1), Some(1));
        assert_eq!(lookup.span(7), Some(1));
        // The boundary marker is consumed by the invalidation.
        assert!(lookup.full_span_item(6).is_none());
    }

    #[test]
    fn invalidate_after_drops_marker_at_position() {
        let mut lookup = SpanLookup::new();
        lookup.set_span(4, 0);
        lookup.add_full_span_item(marker(4, LayoutDirection::End));
        lookup.add_full_span_item(marker(8, LayoutDirection::End));
        assert_eq!(lookup.invalidate_after(4), Some(9));
        assert!(lookup.full_span_items().is_empty());
    }

    #[test]
    fn force_invalidate_after_forgets_later_markers() {
        let mut lookup = SpanLookup::new();
        for p in 0..10 {
            lookup.set_span(p, 0);
        }
        lookup.add_full_span_item(marker(1, LayoutDirection::Start));
        lookup.add_full_span_item(marker(5, LayoutDirection::Start));
        lookup.add_full_span_item(marker(9, LayoutDirection::Start));

        let end = lookup.force_invalidate_after(5);
        assert_eq!(end, Some(lookup.len()));
        assert_eq!(lookup.full_span_items().len(), 1);
        assert_eq!(lookup.full_span_items()[0].position, 1);
        assert_eq!(lookup.span(4), Some(0));
        assert_eq!(lookup.span(5), None);
    }

    #[test]
    fn removal_shifts_entries_and_drops_markers_in_range() {
        let mut lookup = SpanLookup::new();
        for p in 0..10 {
            lookup.set_span(p, p % 2);
        }
        lookup.add_full_span_item(marker(1, LayoutDirection::Start));
        lookup.add_full_span_item(marker(6, LayoutDirection::Start));

        lookup.offset_for_removal(0, 2);

        for p in 0..8 {
            assert_eq!(lookup.span(p), Some((p + 2) % 2), "position {p}");
        }
        assert_eq!(lookup.span(9), None);
        let positions: Vec<usize> = lookup.full_span_items().iter().map(|f| f.position).collect();
        assert_eq!(positions, vec![4]);
    }

    #[test]
    fn addition_shifts_entries_and_markers() {
        let mut lookup = SpanLookup::new();
        for p in 0..6 {
            lookup.set_span(p, p % 3);
        }
        lookup.add_full_span_item(marker(2, LayoutDirection::End));
        lookup.add_full_span_item(marker(4, LayoutDirection::End));

        lookup.offset_for_addition(3, 2);

        assert_eq!(lookup.span(2), Some(2));
        assert_eq!(lookup.span(3), None);
        assert_eq!(lookup.span(4), None);
        assert_eq!(lookup.span(5), Some(0));
        assert_eq!(lookup.span(6), Some(1));
        let positions: Vec<usize> = lookup.full_span_items().iter().map(|f| f.position).collect();
        assert_eq!(positions, vec![2, 6]);
    }

    #[test]
    fn offsets_past_tracked_range_are_ignored() {
        let mut lookup = SpanLookup::new();
        lookup.set_span(0, 1);
        let len = lookup.len();
        lookup.offset_for_addition(len, 3);
        lookup.offset_for_removal(len + 1, 3);
        assert_eq!(lookup.len(), len);
        assert_eq!(lookup.span(0), Some(1));
    }

    #[test]
    fn duplicate_marker_overwrites() {
        let mut lookup = SpanLookup::new();
        lookup.add_full_span_item(marker(7, LayoutDirection::Start));
        lookup.add_full_span_item(marker(3, LayoutDirection::Start));
        let mut replacement = marker(7, LayoutDirection::End);
        replacement.gap_per_span = vec![5, 5];
        lookup.add_full_span_item(replacement);

        assert_eq!(lookup.full_span_items().len(), 2);
        let fsi = lookup.full_span_item(7).unwrap();
        assert_eq!(fsi.gap_dir, LayoutDirection::End);
        assert_eq!(fsi.gap_for_span(1), 5);
        // Still ordered by position.
        assert_eq!(lookup.full_span_items()[0].position, 3);
    }

    #[test]
    fn range_query_respects_direction_and_unwanted_flag() {
        let mut lookup = SpanLookup::new();
        lookup.add_full_span_item(marker(2, LayoutDirection::Start));
        let mut flagged = marker(5, LayoutDirection::Start);
        flagged.has_unwanted_gap_after = true;
        lookup.add_full_span_item(flagged);
        lookup.add_full_span_item(marker(8, LayoutDirection::End));

        let any = lookup.first_full_span_item_in_range(0, 10, None, false);
        assert_eq!(any.map(|f| f.position), Some(2));

        let end = lookup.first_full_span_item_in_range(0, 10, Some(LayoutDirection::End), false);
        assert_eq!(end.map(|f| f.position), Some(8));

        let end_or_flag =
            lookup.first_full_span_item_in_range(0, 10, Some(LayoutDirection::End), true);
        assert_eq!(end_or_flag.map(|f| f.position), Some(5));

        // Upper bound is exclusive.
        let none = lookup.first_full_span_item_in_range(3, 5, None, true);
        assert!(none.is_none());
    }
}
