use alloc::vec::Vec;

use crate::anchor::PendingScroll;
use crate::cursor::LayoutCursor;
use crate::provider::ItemSource;
use crate::{
    ItemProvider, LayoutDirection, MeasureMode, Orientation, OrientationOracle, ScrollVector,
    StaggeredGrid,
};

impl<I> StaggeredGrid<I> {
    /// Cursor for a pass starting at `position`, bounded by the padded (or raw) edges.
    pub(crate) fn layout_cursor(&self, position: usize) -> LayoutCursor {
        let primary = self.primary();
        let (start_line, end_line) = if self.options.clip_to_padding {
            (primary.start_after_padding(), primary.end_after_padding())
        } else {
            (0, primary.end())
        };
        let infinite = primary.mode() == MeasureMode::Unspecified && primary.end() == 0;
        LayoutCursor::new(position, start_line, end_line, infinite)
    }

    fn prepare_cursor_for_delta(&self, delta: i32) -> LayoutCursor {
        let (direction, reference) = if delta > 0 {
            (LayoutDirection::End, self.last_child_position())
        } else {
            (LayoutDirection::Start, self.first_child_position())
        };
        let mut cursor = self.layout_cursor(reference);
        cursor.set_direction(direction, self.should_reverse);
        cursor.current_position = reference as isize + cursor.item_direction.step();
        cursor.available = delta.saturating_abs();
        cursor
    }

    /// Scrolls the content by `delta` along the primary axis, attaching items that scroll in
    /// and recycling the ones that leave. Returns the distance actually scrolled, which is
    /// smaller than `delta` when the content runs out.
    pub fn scroll_by<P>(&mut self, delta: i32, provider: &mut P) -> i32
    where
        P: ItemProvider<Item = I>,
    {
        self.idle.cancel();
        let mut source = ItemSource::new(provider);
        let scrolled = self.scroll_by_with(delta, &mut source);
        source.finish();
        scrolled
    }

    pub(crate) fn scroll_by_with<P>(&mut self, delta: i32, source: &mut ItemSource<'_, P>) -> i32
    where
        P: ItemProvider<Item = I>,
    {
        if self.children.is_empty() || delta == 0 {
            return 0;
        }
        let mut cursor = self.prepare_cursor_for_delta(delta);
        let consumed = self.fill(source, &mut cursor);
        let scrolled = if cursor.available < consumed {
            delta
        } else if delta < 0 {
            -consumed
        } else {
            consumed
        };
        gtrace!(delta, scrolled, "scroll_by");

        self.offset_children(-scrolled);
        self.last_layout_from_end = self.should_reverse;
        cursor.available = 0;
        self.recycle(source, &cursor);
        scrolled
    }

    /// Moves every attached child and every cached span line along the primary axis.
    pub(crate) fn offset_children(&mut self, delta: i32) {
        let orientation = self.options.orientation;
        for child in self.children.iter_mut() {
            child.bounds.offset_main(orientation, delta);
        }
        for span in &mut self.spans {
            span.on_offset(delta);
        }
    }

    pub(crate) fn fix_end_gap<P>(&mut self, source: &mut ItemSource<'_, P>, can_offset_children: bool)
    where
        P: ItemProvider<Item = I>,
    {
        let max_end = self.max_end(i32::MIN);
        if max_end == i32::MIN {
            return;
        }
        let mut gap = self.primary().end_after_padding() - max_end;
        if gap <= 0 {
            return;
        }
        let fixed = -self.scroll_by_with(-gap, source);
        gap -= fixed;
        if can_offset_children && gap > 0 {
            self.offset_children(gap);
        }
    }

    pub(crate) fn fix_start_gap<P>(
        &mut self,
        source: &mut ItemSource<'_, P>,
        can_offset_children: bool,
    ) where
        P: ItemProvider<Item = I>,
    {
        let min_start = self.min_start(i32::MAX);
        if min_start == i32::MAX {
            return;
        }
        let mut gap = min_start - self.primary().start_after_padding();
        if gap <= 0 {
            return;
        }
        let fixed = self.scroll_by_with(gap, source);
        gap -= fixed;
        if can_offset_children && gap > 0 {
            self.offset_children(-gap);
        }
    }

    /// Brings `position` into view on the next layout.
    pub fn scroll_to_position(&mut self, position: usize) {
        if let Some(state) = self.pending_state.as_mut() {
            if state.anchor_position != Some(position) {
                state.invalidate_anchor_position_info();
            }
        }
        self.pending_scroll = Some(PendingScroll {
            position,
            offset: None,
        });
        self.request_layout();
    }

    /// Places `position` `offset` pixels from the padded start edge (end edge for reversed
    /// layouts) on the next layout.
    pub fn scroll_to_position_with_offset(&mut self, position: usize, offset: i32) {
        if let Some(state) = self.pending_state.as_mut() {
            state.invalidate_anchor_position_info();
        }
        self.pending_scroll = Some(PendingScroll {
            position,
            offset: Some(offset),
        });
        self.request_layout();
    }

    /// Which side of the attached content `position` lies on.
    pub fn scroll_direction_for_position(&self, position: usize) -> LayoutDirection {
        if self.children.is_empty() {
            return if self.should_reverse {
                LayoutDirection::End
            } else {
                LayoutDirection::Start
            };
        }
        if (position < self.first_child_position()) != self.should_reverse {
            LayoutDirection::Start
        } else {
            LayoutDirection::End
        }
    }

    /// Unit vector a smooth scroller should follow to reach `position`.
    pub fn scroll_vector_for_position(&self, position: usize) -> ScrollVector {
        let step = match self.scroll_direction_for_position(position) {
            LayoutDirection::Start => -1,
            LayoutDirection::End => 1,
        };
        match self.options.orientation {
            Orientation::Horizontal => ScrollVector { x: step, y: 0 },
            Orientation::Vertical => ScrollVector { x: 0, y: step },
        }
    }

    /// Reports the positions a scroll by `delta` would attach next, with the distance each
    /// one still is from the visible edge, nearest first.
    pub fn collect_prefetch_positions(
        &self,
        delta: i32,
        item_count: usize,
        emit: &mut dyn FnMut(usize, i32),
    ) {
        if self.children.is_empty() || delta == 0 {
            return;
        }
        let mut cursor = self.prepare_cursor_for_delta(delta);
        let cx = self.line_context();
        let mut distances: Vec<i32> = self
            .spans
            .iter()
            .map(|span| match cursor.layout_direction {
                LayoutDirection::Start => {
                    cursor.start_line - span.peek_start_line(&cx).unwrap_or(cursor.start_line)
                }
                LayoutDirection::End => {
                    span.peek_end_line(&cx).unwrap_or(cursor.end_line) - cursor.end_line
                }
            })
            .filter(|&distance| distance >= 0)
            .collect();
        distances.sort_unstable();
        for distance in distances {
            if !cursor.has_more(item_count) {
                break;
            }
            emit(cursor.current_position as usize, distance);
            cursor.advance();
        }
    }
}
