use alloc::vec;
use alloc::vec::Vec;

use crate::children::ChildId;
use crate::{GapStrategy, LayoutDirection, Orientation, OrientationOracle, StaggeredGrid};

impl<I> StaggeredGrid<I> {
    /// Looks for uneven span ends left by full-span items and, when one needs repair, drops
    /// the affected span assignments and requests a layout.
    ///
    /// Returns `true` when a layout was requested. Repeated calls before that layout runs
    /// return `false`.
    pub fn check_for_gaps(&mut self) -> bool {
        if self.gap_fix_pending
            || self.children.is_empty()
            || self.options.gap_strategy == GapStrategy::None
        {
            return false;
        }
        let (min_position, max_position) = if self.should_reverse {
            (self.last_child_position(), self.first_child_position())
        } else {
            (self.first_child_position(), self.last_child_position())
        };
        if min_position == 0 {
            if self.has_gaps_to_fix().is_some() {
                gdebug!("gap at the top of the data set, reassigning all spans");
                self.lookup.clear();
                self.request_simple_layout();
                return true;
            }
        }
        if !self.laid_out_invalid_full_span {
            return false;
        }

        let invalid_dir = if self.should_reverse {
            LayoutDirection::Start
        } else {
            LayoutDirection::End
        };
        let invalid = self
            .lookup
            .first_full_span_item_in_range(min_position, max_position + 1, Some(invalid_dir), true)
            .map(|item| item.position);
        let Some(invalid) = invalid else {
            self.laid_out_invalid_full_span = false;
            self.lookup.force_invalidate_after(max_position + 1);
            return false;
        };
        let valid = self
            .lookup
            .first_full_span_item_in_range(min_position, invalid, Some(invalid_dir.opposite()), true)
            .map(|item| item.position);
        match valid {
            Some(valid) => self.lookup.force_invalidate_after(valid + 1),
            None => self.lookup.force_invalidate_after(invalid),
        };
        gdebug!(invalid, ?valid, "uneven full-span item, reassigning spans after it");
        self.request_simple_layout();
        true
    }

    /// Position of the first child that sits out of place, in layout order: a span starting
    /// past the padded edge, or an item that begins before the one it should follow.
    pub(crate) fn has_gaps_to_fix(&mut self) -> Option<usize> {
        let orientation = self.options.orientation;
        let mut spans_to_check = vec![true; self.spans.len()];
        let preferred_span_dir: i32 =
            if orientation == Orientation::Vertical && self.options.layout_rtl {
                1
            } else {
                -1
            };
        let mut order: Vec<ChildId> = self.children.ids().collect();
        if self.should_reverse {
            order.reverse();
        }
        for (k, &id) in order.iter().enumerate() {
            let (span, full_span, bounds, position) = {
                let child = self.children.get(id);
                (child.span, child.full_span, child.bounds, child.position)
            };
            if spans_to_check[span] {
                if self.check_span_for_gap(span) {
                    return Some(position);
                }
                spans_to_check[span] = false;
            }
            if full_span {
                continue;
            }
            let Some(&next_id) = order.get(k + 1) else {
                continue;
            };
            let next = self.children.get(next_id);
            let compare_spans = if self.should_reverse {
                let my_end = bounds.main_end(orientation);
                let next_end = next.bounds.main_end(orientation);
                if my_end < next_end {
                    return Some(position);
                }
                my_end == next_end
            } else {
                let my_start = bounds.main_start(orientation);
                let next_start = next.bounds.main_start(orientation);
                if my_start > next_start {
                    return Some(position);
                }
                my_start == next_start
            };
            if compare_spans {
                let diff = span as i32 - next.span as i32;
                if (diff < 0) != (preferred_span_dir < 0) {
                    return Some(position);
                }
            }
        }
        None
    }

    fn check_span_for_gap(&mut self, span: usize) -> bool {
        let primary = self.primary();
        if primary.is_reversed() {
            if let Some(end) = self.span_end_line(span) {
                if end < primary.end_after_padding() {
                    return self.spans[span]
                        .last()
                        .is_some_and(|id| !self.children.get(id).full_span);
                }
            }
        } else if let Some(start) = self.span_start_line(span) {
            if start > primary.start_after_padding() {
                return self.spans[span]
                    .first()
                    .is_some_and(|id| !self.children.get(id).full_span);
            }
        }
        false
    }
}
