use alloc::vec;
use alloc::vec::Vec;

use crate::children::{Child, ChildId};
use crate::cursor::LayoutCursor;
use crate::lookup::FullSpanItem;
use crate::provider::ItemSource;
use crate::{
    AttachPoint, Bounds, Constraint, ItemDirection, ItemProvider, LayoutDirection,
    MeasureConstraints, Orientation, OrientationOracle, StaggeredGrid,
};

impl<I> StaggeredGrid<I> {
    pub(crate) fn span_start_line(&mut self, span: usize) -> Option<i32> {
        let cx = crate::span::LineContext {
            children: &self.children,
            lookup: &self.lookup,
            orientation: self.options.orientation,
        };
        self.spans[span].start_line(&cx)
    }

    pub(crate) fn span_end_line(&mut self, span: usize) -> Option<i32> {
        let cx = crate::span::LineContext {
            children: &self.children,
            lookup: &self.lookup,
            orientation: self.options.orientation,
        };
        self.spans[span].end_line(&cx)
    }

    pub(crate) fn max_start(&mut self, default: i32) -> i32 {
        let n = self.spans.len();
        (0..n)
            .map(|i| self.span_start_line(i).unwrap_or(default))
            .max()
            .unwrap_or(default)
    }

    pub(crate) fn min_start(&mut self, default: i32) -> i32 {
        let n = self.spans.len();
        (0..n)
            .map(|i| self.span_start_line(i).unwrap_or(default))
            .min()
            .unwrap_or(default)
    }

    pub(crate) fn max_end(&mut self, default: i32) -> i32 {
        let n = self.spans.len();
        (0..n)
            .map(|i| self.span_end_line(i).unwrap_or(default))
            .max()
            .unwrap_or(default)
    }

    pub(crate) fn min_end(&mut self, default: i32) -> i32 {
        let n = self.spans.len();
        (0..n)
            .map(|i| self.span_end_line(i).unwrap_or(default))
            .min()
            .unwrap_or(default)
    }

    fn all_ends_equal(&mut self) -> bool {
        let first = self.span_end_line(0);
        (1..self.spans.len()).all(|i| self.span_end_line(i) == first)
    }

    fn all_starts_equal(&mut self) -> bool {
        let first = self.span_start_line(0);
        (1..self.spans.len()).all(|i| self.span_start_line(i) == first)
    }

    pub(crate) fn child_constraints(&self, full_span: bool) -> MeasureConstraints {
        let primary = self.viewport.primary(self.options.orientation);
        let secondary = self.secondary();
        MeasureConstraints {
            main: Constraint {
                size: primary.total_space(),
                mode: primary.mode,
            },
            cross: Constraint {
                size: if full_span {
                    self.full_size
                } else {
                    self.size_per_span
                },
                mode: secondary.mode,
            },
        }
    }

    /// Whether span selection should scan from the last span, so ties go to the span that
    /// sits first in the fill direction.
    pub(crate) fn prefer_last_span(&self, direction: LayoutDirection) -> bool {
        let toward_start = direction == LayoutDirection::Start;
        match self.options.orientation {
            Orientation::Horizontal => toward_start != self.should_reverse,
            Orientation::Vertical => (toward_start == self.should_reverse) == self.options.layout_rtl,
        }
    }

    /// Picks the span a new item goes to: the one whose edge in `direction` is the least
    /// advanced.
    pub(crate) fn next_span(&mut self, direction: LayoutDirection) -> usize {
        let n = self.spans.len();
        let prefer_last = self.prefer_last_span(direction);
        let primary = self.primary();
        let mut best: Option<(usize, i32)> = None;
        for k in 0..n {
            let i = if prefer_last { n - 1 - k } else { k };
            match direction {
                LayoutDirection::End => {
                    let line = self
                        .span_end_line(i)
                        .unwrap_or(primary.start_after_padding());
                    if best.is_none_or(|(_, min)| line < min) {
                        best = Some((i, line));
                    }
                }
                LayoutDirection::Start => {
                    let line = self
                        .span_start_line(i)
                        .unwrap_or(primary.end_after_padding());
                    if best.is_none_or(|(_, max)| line > max) {
                        best = Some((i, line));
                    }
                }
            }
        }
        best.map_or(0, |(i, _)| i)
    }

    fn update_remaining_span(
        &mut self,
        remaining: &mut [bool],
        span: usize,
        direction: LayoutDirection,
        target_line: i32,
    ) {
        let deleted = self.spans[span].deleted_size();
        match direction {
            LayoutDirection::Start => {
                if let Some(line) = self.span_start_line(span) {
                    if line.saturating_add(deleted) <= target_line {
                        remaining[span] = false;
                    }
                }
            }
            LayoutDirection::End => {
                if let Some(line) = self.span_end_line(span) {
                    if line.saturating_sub(deleted) >= target_line {
                        remaining[span] = false;
                    }
                }
            }
        }
    }

    fn update_all_remaining_spans(
        &mut self,
        remaining: &mut [bool],
        direction: LayoutDirection,
        target_line: i32,
    ) {
        for span in 0..self.spans.len() {
            if self.spans[span].is_empty() {
                continue;
            }
            self.update_remaining_span(remaining, span, direction, target_line);
        }
    }

    fn attach_to_spans(
        &mut self,
        id: ChildId,
        full_span: bool,
        span: usize,
        direction: LayoutDirection,
        deleted: i32,
    ) {
        match (direction, full_span) {
            (LayoutDirection::End, true) => {
                for s in self.spans.iter_mut().rev() {
                    s.append(id, deleted);
                }
            }
            (LayoutDirection::End, false) => self.spans[span].append(id, deleted),
            (LayoutDirection::Start, true) => {
                for s in self.spans.iter_mut().rev() {
                    s.prepend(id, deleted);
                }
            }
            (LayoutDirection::Start, false) => self.spans[span].prepend(id, deleted),
        }
    }

    /// Attaches items from the cursor position onward until every span reaches the target
    /// line (or the provider runs out). Returns how much of `cursor.available` was consumed.
    pub(crate) fn fill<P>(&mut self, source: &mut ItemSource<'_, P>, cursor: &mut LayoutCursor) -> i32
    where
        P: ItemProvider<Item = I>,
    {
        let span_count = self.spans.len();
        let mut remaining = vec![true; span_count];
        let direction = cursor.layout_direction;
        let target_line = if cursor.infinite {
            match direction {
                LayoutDirection::Start => i32::MIN,
                LayoutDirection::End => i32::MAX,
            }
        } else {
            match direction {
                LayoutDirection::Start => cursor.start_line.saturating_sub(cursor.available),
                LayoutDirection::End => cursor.end_line.saturating_add(cursor.available),
            }
        };
        self.update_all_remaining_spans(&mut remaining, direction, target_line);

        let primary = self.primary();
        let secondary = self.secondary();
        let orientation = self.options.orientation;
        let default_new_line = if primary.is_reversed() {
            primary.end_after_padding()
        } else {
            primary.start_after_padding()
        };
        let item_count = source.item_count();
        let mut added = false;

        while cursor.has_more(item_count) && (cursor.infinite || remaining.contains(&true)) {
            let position = cursor.current_position as usize;
            let Some(mut item) = source.obtain(position, cursor.item_direction) else {
                gwarn!(position, item_count, "provider returned no item");
                break;
            };
            cursor.advance();

            let full_span = source.provider.is_full_span(&item);
            let (span_index, assign_span) = match self.lookup.span(position) {
                Some(span) if span < span_count => (span, false),
                _ => {
                    let span = if full_span {
                        0
                    } else {
                        self.next_span(direction)
                    };
                    self.lookup.set_span(position, span);
                    gtrace!(position, span, full_span, "assigned span");
                    (span, true)
                }
            };

            let attach_point = match direction {
                LayoutDirection::Start => AttachPoint::Head,
                LayoutDirection::End => AttachPoint::Tail,
            };
            source.provider.attach(&item, attach_point);
            let size = source.provider.measure(&mut item, self.child_constraints(full_span));
            let pending_removal = source.provider.is_pending_removal(&item);
            let focusable = cursor.stop_in_focusable && source.provider.has_focusable(&item);

            let (start, end) = match direction {
                LayoutDirection::End => {
                    let start = if full_span {
                        self.max_end(default_new_line)
                    } else {
                        self.span_end_line(span_index).unwrap_or(default_new_line)
                    };
                    if assign_span && full_span {
                        let gap_per_span: Vec<i32> = (0..span_count)
                            .map(|i| start - self.span_end_line(i).unwrap_or(start))
                            .collect();
                        self.lookup.add_full_span_item(FullSpanItem {
                            position,
                            gap_dir: LayoutDirection::Start,
                            gap_per_span,
                            has_unwanted_gap_after: false,
                        });
                    }
                    (start, start + size.main)
                }
                LayoutDirection::Start => {
                    let end = if full_span {
                        self.min_start(default_new_line)
                    } else {
                        self.span_start_line(span_index).unwrap_or(default_new_line)
                    };
                    if assign_span && full_span {
                        let gap_per_span: Vec<i32> = (0..span_count)
                            .map(|i| self.span_start_line(i).unwrap_or(end) - end)
                            .collect();
                        self.lookup.add_full_span_item(FullSpanItem {
                            position,
                            gap_dir: LayoutDirection::End,
                            gap_per_span,
                            has_unwanted_gap_after: false,
                        });
                    }
                    (end - size.main, end)
                }
            };

            if full_span && cursor.item_direction == ItemDirection::Head {
                if assign_span {
                    self.laid_out_invalid_full_span = true;
                } else {
                    let uneven = match direction {
                        LayoutDirection::End => !self.all_ends_equal(),
                        LayoutDirection::Start => !self.all_starts_equal(),
                    };
                    if uneven {
                        if let Some(marker) = self.lookup.full_span_item_mut(position) {
                            marker.has_unwanted_gap_after = true;
                        }
                        self.laid_out_invalid_full_span = true;
                    }
                }
            }

            let (cross_start, cross_end) =
                if self.options.layout_rtl && orientation == Orientation::Vertical {
                    let cross_end = if full_span {
                        secondary.end_after_padding()
                    } else {
                        secondary.end_after_padding()
                            - (span_count - 1 - span_index) as i32 * self.size_per_span
                    };
                    (cross_end - size.cross, cross_end)
                } else {
                    let cross_start = if full_span {
                        secondary.start_after_padding()
                    } else {
                        span_index as i32 * self.size_per_span + secondary.start_after_padding()
                    };
                    (cross_start, cross_start + size.cross)
                };

            let id = self.children.insert(
                Child {
                    item,
                    position,
                    full_span,
                    span: if full_span { 0 } else { span_index },
                    bounds: Bounds::from_axes(orientation, start, end, cross_start, cross_end),
                    pending_removal,
                    removed: false,
                    stale: false,
                },
                direction == LayoutDirection::Start,
            );
            let deleted = if pending_removal { size.main } else { 0 };
            self.attach_to_spans(id, full_span, span_index, direction, deleted);

            if full_span {
                self.update_all_remaining_spans(&mut remaining, direction, target_line);
            } else {
                self.update_remaining_span(&mut remaining, span_index, direction, target_line);
            }
            self.recycle(source, cursor);
            if focusable {
                if full_span {
                    remaining.fill(false);
                } else {
                    remaining[span_index] = false;
                }
            }
            added = true;
        }

        if !added {
            self.recycle(source, cursor);
        }

        let diff = match direction {
            LayoutDirection::Start => {
                let min_start = self.min_start(primary.start_after_padding());
                primary.start_after_padding() - min_start
            }
            LayoutDirection::End => {
                let max_end = self.max_end(primary.end_after_padding());
                max_end - primary.end_after_padding()
            }
        };
        if diff > 0 {
            cursor.available.min(diff)
        } else {
            0
        }
    }

    pub(crate) fn recycle<P>(&mut self, source: &mut ItemSource<'_, P>, cursor: &LayoutCursor)
    where
        P: ItemProvider<Item = I>,
    {
        if !cursor.recycle || cursor.infinite {
            return;
        }
        if cursor.available == 0 {
            match cursor.layout_direction {
                LayoutDirection::Start => self.recycle_from_end(source, cursor.end_line),
                LayoutDirection::End => self.recycle_from_start(source, cursor.start_line),
            }
            return;
        }
        match cursor.layout_direction {
            LayoutDirection::Start => {
                let scrolled = cursor.start_line - self.max_start(cursor.start_line);
                let line = if scrolled < 0 {
                    cursor.end_line
                } else {
                    cursor.end_line - scrolled.min(cursor.available)
                };
                self.recycle_from_end(source, line);
            }
            LayoutDirection::End => {
                let scrolled = self.min_end(cursor.end_line) - cursor.end_line;
                let line = if scrolled < 0 {
                    cursor.start_line
                } else {
                    cursor.start_line + scrolled.min(cursor.available)
                };
                self.recycle_from_start(source, line);
            }
        }
    }

    fn detach_from_spans(&mut self, id: ChildId, at_start: bool) -> bool {
        let orientation = self.options.orientation;
        let child = self.children.get(id);
        let (full_span, span) = (child.full_span, child.span);
        let deleted = if child.pending_removal {
            child.bounds.main_size(orientation)
        } else {
            0
        };
        // A span never gives up its last child here; it would lose its lines.
        let targets: &mut [crate::span::Span] = if full_span {
            if self.spans.iter().any(|s| s.len() == 1) {
                return false;
            }
            &mut self.spans
        } else {
            if self.spans[span].len() == 1 {
                return false;
            }
            core::slice::from_mut(&mut self.spans[span])
        };
        for s in targets {
            let popped = if at_start {
                s.pop_start(deleted)
            } else {
                s.pop_end(deleted)
            };
            debug_assert_eq!(popped, Some(id));
        }
        true
    }

    fn recycle_from_start<P>(&mut self, source: &mut ItemSource<'_, P>, line: i32)
    where
        P: ItemProvider<Item = I>,
    {
        let orientation = self.options.orientation;
        while let Some(id) = self.children.first_id() {
            if self.children.get(id).bounds.main_end(orientation) > line {
                return;
            }
            if !self.detach_from_spans(id, true) {
                return;
            }
            if let Some(child) = self.children.pop_front() {
                gtrace!(position = child.position, "recycled from start");
                source.recycle(child.item);
            }
        }
    }

    fn recycle_from_end<P>(&mut self, source: &mut ItemSource<'_, P>, line: i32)
    where
        P: ItemProvider<Item = I>,
    {
        let orientation = self.options.orientation;
        while let Some(id) = self.children.last_id() {
            if self.children.get(id).bounds.main_start(orientation) < line {
                return;
            }
            if !self.detach_from_spans(id, false) {
                return;
            }
            if let Some(child) = self.children.pop_back() {
                gtrace!(position = child.position, "recycled from end");
                source.recycle(child.item);
            }
        }
    }
}
