use alloc::vec::Vec;

use crate::provider::ItemSource;
use crate::{FocusDirection, ItemProvider, LayoutDirection, Orientation, OrientationOracle, StaggeredGrid};

impl<I> StaggeredGrid<I> {
    fn focus_layout_direction(&self, direction: FocusDirection) -> Option<LayoutDirection> {
        let vertical = self.options.orientation == Orientation::Vertical;
        let flipped = !vertical && self.options.layout_rtl;
        match direction {
            FocusDirection::Backward if flipped => Some(LayoutDirection::End),
            FocusDirection::Backward => Some(LayoutDirection::Start),
            FocusDirection::Forward if flipped => Some(LayoutDirection::Start),
            FocusDirection::Forward => Some(LayoutDirection::End),
            FocusDirection::Up => vertical.then_some(LayoutDirection::Start),
            FocusDirection::Down => vertical.then_some(LayoutDirection::End),
            FocusDirection::Left => (!vertical).then_some(LayoutDirection::Start),
            FocusDirection::Right => (!vertical).then_some(LayoutDirection::End),
        }
    }

    fn span_scan_order(&self, direction: LayoutDirection) -> Vec<usize> {
        let n = self.spans.len();
        if self.prefer_last_span(direction) {
            (0..n).rev().collect()
        } else {
            (0..n).collect()
        }
    }

    /// Run of focusable items in `span` between its edge and the reference position, walking
    /// toward the reference. Returns the one closest to the reference.
    fn focusable_after<P>(
        &self,
        span: usize,
        reference: usize,
        direction: LayoutDirection,
        provider: &P,
    ) -> Option<usize>
    where
        P: ItemProvider<Item = I>,
    {
        let reverse = self.options.reverse_layout;
        let mut candidate = None;
        let mut visit = |id| {
            let child = self.children.get(id);
            let reached = match (direction, reverse) {
                (LayoutDirection::Start, false) => child.position >= reference,
                (LayoutDirection::Start, true) => child.position <= reference,
                (LayoutDirection::End, false) => child.position <= reference,
                (LayoutDirection::End, true) => child.position >= reference,
            };
            if reached || !provider.has_focusable(&child.item) {
                return false;
            }
            candidate = Some(child.position);
            true
        };
        let items = self.spans[span].items();
        match direction {
            LayoutDirection::Start => {
                for id in items {
                    if !visit(id) {
                        break;
                    }
                }
            }
            LayoutDirection::End => {
                for id in items.rev() {
                    if !visit(id) {
                        break;
                    }
                }
            }
        }
        candidate
    }

    /// Called when the host's focus search found nothing past `focused_position`.
    ///
    /// Lays out up to a third of the viewport further in the focus direction (stopping at the
    /// first focusable item per span), then returns the position that should take focus: a
    /// focusable item if one was found, otherwise the item that should scroll into view next.
    pub fn focus_search_failed<P>(
        &mut self,
        focused_position: usize,
        direction: FocusDirection,
        provider: &mut P,
    ) -> Option<usize>
    where
        P: ItemProvider<Item = I>,
    {
        if self.children.is_empty() {
            return None;
        }
        let focused = self.children.find_by_position(focused_position)?;
        self.resolve_should_layout_reverse();
        let layout_direction = self.focus_layout_direction(direction)?;
        let (focused_full_span, focused_span) = {
            let child = self.children.get(focused);
            (child.full_span, child.span)
        };
        let reference = match layout_direction {
            LayoutDirection::End => self.last_child_position(),
            LayoutDirection::Start => self.first_child_position(),
        };

        let mut cursor = self.layout_cursor(reference);
        cursor.set_direction(layout_direction, self.should_reverse);
        cursor.current_position = reference as isize + cursor.item_direction.step();
        cursor.available = self.primary().total_space() / 3;
        cursor.stop_in_focusable = true;
        cursor.recycle = false;
        let mut source = ItemSource::new(provider);
        self.fill(&mut source, &mut cursor);
        source.finish();
        self.last_layout_from_end = self.should_reverse;

        let provider: &P = provider;
        let accept = |candidate: Option<usize>| candidate.filter(|&p| p != focused_position);
        let order = self.span_scan_order(layout_direction);

        if !focused_full_span {
            let found = self.focusable_after(focused_span, reference, layout_direction, provider);
            if let Some(position) = accept(found) {
                return Some(position);
            }
        }
        for &span in &order {
            let found = self.focusable_after(span, reference, layout_direction, provider);
            if let Some(position) = accept(found) {
                return Some(position);
            }
        }

        gtrace!(focused_position, "no focusable item, picking next to scroll in");
        let from_start = !self.options.reverse_layout == (layout_direction == LayoutDirection::Start);
        let partially_visible = |span: usize| {
            if from_start {
                self.first_partially_visible_in_span(span)
            } else {
                self.last_partially_visible_in_span(span)
            }
        };
        if !focused_full_span {
            if let Some(position) = accept(partially_visible(focused_span)) {
                return Some(position);
            }
        }
        for &span in &order {
            if !focused_full_span && span == focused_span {
                continue;
            }
            if let Some(position) = accept(partially_visible(span)) {
                return Some(position);
            }
        }
        None
    }
}
