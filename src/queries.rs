use alloc::vec::Vec;

use crate::children::Child;
use crate::scrollbar::{self, Edge};
use crate::{ChildRef, GridError, OrientationOracle, StaggeredGrid};

impl<I> StaggeredGrid<I> {
    /// Attached items in container order.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = ChildRef<'_, I>> + '_ {
        self.children.iter().map(|child| ChildRef {
            item: &child.item,
            position: child.position,
            span: child.span,
            full_span: child.full_span,
            bounds: child.bounds,
        })
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// The attached item at an adapter position.
    pub fn child_at_position(&self, position: usize) -> Option<ChildRef<'_, I>> {
        self.children().find(|child| child.position == position)
    }

    fn find_one_visible_in_span(
        &self,
        span: usize,
        from_last: bool,
        completely_visible: bool,
        accept_completely_visible: bool,
        accept_end_point_inclusion: bool,
    ) -> Option<usize> {
        let primary = self.primary();
        let start = primary.start_after_padding();
        let end = primary.end_after_padding();
        let orientation = self.options.orientation;
        let visible = |id| -> Option<usize> {
            let child = self.children.get(id);
            let child_start = child.bounds.main_start(orientation);
            let child_end = child.bounds.main_end(orientation);
            let overlaps = if accept_end_point_inclusion {
                child_start <= end && child_end >= start
            } else {
                child_start < end && child_end > start
            };
            if !overlaps {
                return None;
            }
            let matches = if completely_visible && accept_completely_visible {
                child_start >= start && child_end <= end
            } else if accept_completely_visible {
                true
            } else {
                child_start < start || child_end > end
            };
            matches.then_some(child.position)
        };
        let items = self.spans[span].items();
        if from_last {
            items.rev().find_map(visible)
        } else {
            items.into_iter().find_map(visible)
        }
    }

    fn first_visible_in_span(&self, span: usize, completely: bool) -> Option<usize> {
        self.find_one_visible_in_span(span, self.options.reverse_layout, completely, true, false)
    }

    fn last_visible_in_span(&self, span: usize, completely: bool) -> Option<usize> {
        self.find_one_visible_in_span(span, !self.options.reverse_layout, completely, true, false)
    }

    pub(crate) fn first_partially_visible_in_span(&self, span: usize) -> Option<usize> {
        self.find_one_visible_in_span(span, self.options.reverse_layout, false, false, true)
    }

    pub(crate) fn last_partially_visible_in_span(&self, span: usize) -> Option<usize> {
        self.find_one_visible_in_span(span, !self.options.reverse_layout, false, false, true)
    }

    fn per_span_into(
        &self,
        into: &mut [Option<usize>],
        query: impl Fn(&Self, usize) -> Option<usize>,
    ) -> Result<(), GridError> {
        let expected = self.spans.len();
        if into.len() < expected {
            return Err(GridError::BufferTooSmall {
                expected,
                actual: into.len(),
            });
        }
        for (span, slot) in into.iter_mut().take(expected).enumerate() {
            *slot = query(self, span);
        }
        Ok(())
    }

    fn per_span(&self, query: impl Fn(&Self, usize) -> Option<usize>) -> Vec<Option<usize>> {
        (0..self.spans.len()).map(|span| query(self, span)).collect()
    }

    /// First partially or completely visible position in each span, in span order.
    pub fn find_first_visible_item_positions(&self) -> Vec<Option<usize>> {
        self.per_span(|grid, span| grid.first_visible_in_span(span, false))
    }

    /// Like [`Self::find_first_visible_item_positions`], writing into a caller buffer that holds
    /// at least `span_count` entries.
    pub fn find_first_visible_item_positions_into(
        &self,
        into: &mut [Option<usize>],
    ) -> Result<(), GridError> {
        self.per_span_into(into, |grid, span| grid.first_visible_in_span(span, false))
    }

    pub fn find_first_completely_visible_item_positions(&self) -> Vec<Option<usize>> {
        self.per_span(|grid, span| grid.first_visible_in_span(span, true))
    }

    pub fn find_first_completely_visible_item_positions_into(
        &self,
        into: &mut [Option<usize>],
    ) -> Result<(), GridError> {
        self.per_span_into(into, |grid, span| grid.first_visible_in_span(span, true))
    }

    pub fn find_last_visible_item_positions(&self) -> Vec<Option<usize>> {
        self.per_span(|grid, span| grid.last_visible_in_span(span, false))
    }

    pub fn find_last_visible_item_positions_into(
        &self,
        into: &mut [Option<usize>],
    ) -> Result<(), GridError> {
        self.per_span_into(into, |grid, span| grid.last_visible_in_span(span, false))
    }

    pub fn find_last_completely_visible_item_positions(&self) -> Vec<Option<usize>> {
        self.per_span(|grid, span| grid.last_visible_in_span(span, true))
    }

    pub fn find_last_completely_visible_item_positions_into(
        &self,
        into: &mut [Option<usize>],
    ) -> Result<(), GridError> {
        self.per_span_into(into, |grid, span| grid.last_visible_in_span(span, true))
    }

    /// Topmost child (in container order) that is on screen. With `fully_visible`, a child
    /// that is cut by the start edge only wins when nothing is fully visible.
    pub(crate) fn visible_child_closest_to_start(&self, fully_visible: bool) -> Option<&Child<I>> {
        let primary = self.primary();
        let bounds_start = primary.start_after_padding();
        let bounds_end = primary.end_after_padding();
        let orientation = self.options.orientation;
        let mut partially_visible = None;
        for child in self.children.iter() {
            let child_start = child.bounds.main_start(orientation);
            let child_end = child.bounds.main_end(orientation);
            if child_end <= bounds_start || child_start >= bounds_end {
                continue;
            }
            if child_start >= bounds_start || !fully_visible {
                return Some(child);
            }
            if partially_visible.is_none() {
                partially_visible = Some(child);
            }
        }
        partially_visible
    }

    pub(crate) fn visible_child_closest_to_end(&self, fully_visible: bool) -> Option<&Child<I>> {
        let primary = self.primary();
        let bounds_start = primary.start_after_padding();
        let bounds_end = primary.end_after_padding();
        let orientation = self.options.orientation;
        let mut partially_visible = None;
        for child in self.children.iter().rev() {
            let child_start = child.bounds.main_start(orientation);
            let child_end = child.bounds.main_end(orientation);
            if child_end <= bounds_start || child_start >= bounds_end {
                continue;
            }
            if child_end <= bounds_end || !fully_visible {
                return Some(child);
            }
            if partially_visible.is_none() {
                partially_visible = Some(child);
            }
        }
        partially_visible
    }

    /// First fully visible position along the layout direction.
    pub(crate) fn first_visible_item_position(&self) -> Option<usize> {
        let child = if self.should_reverse {
            self.visible_child_closest_to_end(true)
        } else {
            self.visible_child_closest_to_start(true)
        };
        child.map(|child| child.position)
    }

    fn scrollbar_edges(&self) -> Option<(Edge, Edge)> {
        let exact = !self.options.smooth_scrollbar;
        let orientation = self.options.orientation;
        let edge = |child: &Child<I>| Edge {
            position: child.position,
            start: child.bounds.main_start(orientation),
            end: child.bounds.main_end(orientation),
        };
        let start = self.visible_child_closest_to_start(exact)?;
        let end = self.visible_child_closest_to_end(exact)?;
        Some((edge(start), edge(end)))
    }

    /// Scrollbar thumb offset for a data set of `item_count` items.
    ///
    /// With `smooth_scrollbar`, values are pixels extrapolated from the average size of the
    /// visible items; otherwise they count items.
    pub fn compute_scroll_offset(&self, item_count: usize) -> i32 {
        let Some((start, end)) = self.scrollbar_edges() else {
            return 0;
        };
        scrollbar::scroll_offset(
            &self.primary(),
            start,
            end,
            item_count,
            self.options.smooth_scrollbar,
            self.should_reverse,
        )
    }

    pub fn compute_scroll_extent(&self, item_count: usize) -> i32 {
        let Some((start, end)) = self.scrollbar_edges() else {
            return 0;
        };
        scrollbar::scroll_extent(
            &self.primary(),
            start,
            end,
            item_count,
            self.options.smooth_scrollbar,
        )
    }

    pub fn compute_scroll_range(&self, item_count: usize) -> i32 {
        let Some((start, end)) = self.scrollbar_edges() else {
            return 0;
        };
        scrollbar::scroll_range(start, end, item_count, self.options.smooth_scrollbar)
    }
}
